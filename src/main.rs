//! trendscout — demo binary.
//!
//! Thin caller around the library pipeline: wires config and clients, runs
//! one discovery pass, applies the caller-side view-count floor, and prints
//! the generated suggestions.
//!
//! Usage: `trendscout <niche> <country> [min_views]`
//! Audience and format preference come from TRENDSCOUT_AUDIENCE and
//! TRENDSCOUT_FORMAT when set.

use std::sync::Arc;

use anyhow::{bail, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trendscout::config::Config;
use trendscout::discovery::youtube::YouTubeClient;
use trendscout::genai::build_generator;
use trendscout::pipeline::{Pipeline, SkipReason};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trendscout=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op elsewhere.
    let _ = dotenvy::dotenv();
    init_tracing();

    let mut args = std::env::args().skip(1);
    let (Some(niche), Some(country)) = (args.next(), args.next()) else {
        bail!("usage: trendscout <niche> <country> [min_views]");
    };
    let min_views: u64 = match args.next() {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("min_views must be a non-negative integer"))?,
        None => 0,
    };
    let audience =
        std::env::var("TRENDSCOUT_AUDIENCE").unwrap_or_else(|_| "general audience".to_string());
    let format_preference =
        std::env::var("TRENDSCOUT_FORMAT").unwrap_or_else(|_| "any format".to_string());

    let cfg = Config::load()?;
    let generator = build_generator(&cfg.genai);
    let platform = Arc::new(YouTubeClient::new(&cfg.discovery.api_key));
    let pipeline = Pipeline::new(generator, platform, cfg.discovery.clone());

    let report = pipeline.discover(&niche, &country).await?;
    if report.skip == Some(SkipReason::UnknownCountry) {
        println!("Country {country:?} was not recognized; nothing to search.");
        return Ok(());
    }

    // Caller-side post-filter: the pipeline never applies a view-count floor.
    let filtered: Vec<_> = report
        .accepted
        .into_iter()
        .filter(|v| v.view_count >= min_views)
        .collect();

    if filtered.is_empty() {
        println!(
            "No qualifying videos found for niche {niche:?} in {} ({}).",
            report.locale.country, report.locale.language
        );
        return Ok(());
    }

    println!("Videos considered:");
    for v in &filtered {
        println!(
            "  - {} (views: {}, likes: {}, comments: {})",
            v.title, v.view_count, v.like_count, v.comment_count
        );
    }

    let profile = format!(
        "Niche: {niche}, Target audience: {audience}, Preferred format: {format_preference}, Country: {country}"
    );
    let suggestions = pipeline.suggest(&profile, &filtered, &country).await?;

    println!("\nContent suggestions:\n{suggestions}");
    Ok(())
}
