// src/pipeline.rs
//! End-to-end discovery pipeline: locale resolution, platform search, batched
//! detail lookups, language filtering, optional enrichment, and suggestion
//! composition.
//!
//! Every remote call in a run is awaited in sequence; nothing inside a run is
//! parallelized (details can only be fetched once the id list is known).
//! Faults in the load-bearing calls surface as `Err`, so callers can tell
//! "no qualifying videos" (an `Ok` report with a skip reason) apart from
//! "a call failed".

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::compose::SuggestionComposer;
use crate::config::DiscoveryConfig;
use crate::discovery::types::{AcceptedVideo, SearchQuery, VideoPlatform};
use crate::genai::DynTextGenerator;
use crate::locale::{LocaleResolution, LocaleResolver};
use crate::relevance;

use std::sync::Arc;

/// Why a run produced no accepted videos without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Region-code extraction failed; the platform was never contacted.
    UnknownCountry,
    /// The platform answered, but nothing survived search + filtering.
    NoMatches,
}

/// Outcome of one discovery run. `accepted` is always a subset of
/// `candidates`, in platform order.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryReport {
    pub locale: LocaleResolution,
    pub candidates: Vec<crate::discovery::types::VideoCandidate>,
    pub accepted: Vec<AcceptedVideo>,
    pub skip: Option<SkipReason>,
}

pub struct Pipeline {
    resolver: LocaleResolver,
    composer: SuggestionComposer,
    platform: Arc<dyn VideoPlatform>,
    cfg: DiscoveryConfig,
}

impl Pipeline {
    pub fn new(
        generator: DynTextGenerator,
        platform: Arc<dyn VideoPlatform>,
        cfg: DiscoveryConfig,
    ) -> Self {
        Self {
            resolver: LocaleResolver::new(generator.clone()),
            composer: SuggestionComposer::new(generator),
            platform,
            cfg,
        }
    }

    /// Resolve the locale and materialize the language-filtered video set for
    /// `niche` in `country`. The caller applies any view-count floor before
    /// composing suggestions.
    pub async fn discover(&self, niche: &str, country: &str) -> Result<DiscoveryReport> {
        crate::discovery::ensure_metrics_described();

        let locale = self.resolver.resolve(country).await?;
        let Some(region_code) = locale.region_code.clone() else {
            info!(country, "country not recognized, skipping discovery");
            return Ok(DiscoveryReport {
                locale,
                candidates: Vec::new(),
                accepted: Vec::new(),
                skip: Some(SkipReason::UnknownCountry),
            });
        };

        let query = SearchQuery {
            niche: niche.to_string(),
            region_code,
            window_days: self.cfg.window_days,
            max_results: self.cfg.max_results,
            order: self.cfg.order,
        };
        let ids = self
            .platform
            .search(&query)
            .await
            .context("video search failed")?;

        let candidates = if ids.is_empty() {
            Vec::new()
        } else {
            self.platform
                .fetch_details(&ids)
                .await
                .context("video detail lookup failed")?
        };

        let kept = relevance::filter_candidates(&candidates, &locale.language);
        let mut accepted: Vec<AcceptedVideo> = kept.iter().map(AcceptedVideo::from).collect();

        if self.cfg.enrich {
            // Enrichment stays best-effort even for platform impls that
            // surface their faults instead of degrading internally.
            for video in &mut accepted {
                match self.platform.fetch_transcript(&video.id).await {
                    Ok(transcript) => video.transcript = transcript,
                    Err(e) => {
                        debug!(error = ?e, video_id = %video.id, "transcript enrichment failed")
                    }
                }
                match self
                    .platform
                    .fetch_top_comments(&video.id, self.cfg.comment_limit)
                    .await
                {
                    Ok(comments) if !comments.is_empty() => {
                        video.top_comments = Some(comments.join("\n"));
                    }
                    Ok(_) => {}
                    Err(e) => {
                        debug!(error = ?e, video_id = %video.id, "comment enrichment failed")
                    }
                }
            }
        }

        info!(
            country = %locale.country,
            language = %locale.language,
            searched = ids.len(),
            candidates = candidates.len(),
            accepted = accepted.len(),
            "discovery run finished"
        );

        let skip = accepted.is_empty().then_some(SkipReason::NoMatches);
        Ok(DiscoveryReport {
            locale,
            candidates,
            accepted,
            skip,
        })
    }

    /// Compose content suggestions for an already-discovered (and possibly
    /// caller-thresholded) video set.
    pub async fn suggest(
        &self,
        profile: &str,
        videos: &[AcceptedVideo],
        country: &str,
    ) -> Result<String> {
        self.composer
            .compose(profile, videos, country)
            .await
            .context("suggestion generation failed")
    }
}
