// src/discovery/mod.rs
pub mod types;
pub mod youtube;

use chrono::{Duration, SecondsFormat, Utc};
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use std::collections::HashSet;

use crate::discovery::types::VideoCandidate;

/// One-time metrics registration.
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "discovery_search_ids_total",
            "Video ids returned by platform search."
        );
        describe_counter!(
            "discovery_candidates_total",
            "Candidates materialized from detail lookups."
        );
        describe_counter!(
            "discovery_accepted_total",
            "Candidates accepted by the language filter."
        );
        describe_counter!(
            "discovery_rejected_total",
            "Candidates rejected by the language filter."
        );
        describe_counter!(
            "discovery_enrich_errors_total",
            "Best-effort enrichment lookups that failed."
        );
        describe_histogram!(
            "discovery_parse_ms",
            "Platform response parse time in milliseconds."
        );
    });
}

/// Normalize snippet text: decode HTML entities (YouTube snippets arrive
/// escaped), collapse whitespace, trim, cap length.
pub fn normalize_snippet(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    if out.chars().count() > 2000 {
        out = out.chars().take(2000).collect();
    }
    out
}

/// Collapse duplicate ids, keeping first occurrence order.
pub fn dedup_ids(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// Collapse duplicate candidates by id, keeping first occurrence order.
pub fn dedup_candidates(candidates: Vec<VideoCandidate>) -> Vec<VideoCandidate> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(candidates.len());
    for c in candidates {
        if seen.insert(c.id.clone()) {
            out.push(c);
        }
    }
    counter!("discovery_candidates_total").increment(out.len() as u64);
    out
}

/// RFC 3339 lower bound for the search recency window, seconds precision
/// with a `Z` suffix, the timestamp format the platform expects.
pub fn published_after(window_days: i64) -> String {
    (Utc::now() - Duration::days(window_days)).to_rfc3339_opts(SecondsFormat::Secs, true)
}
