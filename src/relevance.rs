// src/relevance.rs
//! Two-tier language relevance filter.
//!
//! Declared metadata is trusted first: when the publisher attached a language
//! tag, it decides acceptance outright and detection is never consulted. Only
//! untagged videos fall through to statistical detection over title +
//! description. This trades detector noise on short or mixed-language titles
//! for metadata trust, while still covering channels that never declare a
//! language.

use metrics::counter;
use tracing::debug;

use crate::discovery::types::VideoCandidate;
use crate::lang;

/// Pure accept/reject decision for one candidate against the target language.
///
/// Both sides of every comparison are normalized to ISO 639-1, so a declared
/// "pt-BR" matches a target of "português" and detector output compares in
/// the same code space as the resolver's answer. An unrecognizable target
/// (including the "unknown" sentinel) accepts nothing.
pub fn accept(candidate: &VideoCandidate, target_language: &str) -> bool {
    let Some(target) = lang::normalize(target_language) else {
        return false;
    };

    if let Some(declared) = candidate
        .declared_language
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        return lang::normalize(declared) == Some(target);
    }

    let text = format!("{} {}", candidate.title, candidate.description);
    lang::detect(&text) == Some(target)
}

/// Order-preserving filter over a candidate batch. The output is always a
/// subset of the input.
pub fn filter_candidates(
    candidates: &[VideoCandidate],
    target_language: &str,
) -> Vec<VideoCandidate> {
    crate::discovery::ensure_metrics_described();
    let mut out = Vec::with_capacity(candidates.len());
    for c in candidates {
        if accept(c, target_language) {
            out.push(c.clone());
        } else {
            debug!(
                video_id = %c.id,
                declared = ?c.declared_language,
                target = target_language,
                "candidate rejected by language filter"
            );
        }
    }
    counter!("discovery_accepted_total").increment(out.len() as u64);
    counter!("discovery_rejected_total").increment((candidates.len() - out.len()) as u64);
    out
}
