// src/locale.rs
//! Locale resolution: free-text country name -> (region code, official
//! language), by asking the text-generation service and pattern-extracting
//! the answer.
//!
//! Extraction from free text is a best-effort heuristic: a verbose reply may
//! contain unrelated uppercase tokens. Every extracted token is therefore
//! validated against a real locale table before it is accepted; nothing that
//! merely looks like a code gets through.

use anyhow::Result;
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::genai::DynTextGenerator;
use crate::lang;

/// Assigned ISO 3166-1 alpha-2 codes.
const REGION_CODES: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX", "AZ",
    "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS",
    "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN",
    "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM", "DO", "DZ", "EC", "EE",
    "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF",
    "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
    "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR", "IS", "IT", "JE", "JM",
    "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN", "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC",
    "LI", "LK", "LR", "LS", "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK",
    "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA",
    "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG",
    "PH", "PK", "PL", "PM", "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
    "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS",
    "ST", "SV", "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO",
    "TR", "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

pub fn is_region_code(code: &str) -> bool {
    REGION_CODES.binary_search(&code).is_ok()
}

/// Produced once per pipeline run; immutable. An absent `region_code` means
/// the run short-circuits with an empty result set.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LocaleResolution {
    pub country: String,
    pub region_code: Option<String>,
    /// Lowercased official-language token, or [`lang::UNKNOWN`].
    pub language: String,
}

pub struct LocaleResolver {
    generator: DynTextGenerator,
}

impl LocaleResolver {
    pub fn new(generator: DynTextGenerator) -> Self {
        Self { generator }
    }

    /// Resolve region code first; the language round trip is skipped when the
    /// country is not recognized, since the run aborts anyway.
    pub async fn resolve(&self, country: &str) -> Result<LocaleResolution> {
        let region_code = self.resolve_region_code(country).await?;
        let language = if region_code.is_some() {
            self.resolve_language(country).await?
        } else {
            lang::UNKNOWN.to_string()
        };
        debug!(country, ?region_code, language, "locale resolved");
        Ok(LocaleResolution {
            country: country.to_string(),
            region_code,
            language,
        })
    }

    pub async fn resolve_region_code(&self, country: &str) -> Result<Option<String>> {
        let prompt = format!(
            "What is the ISO 3166-1 alpha-2 code for the country {country}? \
             Reply with the two-letter code."
        );
        let reply = self.generator.complete(&prompt).await?;
        Ok(extract_region_code(&reply))
    }

    pub async fn resolve_language(&self, country: &str) -> Result<String> {
        let prompt = format!(
            "What is the official language of the country {country}? \
             Reply with the language name."
        );
        let reply = self.generator.complete(&prompt).await?;
        Ok(extract_language(&reply).unwrap_or_else(|| lang::UNKNOWN.to_string()))
    }
}

/// First standalone two-uppercase-letter token that is an assigned ISO 3166-1
/// alpha-2 code. `None` signals "country not recognized".
pub fn extract_region_code(reply: &str) -> Option<String> {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"\b([A-Z]{2})\b").expect("region code regex"));
    re.find_iter(reply.trim())
        .map(|m| m.as_str())
        .find(|&token| is_region_code(token))
        .map(str::to_string)
}

/// First Unicode word token that names a known language, lower-cased.
///
/// Matching is by name (English or native), never by bare code, so short
/// words like "it" in a verbose reply cannot be mistaken for Italian. A reply
/// that consists of nothing but a language tag ("pt", "por") is still
/// accepted as a whole.
pub fn extract_language(reply: &str) -> Option<String> {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"(?u)\b\w+\b").expect("word regex"));
    for m in re.find_iter(reply) {
        if lang::normalize_name(m.as_str()).is_some() {
            return Some(m.as_str().to_lowercase());
        }
    }
    let whole = reply.trim().trim_end_matches('.');
    if whole.len() <= 3 && lang::normalize(whole).is_some() {
        return Some(whole.to_lowercase());
    }
    None
}
