// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod compose;
pub mod config;
pub mod discovery;
pub mod genai;
pub mod lang;
pub mod locale;
pub mod pipeline;
pub mod relevance;

// ---- Re-exports for stable public API ----
pub use crate::config::Config;
pub use crate::discovery::types::{AcceptedVideo, Order, SearchQuery, VideoCandidate, VideoPlatform};
pub use crate::genai::{build_generator, DynTextGenerator, MockGenerator, TextGenerator};
pub use crate::locale::LocaleResolution;
pub use crate::pipeline::{DiscoveryReport, Pipeline, SkipReason};
