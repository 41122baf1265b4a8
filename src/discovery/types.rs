// src/discovery/types.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One video materialized from a search + details round trip.
/// Read-only after creation; one record per distinct video id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoCandidate {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Language tag the publisher attached to the video, if any.
    pub declared_language: Option<String>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
}

impl VideoCandidate {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

/// The slice of a candidate the composer needs, plus optional enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AcceptedVideo {
    pub id: String,
    pub title: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub transcript: Option<String>,
    pub top_comments: Option<String>,
}

impl From<&VideoCandidate> for AcceptedVideo {
    fn from(c: &VideoCandidate) -> Self {
        Self {
            id: c.id.clone(),
            title: c.title.clone(),
            view_count: c.view_count,
            like_count: c.like_count,
            comment_count: c.comment_count,
            transcript: None,
            top_comments: None,
        }
    }
}

/// Result ordering for the platform search call. Recency is the documented
/// default; view-count ordering is opt-in via config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    #[default]
    Date,
    ViewCount,
}

impl Order {
    pub fn as_param(self) -> &'static str {
        match self {
            Order::Date => "date",
            Order::ViewCount => "viewCount",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub niche: String,
    pub region_code: String,
    pub window_days: i64,
    pub max_results: u32,
    pub order: Order,
}

/// Seam over the video platform so the pipeline can run against test doubles.
///
/// `search` and `fetch_details` are load-bearing and propagate faults;
/// transcript and comment lookups are best-effort enrichments. Implementations
/// may degrade those to empty or return `Err`; callers tolerate either.
#[async_trait::async_trait]
pub trait VideoPlatform: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>>;
    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<VideoCandidate>>;
    async fn fetch_transcript(&self, video_id: &str) -> Result<Option<String>>;
    async fn fetch_top_comments(&self, video_id: &str, limit: u32) -> Result<Vec<String>>;
    fn name(&self) -> &'static str;
}
