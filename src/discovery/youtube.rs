// src/discovery/youtube.rs
//! YouTube Data API v3 client: keyword search scoped to a region and recency
//! window, batched detail/statistics lookups, and best-effort transcript and
//! comment enrichment.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::discovery::types::{SearchQuery, VideoCandidate, VideoPlatform};
use crate::discovery::{dedup_candidates, dedup_ids, normalize_snippet, published_after};

/// Platform cap on the number of ids per videos.list call.
pub const MAX_IDS_PER_CALL: usize = 50;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

pub struct YouTubeClient {
    mode: Mode,
}

enum Mode {
    Http {
        http: reqwest::Client,
        api_key: String,
        base_url: String,
    },
    Fixture(Mutex<FixtureState>),
}

struct FixtureState {
    search_body: String,
    detail_bodies: VecDeque<String>,
    detail_batches: Vec<Vec<String>>,
}

impl YouTubeClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("trendscout/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("reqwest client");
        Self {
            mode: Mode::Http {
                http,
                api_key: api_key.to_string(),
                base_url: base_url.trim_end_matches('/').to_string(),
            },
        }
    }

    /// Canned-response client for tests: one search body, one details body
    /// per expected batch call, consumed in order.
    pub fn from_fixtures<I, S>(search_body: &str, detail_bodies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: Mode::Fixture(Mutex::new(FixtureState {
                search_body: search_body.to_string(),
                detail_bodies: detail_bodies.into_iter().map(Into::into).collect(),
                detail_batches: Vec::new(),
            })),
        }
    }

    /// Id batches passed to detail calls so far (fixture mode only).
    pub fn recorded_detail_batches(&self) -> Vec<Vec<String>> {
        match &self.mode {
            Mode::Fixture(state) => state.lock().expect("poisoned fixture").detail_batches.clone(),
            Mode::Http { .. } => Vec::new(),
        }
    }

    async fn get_text(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        let Mode::Http {
            http,
            api_key,
            base_url,
        } = &self.mode
        else {
            bail!("fixture client has no HTTP transport");
        };
        let url = format!("{base_url}/{path}");
        let resp = http
            .get(&url)
            .query(params)
            .query(&[("key", api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("youtube: {path} request failed"))?;
        let status = resp.status();
        let body = resp.text().await.context("youtube: reading response body")?;
        if !status.is_success() {
            bail!(
                "youtube: {path} returned HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            );
        }
        Ok(body)
    }

    pub fn parse_search_response(body: &str) -> Result<Vec<String>> {
        let t0 = std::time::Instant::now();
        let parsed: SearchResponse =
            serde_json::from_str(body).context("parsing youtube search response")?;
        let ids: Vec<String> = parsed
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();
        histogram!("discovery_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(dedup_ids(&ids))
    }

    pub fn parse_details_response(body: &str) -> Result<Vec<VideoCandidate>> {
        let t0 = std::time::Instant::now();
        let parsed: VideosResponse =
            serde_json::from_str(body).context("parsing youtube videos response")?;

        let mut out = Vec::with_capacity(parsed.items.len());
        for item in parsed.items {
            let snippet = item.snippet;
            let declared_language = snippet
                .default_language
                .or(snippet.default_audio_language)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
            let stats = item.statistics.unwrap_or_default();
            out.push(VideoCandidate {
                id: item.id,
                title: normalize_snippet(&snippet.title),
                description: normalize_snippet(&snippet.description),
                declared_language,
                view_count: parse_count(stats.view_count),
                like_count: parse_count(stats.like_count),
                comment_count: parse_count(stats.comment_count),
            });
        }
        histogram!("discovery_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(out)
    }

    fn parse_comments_response(body: &str) -> Result<Vec<String>> {
        let parsed: CommentThreadsResponse =
            serde_json::from_str(body).context("parsing youtube commentThreads response")?;
        Ok(parsed
            .items
            .into_iter()
            .map(|t| normalize_snippet(&t.snippet.top_level_comment.snippet.text_display))
            .filter(|s| !s.is_empty())
            .collect())
    }

    async fn fetch_transcript_inner(&self, video_id: &str) -> Result<Option<String>> {
        let body = self
            .get_text("captions", &[("part", "snippet"), ("videoId", video_id)])
            .await?;
        let parsed: CaptionsResponse =
            serde_json::from_str(&body).context("parsing youtube captions response")?;
        let Some(caption) = parsed.items.into_iter().next() else {
            return Ok(None);
        };
        // Caption download generally requires OAuth; with an API key this is
        // expected to fail and the enrichment degrades to None.
        let track = self.get_text(&format!("captions/{}", caption.id), &[]).await?;
        let text = normalize_snippet(&track);
        Ok((!text.is_empty()).then_some(text))
    }
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>> {
        let body = match &self.mode {
            Mode::Fixture(state) => state.lock().expect("poisoned fixture").search_body.clone(),
            Mode::Http { .. } => {
                let after = published_after(query.window_days);
                let max = query.max_results.to_string();
                self.get_text(
                    "search",
                    &[
                        ("part", "snippet"),
                        ("q", query.niche.as_str()),
                        ("regionCode", query.region_code.as_str()),
                        ("type", "video"),
                        ("maxResults", max.as_str()),
                        ("order", query.order.as_param()),
                        ("publishedAfter", after.as_str()),
                    ],
                )
                .await?
            }
        };
        let ids = Self::parse_search_response(&body)?;
        counter!("discovery_search_ids_total").increment(ids.len() as u64);
        Ok(ids)
    }

    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<VideoCandidate>> {
        let ids = dedup_ids(ids);
        let mut merged = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(MAX_IDS_PER_CALL) {
            let body = match &self.mode {
                Mode::Fixture(state) => {
                    let mut state = state.lock().expect("poisoned fixture");
                    state.detail_batches.push(chunk.to_vec());
                    match state.detail_bodies.pop_front() {
                        Some(body) => body,
                        None => bail!("fixture: no details body left for batch"),
                    }
                }
                Mode::Http { .. } => {
                    let joined = chunk.join(",");
                    self.get_text(
                        "videos",
                        &[("part", "snippet,statistics"), ("id", joined.as_str())],
                    )
                    .await?
                }
            };
            merged.extend(Self::parse_details_response(&body)?);
        }
        Ok(dedup_candidates(merged))
    }

    async fn fetch_transcript(&self, video_id: &str) -> Result<Option<String>> {
        if let Mode::Fixture(_) = &self.mode {
            return Ok(None);
        }
        // Best-effort: any fault degrades to "no transcript".
        match self.fetch_transcript_inner(video_id).await {
            Ok(t) => Ok(t),
            Err(e) => {
                tracing::debug!(error = ?e, video_id, "transcript lookup failed");
                counter!("discovery_enrich_errors_total").increment(1);
                Ok(None)
            }
        }
    }

    async fn fetch_top_comments(&self, video_id: &str, limit: u32) -> Result<Vec<String>> {
        if let Mode::Fixture(_) = &self.mode {
            return Ok(Vec::new());
        }
        let limit = limit.to_string();
        let fetched = self
            .get_text(
                "commentThreads",
                &[
                    ("part", "snippet"),
                    ("videoId", video_id),
                    ("maxResults", limit.as_str()),
                    ("order", "relevance"),
                ],
            )
            .await
            .and_then(|body| Self::parse_comments_response(&body));
        // Best-effort: comments may be disabled or the quota exhausted.
        match fetched {
            Ok(comments) => Ok(comments),
            Err(e) => {
                tracing::debug!(error = ?e, video_id, "comment lookup failed");
                counter!("discovery_enrich_errors_total").increment(1);
                Ok(Vec::new())
            }
        }
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}

fn parse_count(raw: Option<String>) -> u64 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(0)
}

/* ----------------------------
API response shapes
---------------------------- */

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: Snippet,
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "defaultLanguage")]
    default_language: Option<String>,
    #[serde(rename = "defaultAudioLanguage")]
    default_audio_language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
    #[serde(rename = "commentCount")]
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentThreadsResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
struct CommentThreadSnippet {
    #[serde(rename = "topLevelComment")]
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
struct CommentSnippet {
    #[serde(rename = "textDisplay")]
    text_display: String,
}

#[derive(Debug, Deserialize)]
struct CaptionsResponse {
    #[serde(default)]
    items: Vec<Caption>,
}

#[derive(Debug, Deserialize)]
struct Caption {
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_FIXTURE: &str = r#"{
        "items": [
            {"id": {"kind": "youtube#video", "videoId": "vid1"}},
            {"id": {"kind": "youtube#channel"}},
            {"id": {"kind": "youtube#video", "videoId": "vid2"}},
            {"id": {"kind": "youtube#video", "videoId": "vid1"}}
        ]
    }"#;

    const DETAILS_FIXTURE: &str = r#"{
        "items": [
            {
                "id": "vid1",
                "snippet": {
                    "title": "Cooking &amp; baking basics",
                    "description": "Step by step",
                    "defaultLanguage": "en"
                },
                "statistics": {"viewCount": "1200", "likeCount": "34", "commentCount": "7"}
            },
            {
                "id": "vid2",
                "snippet": {"title": "Sem idioma declarado"},
                "statistics": {"viewCount": "not-a-number"}
            }
        ]
    }"#;

    #[test]
    fn search_parse_skips_non_videos_and_dedups() {
        let ids = YouTubeClient::parse_search_response(SEARCH_FIXTURE).unwrap();
        assert_eq!(ids, vec!["vid1", "vid2"]);
    }

    #[test]
    fn details_parse_decodes_entities_and_zeroes_missing_stats() {
        let out = YouTubeClient::parse_details_response(DETAILS_FIXTURE).unwrap();
        assert_eq!(out.len(), 2);

        assert_eq!(out[0].title, "Cooking & baking basics");
        assert_eq!(out[0].declared_language.as_deref(), Some("en"));
        assert_eq!(out[0].view_count, 1200);
        assert_eq!(out[0].like_count, 34);

        assert_eq!(out[1].declared_language, None);
        assert_eq!(out[1].description, "");
        assert_eq!(out[1].view_count, 0);
        assert_eq!(out[1].comment_count, 0);
    }

    #[test]
    fn details_parse_prefers_default_language_over_audio_language() {
        let body = r#"{"items": [{
            "id": "v",
            "snippet": {
                "title": "t",
                "defaultLanguage": "pt-BR",
                "defaultAudioLanguage": "en"
            }
        }]}"#;
        let out = YouTubeClient::parse_details_response(body).unwrap();
        assert_eq!(out[0].declared_language.as_deref(), Some("pt-BR"));
    }

    #[test]
    fn comments_parse_extracts_display_text() {
        let body = r#"{"items": [
            {"snippet": {"topLevelComment": {"snippet": {"textDisplay": "Great video!"}}}},
            {"snippet": {"topLevelComment": {"snippet": {"textDisplay": "   "}}}}
        ]}"#;
        let out = YouTubeClient::parse_comments_response(body).unwrap();
        assert_eq!(out, vec!["Great video!"]);
    }

    #[tokio::test]
    async fn fixture_search_returns_canned_ids() {
        let client = YouTubeClient::from_fixtures(SEARCH_FIXTURE, Vec::<String>::new());
        let query = SearchQuery {
            niche: "cooking".into(),
            region_code: "US".into(),
            window_days: 90,
            max_results: 10,
            order: crate::discovery::types::Order::Date,
        };
        let ids = client.search(&query).await.unwrap();
        assert_eq!(ids, vec!["vid1", "vid2"]);
    }
}
