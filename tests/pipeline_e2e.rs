// tests/pipeline_e2e.rs
// End-to-end pipeline runs over a mock platform and a scripted generator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use trendscout::config::DiscoveryConfig;
use trendscout::discovery::types::{SearchQuery, VideoCandidate, VideoPlatform};
use trendscout::pipeline::{Pipeline, SkipReason};
use trendscout::{AcceptedVideo, MockGenerator};

/// Canned platform that records how often it was called.
struct MockPlatform {
    ids: Vec<String>,
    candidates: Vec<VideoCandidate>,
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl MockPlatform {
    fn new(candidates: Vec<VideoCandidate>) -> Self {
        Self {
            ids: candidates.iter().map(|c| c.id.clone()).collect(),
            candidates,
            search_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl VideoPlatform for MockPlatform {
    async fn search(&self, _query: &SearchQuery) -> Result<Vec<String>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.ids.clone())
    }

    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<VideoCandidate>> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .candidates
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn fetch_transcript(&self, _video_id: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn fetch_top_comments(&self, _video_id: &str, _limit: u32) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

fn cand(id: &str, title: &str, declared: Option<&str>, views: u64) -> VideoCandidate {
    VideoCandidate {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        declared_language: declared.map(str::to_string),
        view_count: views,
        like_count: 0,
        comment_count: 0,
    }
}

fn english_run_candidates() -> Vec<VideoCandidate> {
    vec![
        cand("v1", "How to cook", Some("en"), 1000),
        cand("v2", "Comment cuisiner", Some("fr"), 5000),
    ]
}

#[tokio::test]
async fn english_target_keeps_only_the_declared_english_video() {
    let gen = Arc::new(MockGenerator::scripted([
        "US",
        "The official language is English.",
    ]));
    let platform = Arc::new(MockPlatform::new(english_run_candidates()));
    let pipeline = Pipeline::new(gen, platform.clone(), DiscoveryConfig::default());

    let report = pipeline.discover("cooking", "United States").await.unwrap();

    assert_eq!(report.accepted.len(), 1);
    assert_eq!(report.accepted[0].id, "v1");
    assert_eq!(report.accepted[0].view_count, 1000);
    assert_eq!(report.skip, None);
    // Accepted is a subset of candidates.
    for a in &report.accepted {
        assert!(report.candidates.iter().any(|c| c.id == a.id));
    }
}

#[tokio::test]
async fn unknown_country_returns_empty_without_touching_the_platform() {
    let gen = Arc::new(MockGenerator::scripted(["I do not know that place."]));
    let platform = Arc::new(MockPlatform::new(english_run_candidates()));
    let pipeline = Pipeline::new(gen, platform.clone(), DiscoveryConfig::default());

    let report = pipeline.discover("cooking", "Gondor").await.unwrap();

    assert_eq!(report.skip, Some(SkipReason::UnknownCountry));
    assert!(report.candidates.is_empty());
    assert!(report.accepted.is_empty());
    assert_eq!(platform.search_calls.load(Ordering::SeqCst), 0);
    assert_eq!(platform.detail_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn nothing_surviving_the_filter_is_reported_as_no_matches() {
    let candidates = vec![cand("v1", "Comment cuisiner", Some("fr"), 100)];
    let gen = Arc::new(MockGenerator::scripted(["US", "English."]));
    let platform = Arc::new(MockPlatform::new(candidates));
    let pipeline = Pipeline::new(gen, platform, DiscoveryConfig::default());

    let report = pipeline.discover("cooking", "United States").await.unwrap();
    assert_eq!(report.skip, Some(SkipReason::NoMatches));
    assert_eq!(report.candidates.len(), 1);
    assert!(report.accepted.is_empty());
}

#[tokio::test]
async fn identical_inputs_yield_identical_accepted_sets() {
    let run = |replies: [&'static str; 2]| async move {
        let gen = Arc::new(MockGenerator::scripted(replies));
        let platform = Arc::new(MockPlatform::new(english_run_candidates()));
        let pipeline = Pipeline::new(gen, platform, DiscoveryConfig::default());
        pipeline
            .discover("cooking", "United States")
            .await
            .unwrap()
            .accepted
    };

    let first = run(["US", "English."]).await;
    let second = run(["US", "English."]).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn suggestion_text_comes_back_verbatim() {
    let reply = "1. Idea one (based on: How to cook)\n...unstructured text is fine...";
    let gen = Arc::new(MockGenerator::scripted([reply]));
    let platform = Arc::new(MockPlatform::new(Vec::new()));
    let pipeline = Pipeline::new(gen.clone(), platform, DiscoveryConfig::default());

    let accepted = vec![AcceptedVideo {
        id: "v1".into(),
        title: "How to cook".into(),
        view_count: 1000,
        like_count: 10,
        comment_count: 2,
        transcript: None,
        top_comments: None,
    }];
    let text = pipeline
        .suggest("Niche: cooking", &accepted, "United States")
        .await
        .unwrap();
    assert_eq!(text, reply);

    // The composer sent one structured prompt containing the video.
    let prompts = gen.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("How to cook"));
    assert!(prompts[0].contains("views: 1000"));
}

#[tokio::test]
async fn enrichment_faults_do_not_fail_the_run() {
    // A platform that errors out of the enrichment lookups instead of
    // degrading internally; the run must still succeed, unenriched.
    struct BrokenEnrichment;

    #[async_trait]
    impl VideoPlatform for BrokenEnrichment {
        async fn search(&self, _query: &SearchQuery) -> Result<Vec<String>> {
            Ok(vec!["v1".to_string()])
        }
        async fn fetch_details(&self, _ids: &[String]) -> Result<Vec<VideoCandidate>> {
            Ok(vec![cand("v1", "How to cook", Some("en"), 100)])
        }
        async fn fetch_transcript(&self, _video_id: &str) -> Result<Option<String>> {
            anyhow::bail!("captions endpoint down")
        }
        async fn fetch_top_comments(&self, _video_id: &str, _limit: u32) -> Result<Vec<String>> {
            anyhow::bail!("comments disabled")
        }
        fn name(&self) -> &'static str {
            "broken-enrichment"
        }
    }

    let cfg = DiscoveryConfig {
        enrich: true,
        ..DiscoveryConfig::default()
    };
    let gen = Arc::new(MockGenerator::scripted(["US", "English."]));
    let pipeline = Pipeline::new(gen, Arc::new(BrokenEnrichment), cfg);

    let report = pipeline.discover("cooking", "United States").await.unwrap();
    assert_eq!(report.accepted.len(), 1);
    assert_eq!(report.accepted[0].transcript, None);
    assert_eq!(report.accepted[0].top_comments, None);
}

#[tokio::test]
async fn search_faults_surface_as_errors_not_empty_reports() {
    struct FailingPlatform;

    #[async_trait]
    impl VideoPlatform for FailingPlatform {
        async fn search(&self, _query: &SearchQuery) -> Result<Vec<String>> {
            anyhow::bail!("quota exceeded")
        }
        async fn fetch_details(&self, _ids: &[String]) -> Result<Vec<VideoCandidate>> {
            unreachable!("details must not be fetched after a failed search")
        }
        async fn fetch_transcript(&self, _video_id: &str) -> Result<Option<String>> {
            Ok(None)
        }
        async fn fetch_top_comments(&self, _video_id: &str, _limit: u32) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
        fn name(&self) -> &'static str {
            "failing"
        }
    }

    let gen = Arc::new(MockGenerator::scripted(["US", "English."]));
    let pipeline = Pipeline::new(gen, Arc::new(FailingPlatform), DiscoveryConfig::default());

    let err = pipeline
        .discover("cooking", "United States")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("video search failed"));
}
