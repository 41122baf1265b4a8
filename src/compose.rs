// src/compose.rs
//! Suggestion composer: turns the creator profile and the accepted videos
//! into one structured prompt and returns the model's reply verbatim.
//!
//! The contract deliberately ends at "send a well-formed instruction and pass
//! the text back": the reply is never parsed or validated, any shape of text
//! goes through to the caller.

use anyhow::Result;

use crate::discovery::types::AcceptedVideo;
use crate::genai::DynTextGenerator;

pub const IDEA_COUNT: usize = 10;
pub const SPOTLIGHT_COUNT: usize = 3;

const TRANSCRIPT_SNIPPET_CHARS: usize = 500;
const COMMENT_SNIPPET_CHARS: usize = 300;

/// Char-safe prefix, so multibyte titles and transcripts never split a
/// codepoint.
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Assemble the generation prompt: profile block, one bullet per accepted
/// video with its engagement counters (plus transcript/comment excerpts when
/// enriched), then the instruction block.
pub fn build_prompt(profile: &str, videos: &[AcceptedVideo], country: &str) -> String {
    let mut prompt = format!(
        "Creator profile: {profile}\n\n\
         Recently popular niche videos from {country}:\n"
    );

    for video in videos {
        prompt.push_str(&format!(
            "- Title: {} (views: {}, likes: {}, comments: {}) \
             [https://www.youtube.com/watch?v={}]\n",
            video.title, video.view_count, video.like_count, video.comment_count, video.id,
        ));
        if let Some(transcript) = &video.transcript {
            prompt.push_str(&format!(
                "  Transcript excerpt: {}...\n",
                truncate_chars(transcript, TRANSCRIPT_SNIPPET_CHARS)
            ));
        }
        if let Some(comments) = &video.top_comments {
            prompt.push_str(&format!(
                "  Top comments: {}...\n",
                truncate_chars(comments, COMMENT_SNIPPET_CHARS)
            ));
        }
    }

    prompt.push_str(&format!(
        "\nBased on these videos, generate exactly {IDEA_COUNT} detailed content ideas. \
         For every idea, name the specific source video that inspired it and explain \
         clearly how it served as inspiration. Then select the {SPOTLIGHT_COUNT} \
         strongest ideas and elaborate on each, including the view, like and comment \
         counts of its source video."
    ));
    prompt
}

pub struct SuggestionComposer {
    generator: DynTextGenerator,
}

impl SuggestionComposer {
    pub fn new(generator: DynTextGenerator) -> Self {
        Self { generator }
    }

    /// One generation request; the raw reply is returned as-is.
    pub async fn compose(
        &self,
        profile: &str,
        videos: &[AcceptedVideo],
        country: &str,
    ) -> Result<String> {
        let prompt = build_prompt(profile, videos, country);
        self.generator.complete(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, title: &str, views: u64) -> AcceptedVideo {
        AcceptedVideo {
            id: id.to_string(),
            title: title.to_string(),
            view_count: views,
            like_count: 7,
            comment_count: 3,
            transcript: None,
            top_comments: None,
        }
    }

    #[test]
    fn prompt_enumerates_every_video_with_counters() {
        let videos = vec![video("v1", "First title", 1000), video("v2", "Second title", 5000)];
        let prompt = build_prompt("Niche: cooking", &videos, "Brazil");

        assert!(prompt.contains("Creator profile: Niche: cooking"));
        assert!(prompt.contains("Brazil"));
        assert!(prompt.contains("First title"));
        assert!(prompt.contains("Second title"));
        assert!(prompt.contains("views: 1000"));
        assert!(prompt.contains("views: 5000"));
        assert!(prompt.contains("watch?v=v1"));
        assert!(prompt.contains("exactly 10 detailed content ideas"));
        assert!(prompt.contains("3 strongest"));
    }

    #[test]
    fn enrichment_excerpts_are_truncated() {
        let mut v = video("v1", "Title", 1);
        v.transcript = Some("x".repeat(2000));
        v.top_comments = Some("y".repeat(2000));
        let prompt = build_prompt("p", &[v], "Brazil");

        let transcript_run = prompt
            .split("Transcript excerpt: ")
            .nth(1)
            .and_then(|rest| rest.split("...").next())
            .unwrap();
        assert_eq!(transcript_run.chars().count(), 500);

        let comments_run = prompt
            .split("Top comments: ")
            .nth(1)
            .and_then(|rest| rest.split("...").next())
            .unwrap();
        assert_eq!(comments_run.chars().count(), 300);
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("ab", 10), "ab");
    }
}
