//! Community-take enrichment.
//!
//! One generation call per Reddit post, at most [`MAX_CONCURRENT_ENRICHMENTS`]
//! in flight. Each task writes only its own slot, so the output order is the
//! input order no matter which call finishes first. A failed call degrades
//! that one slot to a local fallback.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use bleacher_shared::{
    BleacherError, CONTEXT_SUMMARY_MAX_CHARS, CommunityTake, RedditPost, Result,
    TITLE_SUMMARY_MAX_CHARS, truncate_with_ellipsis,
};

use crate::llm::Generator;
use crate::prompts::{DISCUSSION_TAKE_PROMPT, MEDIA_TAKE_PROMPT};

/// Generation calls allowed in flight at once.
pub const MAX_CONCURRENT_ENRICHMENTS: usize = 4;

/// Top comments included in a discussion prompt.
pub const MAX_PROMPT_COMMENTS: usize = 3;

// ---------------------------------------------------------------------------
// Per-post request
// ---------------------------------------------------------------------------

/// What a single post is summarized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeKind {
    /// Image or video: title only, one sentence.
    Media,
    /// Text post: title, body and top comments, 2-3 sentences.
    Discussion,
}

impl TakeKind {
    pub fn of(post: &RedditPost) -> Self {
        if post.is_media {
            Self::Media
        } else {
            Self::Discussion
        }
    }

    fn prompt(self) -> &'static str {
        match self {
            Self::Media => MEDIA_TAKE_PROMPT,
            Self::Discussion => DISCUSSION_TAKE_PROMPT,
        }
    }

    /// Length cap for summaries of this kind.
    pub fn max_chars(self) -> usize {
        match self {
            Self::Media => TITLE_SUMMARY_MAX_CHARS,
            Self::Discussion => CONTEXT_SUMMARY_MAX_CHARS,
        }
    }
}

/// Content block handed to the generator for `post`.
pub fn take_content(post: &RedditPost) -> String {
    match TakeKind::of(post) {
        TakeKind::Media => format!("Title: {}", post.title),
        TakeKind::Discussion => {
            let mut content = format!("Title: {}", post.title);
            if !post.selftext.is_empty() {
                content.push_str(&format!("\n\nPost: {}", post.selftext));
            }
            let comments: Vec<_> = post.comments.iter().take(MAX_PROMPT_COMMENTS).collect();
            if !comments.is_empty() {
                content.push_str("\n\nTop comments:");
                for comment in comments {
                    content.push_str(&format!("\n- {comment}"));
                }
            }
            content
        }
    }
}

/// Take used when generation for `post` fails.
pub fn fallback_take(post: &RedditPost) -> CommunityTake {
    let source = if post.selftext.is_empty() {
        &post.title
    } else {
        &post.selftext
    };
    CommunityTake {
        title: post.title.clone(),
        summary: truncate_with_ellipsis(source, TakeKind::of(post).max_chars()),
    }
}

/// Generate the take for one post. Empty output counts as a failure.
async fn generate_take<G: Generator>(generator: &G, post: &RedditPost) -> Result<CommunityTake> {
    let kind = TakeKind::of(post);
    let text = generator.generate(kind.prompt(), &take_content(post)).await?;
    let text = text.trim();
    if text.is_empty() {
        return Err(BleacherError::Generation("empty generation".into()));
    }

    Ok(CommunityTake {
        title: post.title.clone(),
        summary: truncate_with_ellipsis(text, kind.max_chars()),
    })
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Enrich `posts` into one take per post, same order, same length.
#[instrument(skip_all, fields(posts = posts.len()))]
pub async fn enrich<G: Generator>(generator: &Arc<G>, posts: &[RedditPost]) -> Vec<CommunityTake> {
    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_ENRICHMENTS));
    let mut handles = Vec::with_capacity(posts.len());

    for post in posts {
        let generator = Arc::clone(generator);
        let sem = Arc::clone(&semaphore);
        let post = post.clone();

        handles.push(tokio::spawn(async move {
            let _permit = sem
                .acquire_owned()
                .await
                .map_err(|e| BleacherError::Generation(format!("worker pool closed: {e}")))?;
            generate_take(generator.as_ref(), &post).await
        }));
    }

    let mut slots: Vec<Option<CommunityTake>> = vec![None; posts.len()];
    let mut failures = 0usize;

    for (index, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(Ok(take)) => {
                debug!(index, "take generated");
                slots[index] = Some(take);
            }
            Ok(Err(e)) => {
                warn!(index, error = %e, "take generation failed, using fallback");
                failures += 1;
            }
            Err(e) => {
                warn!(index, error = %e, "take task aborted, using fallback");
                failures += 1;
            }
        }
    }

    info!(
        generated = posts.len() - failures,
        fallbacks = failures,
        "enrichment complete"
    );

    slots
        .into_iter()
        .zip(posts)
        .map(|(slot, post)| slot.unwrap_or_else(|| fallback_take(post)))
        .collect()
}
