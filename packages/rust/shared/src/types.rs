//! Core domain types for Bleacher reports and their source collections.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Source items (produced by the feed collaborators, read-only downstream)
// ---------------------------------------------------------------------------

/// A single headline from a news feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Headline with the trailing outlet suffix removed.
    pub title: String,
    /// Outlet name (e.g. "ESPN").
    pub source: String,
    /// Link to the article.
    pub url: String,
    /// Human-readable date label, e.g. "2 hrs ago" or "Feb 20".
    pub date: String,
}

/// Headlines plus a flat text rendition for the generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsData {
    pub items: Vec<NewsItem>,
    /// Flat text for generator context.
    pub text_blob: String,
}

/// A single subreddit post with its top comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedditPost {
    pub title: String,
    pub author: String,
    pub url: String,
    /// Human-readable age, e.g. "5h ago".
    pub age: String,
    /// Cleaned self text; empty for link and media posts.
    #[serde(default)]
    pub selftext: String,
    /// Top-level comment bodies, best first.
    #[serde(default)]
    pub comments: Vec<String>,
    /// Whether the post is an image/video the generator cannot perceive.
    #[serde(default)]
    pub is_media: bool,
}

/// Subreddit posts plus a flat text rendition for the generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedditData {
    pub posts: Vec<RedditPost>,
    /// Flat text for generator context.
    pub posts_text: String,
}

/// The source collections handed to the renderer next to a [`Report`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sources {
    pub news: NewsData,
    pub offseason_news: NewsData,
    /// Exactly the posts that were enriched, in enrichment order.
    pub reddit_posts: Vec<RedditPost>,
}

// ---------------------------------------------------------------------------
// SentimentBreakdown
// ---------------------------------------------------------------------------

/// Positive/neutral/negative percentage split. Always sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl Default for SentimentBreakdown {
    fn default() -> Self {
        Self {
            positive: 33,
            neutral: 34,
            negative: 33,
        }
    }
}

impl SentimentBreakdown {
    /// Build a breakdown from three non-negative counts, rescaling to 100.
    ///
    /// A triple that already sums to 100 is kept as is. Otherwise `positive`
    /// and `neutral` are rescaled with round-half-to-even and `negative` takes
    /// whatever remains, so the last field absorbs the rounding error. An
    /// all-zero triple falls back to the default split.
    pub fn normalized(positive: u64, neutral: u64, negative: u64) -> Self {
        let total = u128::from(positive) + u128::from(neutral) + u128::from(negative);

        if total == 0 {
            return Self::default();
        }
        if total == 100 {
            // Each component is <= 100 here.
            return Self {
                positive: positive as u32,
                neutral: neutral as u32,
                negative: negative as u32,
            };
        }

        let positive = scaled_share(u128::from(positive), total);
        let neutral = scaled_share(u128::from(neutral), total);
        // positive + neutral <= 100 holds under half-even rounding.
        let negative = 100 - positive - neutral;

        Self {
            positive: positive as u32,
            neutral: neutral as u32,
            negative: negative as u32,
        }
    }

    /// Sum of the three components.
    pub fn total(&self) -> u32 {
        self.positive + self.neutral + self.negative
    }
}

/// `round(part / total * 100)` with ties to even, in exact integer arithmetic.
fn scaled_share(part: u128, total: u128) -> u128 {
    let scaled = part * 100;
    let quotient = scaled / total;
    let remainder = scaled % total;

    if 2 * remainder > total || (2 * remainder == total && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// A titled roster/front-office note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarRoomItem {
    pub title: String,
    pub summary: String,
}

/// A generated summary of one subreddit post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityTake {
    pub title: String,
    pub summary: String,
}

/// Header values supplied by the caller rather than the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub team_name: String,
    /// Display date, e.g. "February 20, 2026".
    pub date: String,
}

/// The canonical output of one report cycle.
///
/// Only built by the schema validator or by [`Report::fallback`]; takes are
/// merged with [`Report::with_community_takes`], which returns a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub team_name: String,
    pub date: String,
    pub season_note: String,
    pub executive_summary: String,
    /// Fan mood, 0–100.
    pub sentiment_score: u32,
    pub sentiment_label: String,
    pub sentiment_trend: String,
    pub sentiment_breakdown: SentimentBreakdown,
    /// At most [`Report::MAX_KEYWORDS`] entries.
    pub sentiment_keywords: Vec<String>,
    pub war_room_intro: String,
    /// At most [`Report::MAX_WAR_ROOM_ITEMS`] entries.
    pub war_room_items: Vec<WarRoomItem>,
    /// One take per enriched post, same order.
    pub community_takes: Vec<CommunityTake>,
}

impl Report {
    pub const MAX_KEYWORDS: usize = 6;
    pub const MAX_WAR_ROOM_ITEMS: usize = 4;

    /// The constant report used when generation or parsing fails.
    pub fn fallback(meta: &ReportMeta) -> Self {
        Self {
            team_name: meta.team_name.clone(),
            date: meta.date.clone(),
            season_note: "Weekly Report".into(),
            executive_summary:
                "This week's summary could not be generated. Please check back next week.".into(),
            sentiment_score: 50,
            sentiment_label: "Unavailable".into(),
            sentiment_trend: "—".into(),
            sentiment_breakdown: SentimentBreakdown::default(),
            sentiment_keywords: Vec::new(),
            war_room_intro: "Front-office data unavailable this week.".into(),
            war_room_items: Vec::new(),
            community_takes: Vec::new(),
        }
    }

    /// Return this report with its community takes replaced.
    pub fn with_community_takes(self, community_takes: Vec<CommunityTake>) -> Self {
        Self {
            community_takes,
            ..self
        }
    }
}
