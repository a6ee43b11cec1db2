//! End-to-end report cycle: feeds → aggregate generation → validation →
//! enrichment → [`CycleOutput`].

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use bleacher_feeds::{FeedClient, fetch_news, fetch_offseason_news, fetch_reddit};
use bleacher_shared::{
    BleacherError, NewsData, RedditData, RedditPost, Report, ReportMeta, Result, Sources,
    TeamConfig,
};

use crate::enrichment;
use crate::llm::Generator;
use crate::prompts::analysis_prompt;
use crate::validate::validate;

/// Posts sent through enrichment (and shown as hot takes).
pub const ENRICH_POST_LIMIT: usize = 5;

/// Everything fetched from the feeds for one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceData {
    pub news: NewsData,
    pub reddit: RedditData,
    pub offseason_news: NewsData,
}

impl SourceData {
    /// The leading posts that get enriched.
    pub fn enriched_posts(&self) -> &[RedditPost] {
        let n = self.reddit.posts.len().min(ENRICH_POST_LIMIT);
        &self.reddit.posts[..n]
    }
}

/// Result of one cycle: the report plus the sources the renderer pairs with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleOutput {
    pub report: Report,
    pub sources: Sources,
}

/// Progress callback for reporting cycle status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the cycle completes.
    fn done(&self, output: &CycleOutput);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _output: &CycleOutput) {}
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Fetch all three feeds concurrently.
///
/// A failed fetch is logged and replaced by an empty collection whose blob
/// says the data could not be retrieved.
#[instrument(skip_all, fields(team = %team.name))]
pub async fn collect_sources(
    feeds: &FeedClient,
    team: &TeamConfig,
    now: DateTime<Utc>,
) -> SourceData {
    let (news, reddit, offseason_news) = tokio::join!(
        fetch_news(feeds, &team.news_query, now),
        fetch_reddit(feeds, &team.subreddit, now),
        fetch_offseason_news(feeds, &team.news_query, now.month(), now),
    );

    let news = news.unwrap_or_else(|e| {
        error!(error = %e, "general news fetch failed");
        unavailable_news("general news")
    });
    let reddit = reddit.unwrap_or_else(|e| {
        error!(error = %e, "reddit fetch failed");
        RedditData {
            posts: Vec::new(),
            posts_text: "Could not retrieve Reddit data this week.".into(),
        }
    });
    let offseason_news = offseason_news.unwrap_or_else(|e| {
        error!(error = %e, "offseason news fetch failed");
        unavailable_news("offseason news")
    });

    info!(
        news = news.items.len(),
        posts = reddit.posts.len(),
        offseason = offseason_news.items.len(),
        "sources collected"
    );

    SourceData {
        news,
        reddit,
        offseason_news,
    }
}

fn unavailable_news(what: &str) -> NewsData {
    NewsData {
        items: Vec::new(),
        text_blob: format!("Could not retrieve {what} this week."),
    }
}

/// The sectioned content block for the aggregate generation call.
pub fn aggregate_content(data: &SourceData) -> String {
    format!(
        "--- GENERAL NEWS ---\n{}\n\n--- REDDIT DATA ---\n{}\n\n--- OFFSEASON / FRONT-OFFICE NEWS ---\n{}\n",
        data.news.text_blob, data.reddit.posts_text, data.offseason_news.text_blob
    )
}

/// Generate, validate and enrich a report. Never fails.
///
/// A failed aggregate call yields the fallback report; enrichment still runs
/// so the takes line up with [`SourceData::enriched_posts`].
#[instrument(skip_all, fields(team = %meta.team_name))]
pub async fn build_report<G: Generator>(
    generator: &Arc<G>,
    meta: &ReportMeta,
    data: &SourceData,
) -> Report {
    let prompt = analysis_prompt(&meta.team_name);
    let content = aggregate_content(data);

    info!("requesting analysis payload");
    let report = match generator.generate(&prompt, &content).await {
        Ok(raw) => validate(&raw, meta),
        Err(e) => {
            error!(error = %e, "analysis generation failed, using fallback report");
            Report::fallback(meta)
        }
    };

    let takes = enrichment::enrich(generator, data.enriched_posts()).await;
    report.with_community_takes(takes)
}

/// Run one full cycle.
#[instrument(skip_all, fields(team = %team.name))]
pub async fn run_cycle<G: Generator>(
    generator: &Arc<G>,
    feeds: &FeedClient,
    team: &TeamConfig,
    meta: &ReportMeta,
    now: DateTime<Utc>,
    progress: &dyn ProgressReporter,
) -> CycleOutput {
    let start = Instant::now();

    progress.phase("Collecting sources");
    let data = collect_sources(feeds, team, now).await;

    progress.phase("Generating report");
    let report = build_report(generator, meta, &data).await;

    let sources = Sources {
        reddit_posts: data.enriched_posts().to_vec(),
        news: data.news,
        offseason_news: data.offseason_news,
    };
    let output = CycleOutput { report, sources };

    info!(
        elapsed_ms = start.elapsed().as_millis(),
        score = output.report.sentiment_score,
        takes = output.report.community_takes.len(),
        "cycle complete"
    );
    progress.done(&output);

    output
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// A saved cycle that can be re-rendered offline.
pub type Snapshot = CycleOutput;

impl CycleOutput {
    /// Write this cycle as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BleacherError::parse(format!("failed to serialize snapshot: {e}")))?;
        std::fs::write(path, json).map_err(|e| BleacherError::io(path, e))?;
        info!(?path, "snapshot saved");
        Ok(())
    }

    /// Read a cycle written by [`CycleOutput::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| BleacherError::io(path, e))?;
        let output: Self = serde_json::from_str(&json).map_err(|e| {
            BleacherError::parse(format!("invalid snapshot {}: {e}", path.display()))
        })?;

        if output.report.sentiment_breakdown.total() != 100 || output.report.sentiment_score > 100
        {
            return Err(BleacherError::validation(format!(
                "snapshot {} violates report invariants",
                path.display()
            )));
        }
        Ok(output)
    }
}
