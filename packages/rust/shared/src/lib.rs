//! Shared types, error model, and configuration for Bleacher.
//!
//! This crate is the foundation depended on by all other Bleacher crates.
//! It provides:
//! - [`BleacherError`] — the unified error type
//! - Domain types ([`Report`], [`SentimentBreakdown`], [`NewsItem`], [`RedditPost`], [`Sources`])
//! - Configuration ([`AppConfig`], config loading, [`seasonal_keyword`])
//! - Text helpers ([`truncate_with_ellipsis`], [`collapse_whitespace`])

pub mod config;
pub mod error;
pub mod text;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, GeneratorConfig, OutputConfig, TeamConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from, seasonal_keyword,
};
pub use error::{BleacherError, Result};
pub use text::{
    CONTEXT_SUMMARY_MAX_CHARS, ELLIPSIS, TITLE_SUMMARY_MAX_CHARS, collapse_whitespace,
    truncate_with_ellipsis,
};
pub use types::{
    CommunityTake, NewsData, NewsItem, RedditData, RedditPost, Report, ReportMeta,
    SentimentBreakdown, Sources, WarRoomItem,
};
