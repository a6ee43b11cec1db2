//! Core report logic for Bleacher.
//!
//! This crate ties the feeds and the generation service together:
//! - [`llm`] — the [`Generator`] seam and the Gemini REST client
//! - [`validate`] — coerces generator output into a canonical [`Report`]
//! - [`enrichment`] — bounded-concurrency community takes
//! - [`pipeline`] — the end-to-end cycle and JSON snapshots
//!
//! [`Report`]: bleacher_shared::Report

pub mod enrichment;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod validate;

pub use enrichment::{MAX_CONCURRENT_ENRICHMENTS, MAX_PROMPT_COMMENTS, enrich};
pub use llm::{GeminiClient, Generator};
pub use pipeline::{
    CycleOutput, ENRICH_POST_LIMIT, ProgressReporter, SilentProgress, Snapshot, SourceData,
    build_report, collect_sources, run_cycle,
};
pub use validate::validate;
