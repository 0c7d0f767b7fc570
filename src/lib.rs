//! Semantic keyword-alignment scoring for text content.
//!
//! Given a weighted set of target keywords, a main text, and a competitor
//! text, semalign embeds everything through an external provider, scores
//! alignment via cosine similarity against the weighted keyword centroid,
//! and derives ranked content-improvement suggestions from the gap.
//!
//! Every analysis run is independent and stateless: providers are
//! caller-owned, nothing persists across invocations.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod providers;
pub mod segmenter;
pub mod ui;
pub mod vecmath;

pub use analysis::{
    AnalysisMode, AnalysisRequest, AnalysisResult, Analyzer, AnalyzerOptions, Keyword,
};
pub use error::{AnalysisError, Result};
