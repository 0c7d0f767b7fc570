// ============================================
// SEMALIGN - Analysis Engine
// ============================================

pub mod coverage;
pub mod enhance;
mod orchestrator;
pub mod recommend;
pub mod scorer;

pub use coverage::KeywordCoverage;
pub use enhance::{build_enhancement_prompt, enhance_text};
pub use recommend::{
    calculate_cumulative_impact, calculate_score_predictions, ScorePrediction,
    SectionImprovement,
};
pub use scorer::SegmentScore;

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::providers::EmbeddingProvider;
use crate::segmenter::word_count;
use crate::vecmath::{weighted_centroid, Embedding};

const MAX_KEYWORDS: usize = 50;
const MIN_WEIGHT: f32 = 0.1;
const MAX_WEIGHT: f32 = 10.0;
const MAX_DOCUMENT_WORDS: usize = 4000;

/// A target keyword with its centroid weight. Duplicates are legal and
/// additively influence the centroid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyword {
    pub text: String,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_weight() -> f32 {
    1.0
}

impl Keyword {
    pub fn new(text: impl Into<String>, weight: f32) -> Self {
        Self {
            text: text.into(),
            weight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// One embedding per whole document
    Full,
    /// One embedding per section, aggregate = mean of section scores
    Chunked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub keywords: Vec<Keyword>,
    pub main_text: String,
    pub competitor_text: String,
    pub mode: AnalysisMode,
}

/// Everything one analysis run produces. Built fresh per invocation;
/// nothing persists across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub main_score_percent: f32,
    pub competitor_score_percent: f32,
    pub gap_analysis_text: String,
    pub main_sections: Option<Vec<SegmentScore>>,
    pub competitor_sections: Option<Vec<SegmentScore>>,
    pub keyword_weights: Vec<Keyword>,
    pub keyword_coverage: Vec<KeywordCoverage>,
    pub section_improvements: Vec<SectionImprovement>,
    pub processing_time_ms: u64,
}

/// Tuning knobs for one analyzer instance.
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// Upper bound on in-flight embedding requests per document batch
    pub max_concurrent_embeddings: usize,
    /// Fixed-window size in words for unstructured chunked-mode text
    pub chunk_words: usize,
    /// Overlap between consecutive fixed windows in words
    pub overlap_words: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            max_concurrent_embeddings: 8,
            chunk_words: crate::segmenter::DEFAULT_CHUNK_WORDS,
            overlap_words: crate::segmenter::DEFAULT_OVERLAP_WORDS,
        }
    }
}

/// The scoring engine. Owns nothing across runs: the provider handle is
/// supplied by the caller and every run is independent and stateless.
pub struct Analyzer {
    provider: Arc<dyn EmbeddingProvider>,
    options: AnalyzerOptions,
}

impl Analyzer {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            options: AnalyzerOptions::default(),
        }
    }

    pub fn with_options(provider: Arc<dyn EmbeddingProvider>, options: AnalyzerOptions) -> Self {
        Self { provider, options }
    }

    /// Run one analysis: validate, embed, score, analyze coverage, derive
    /// improvements. Any failure aborts the run with no partial results.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        validate_request(request)?;
        let started = Instant::now();

        // Keyword embeddings fan out concurrently; the centroid needs all of
        // them before anything else can proceed.
        let keyword_embeddings =
            orchestrator::embed_keywords(self.provider.as_ref(), &request.keywords).await?;

        let centroid_entries: Vec<(Embedding, f32)> = keyword_embeddings
            .iter()
            .cloned()
            .zip(request.keywords.iter().map(|k| k.weight))
            .collect();
        let centroid = weighted_centroid(&centroid_entries)?;

        // Both documents embed as two concurrent batches.
        let (main_doc, competitor_doc) = match request.mode {
            AnalysisMode::Chunked => {
                let main_sections = orchestrator::chunked_sections(
                    &request.main_text,
                    self.options.chunk_words,
                    self.options.overlap_words,
                );
                let competitor_sections = orchestrator::chunked_sections(
                    &request.competitor_text,
                    self.options.chunk_words,
                    self.options.overlap_words,
                );
                tokio::try_join!(
                    orchestrator::embed_document(
                        self.provider.as_ref(),
                        main_sections,
                        self.options.max_concurrent_embeddings,
                    ),
                    orchestrator::embed_document(
                        self.provider.as_ref(),
                        competitor_sections,
                        self.options.max_concurrent_embeddings,
                    ),
                )?
            }
            AnalysisMode::Full => tokio::try_join!(
                orchestrator::embed_whole_document(self.provider.as_ref(), &request.main_text),
                orchestrator::embed_whole_document(
                    self.provider.as_ref(),
                    &request.competitor_text
                ),
            )?,
        };

        let main_scores =
            scorer::score_sections(&centroid, &main_doc.sections, &main_doc.embeddings)?;
        let competitor_scores = scorer::score_sections(
            &centroid,
            &competitor_doc.sections,
            &competitor_doc.embeddings,
        )?;

        let main_score_percent = scorer::aggregate_score(&main_scores);
        let competitor_score_percent = scorer::aggregate_score(&competitor_scores);

        // Coverage reuses the embeddings computed above; no further provider
        // calls happen past this point.
        let keyword_coverage = coverage::analyze_coverage(
            &request.keywords,
            &keyword_embeddings,
            &main_doc.sections,
            &main_doc.embeddings,
            &request.main_text,
            &request.competitor_text,
        )?;

        let section_improvements =
            recommend::section_improvements(&main_scores, &keyword_coverage);

        let gap_analysis_text = gap_analysis(main_score_percent, competitor_score_percent);

        let (main_sections, competitor_sections) = match request.mode {
            AnalysisMode::Chunked => (Some(main_scores), Some(competitor_scores)),
            AnalysisMode::Full => (None, None),
        };

        let processing_time_ms = started.elapsed().as_millis() as u64;
        tracing::debug!(
            main = main_score_percent,
            competitor = competitor_score_percent,
            elapsed_ms = processing_time_ms,
            "analysis complete"
        );

        Ok(AnalysisResult {
            main_score_percent,
            competitor_score_percent,
            gap_analysis_text,
            main_sections,
            competitor_sections,
            keyword_weights: request.keywords.clone(),
            keyword_coverage,
            section_improvements,
            processing_time_ms,
        })
    }
}

/// Reject malformed requests before any provider call is made.
fn validate_request(request: &AnalysisRequest) -> Result<()> {
    if request.keywords.is_empty() {
        return Err(AnalysisError::InvalidInput("keyword list is empty".into()));
    }
    if request.keywords.len() > MAX_KEYWORDS {
        return Err(AnalysisError::InvalidInput(format!(
            "too many keywords: {} (max {})",
            request.keywords.len(),
            MAX_KEYWORDS
        )));
    }
    for keyword in &request.keywords {
        if keyword.text.trim().is_empty() {
            return Err(AnalysisError::InvalidInput("keyword text is empty".into()));
        }
        if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&keyword.weight) {
            return Err(AnalysisError::InvalidInput(format!(
                "keyword \"{}\" weight {} outside [{}, {}]",
                keyword.text, keyword.weight, MIN_WEIGHT, MAX_WEIGHT
            )));
        }
    }
    for (label, text) in [
        ("main text", &request.main_text),
        ("competitor text", &request.competitor_text),
    ] {
        if text.trim().is_empty() {
            return Err(AnalysisError::InvalidInput(format!("{} is empty", label)));
        }
        let words = word_count(text);
        if words > MAX_DOCUMENT_WORDS {
            return Err(AnalysisError::InvalidInput(format!(
                "{} too long: {} words (max {})",
                label, words, MAX_DOCUMENT_WORDS
            )));
        }
    }
    Ok(())
}

/// Templated gap sentence. A gap of exactly 0 takes the "less aligned"
/// branch; that boundary matches the original product behavior and is
/// covered by a test so it cannot drift silently.
fn gap_analysis(main_score: f32, competitor_score: f32) -> String {
    let gap = main_score - competitor_score;
    if gap > 0.0 {
        format!(
            "Your content is {:.1}% more aligned with the target keywords than the \
             competitor's - strong keyword optimization.",
            scorer::round1(gap)
        )
    } else {
        format!(
            "Your content is {:.1}% less aligned with the target keywords than the \
             competitor's - consider improving keyword density.",
            scorer::round1(gap.abs())
        )
    }
}
