use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::segmenter::TextSection;
use crate::vecmath::{cosine_similarity, Embedding};

/// Similarity score for one analysed section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentScore {
    pub title: String,
    pub score: f32,
    pub start_offset: usize,
    pub end_offset: usize,
    pub text: String,
}

/// Round to one decimal place. All user-visible percentages go through this.
pub fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// Raw similarity between the centroid and an embedding, clamped into
/// [-1, 1]. Floating point can push a cosine of near-parallel vectors
/// slightly outside the interval; the clamp keeps downstream percentages in
/// range.
pub fn similarity(centroid: &[f32], embedding: &[f32]) -> Result<f32> {
    Ok(cosine_similarity(centroid, embedding)?.clamp(-1.0, 1.0))
}

/// Percentage score for one embedding against the centroid, floored at 0
/// and rounded to one decimal. Negative alignment reads as 0% rather than a
/// negative percentage.
pub fn score_percent(centroid: &[f32], embedding: &[f32]) -> Result<f32> {
    let sim = similarity(centroid, embedding)?;
    Ok(round1((sim * 100.0).max(0.0)))
}

/// Score every section of one document against the centroid.
pub fn score_sections(
    centroid: &[f32],
    sections: &[TextSection],
    embeddings: &[Embedding],
) -> Result<Vec<SegmentScore>> {
    sections
        .iter()
        .zip(embeddings.iter())
        .map(|(section, embedding)| {
            Ok(SegmentScore {
                title: section.title.clone(),
                score: score_percent(centroid, embedding)?,
                start_offset: section.start_offset,
                end_offset: section.end_offset,
                text: section.content.clone(),
            })
        })
        .collect()
}

/// Chunked-mode aggregate: unweighted arithmetic mean of the section scores,
/// one decimal. Section granularity is assumed representative; the aggregate
/// is deliberately not re-derived from a separate whole-document embedding.
pub fn aggregate_score(section_scores: &[SegmentScore]) -> f32 {
    if section_scores.is_empty() {
        return 0.0;
    }
    let sum: f32 = section_scores.iter().map(|s| s.score).sum();
    round1(sum / section_scores.len() as f32)
}
