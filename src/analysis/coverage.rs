// ============================================
// SEMALIGN - Keyword Coverage Analyzer
// ============================================

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Keyword;
use crate::error::Result;
use crate::segmenter::TextSection;
use crate::vecmath::Embedding;

/// Competitor needs strictly more than 1.5x the user's mentions to count as
/// holding the advantage.
const COMPETITOR_ADVANTAGE_RATIO: f32 = 1.5;

/// Below this average similarity a keyword counts as globally under-covered.
const UNDER_COVERAGE_SIMILARITY: f32 = 0.3;

lazy_static! {
    /// Static related-term lookup keyed by lower-cased keyword. Best-effort
    /// enrichment, not semantically derived.
    static ref RELATED_TERMS: HashMap<&'static str, Vec<&'static str>> = {
        let mut m = HashMap::new();
        m.insert("seo", vec!["search engine optimization", "serp", "organic traffic", "ranking"]);
        m.insert("content", vec!["article", "blog", "copywriting", "editorial"]);
        m.insert("marketing", vec!["campaign", "promotion", "branding", "outreach"]);
        m.insert("keywords", vec!["search terms", "key phrases", "queries"]);
        m.insert("analytics", vec!["metrics", "tracking", "measurement", "reporting"]);
        m.insert("backlinks", vec!["link building", "inbound links", "referring domains"]);
        m.insert("conversion", vec!["conversion rate", "cta", "funnel", "landing page"]);
        m.insert("engagement", vec!["bounce rate", "dwell time", "click-through"]);
        m.insert("audience", vec!["readers", "visitors", "target market", "demographics"]);
        m.insert("strategy", vec!["plan", "roadmap", "approach", "framework"]);
        m
    };
}

/// Combined literal-mention and semantic-similarity presence of one keyword
/// within the user's document, with competitor mention data alongside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordCoverage {
    pub keyword: String,
    pub weight: f32,
    pub direct_mention_count: usize,
    pub semantic_coverage_percent: f32,
    pub strong_section_titles: Vec<String>,
    pub weak_section_titles: Vec<String>,
    pub related_terms_found: Vec<String>,
    pub competitor_has_advantage: bool,
    pub competitor_mention_count: usize,
}

/// Case-insensitive whole-word match count of the literal keyword. When no
/// whole-word match exists, falls back to a substring count so multi-word or
/// partial keywords still register coverage.
pub fn count_mentions(keyword: &str, text: &str) -> usize {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
    if let Ok(re) = Regex::new(&pattern) {
        let count = re.find_iter(text).count();
        if count > 0 {
            return count;
        }
    }
    if keyword.is_empty() {
        return 0;
    }
    text.to_lowercase().matches(&keyword.to_lowercase()).count()
}

/// Reclassification predicate: a keyword with no literal mentions, or whose
/// average section similarity is poor, is under-covered everywhere even when
/// no individual section fell below the weak threshold.
pub fn is_globally_under_covered(direct_mentions: usize, avg_similarity: f32) -> bool {
    direct_mentions == 0 || avg_similarity < UNDER_COVERAGE_SIMILARITY
}

/// Related-table terms that literally appear in the document.
pub fn related_terms_found(keyword: &str, text: &str) -> Vec<String> {
    let lower_text = text.to_lowercase();
    RELATED_TERMS
        .get(keyword.to_lowercase().as_str())
        .map(|terms| {
            terms
                .iter()
                .filter(|term| lower_text.contains(&term.to_lowercase()))
                .map(|term| term.to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Compute coverage for every keyword against the user's document, reusing
/// the embeddings the orchestrator already produced. Section embeddings are
/// computed once per run and shared across all keywords; only the keyword
/// embedding differs per comparison.
pub fn analyze_coverage(
    keywords: &[Keyword],
    keyword_embeddings: &[Embedding],
    sections: &[TextSection],
    section_embeddings: &[Embedding],
    main_text: &str,
    competitor_text: &str,
) -> Result<Vec<KeywordCoverage>> {
    let mut coverage = Vec::with_capacity(keywords.len());

    for (keyword, keyword_embedding) in keywords.iter().zip(keyword_embeddings.iter()) {
        let direct_mention_count = count_mentions(&keyword.text, main_text);
        let competitor_mention_count = count_mentions(&keyword.text, competitor_text);

        // Per-section similarity in normalized units, negatives floored
        let mut similarities = Vec::with_capacity(sections.len());
        for section_embedding in section_embeddings {
            let sim = super::scorer::similarity(keyword_embedding, section_embedding)?;
            similarities.push(sim.max(0.0));
        }

        let avg = if similarities.is_empty() {
            0.0
        } else {
            similarities.iter().sum::<f32>() / similarities.len() as f32
        };

        let strong_threshold = (avg * 1.2).max(0.3);
        let weak_threshold = (avg * 0.8).max(0.2);

        let strong_section_titles: Vec<String> = sections
            .iter()
            .zip(similarities.iter())
            .filter(|(_, &sim)| sim > strong_threshold)
            .map(|(section, _)| section.title.clone())
            .collect();

        let mut weak_section_titles: Vec<String> = sections
            .iter()
            .zip(similarities.iter())
            .filter(|(_, &sim)| sim < weak_threshold)
            .map(|(section, _)| section.title.clone())
            .collect();

        // A poorly-covered keyword must yield at least one actionable weak
        // section; mark all of them weak when none fell under the threshold.
        if weak_section_titles.is_empty()
            && is_globally_under_covered(direct_mention_count, avg)
        {
            weak_section_titles = sections.iter().map(|s| s.title.clone()).collect();
        }

        let competitor_has_advantage = competitor_mention_count as f32
            > direct_mention_count as f32 * COMPETITOR_ADVANTAGE_RATIO;

        coverage.push(KeywordCoverage {
            keyword: keyword.text.clone(),
            weight: keyword.weight,
            direct_mention_count,
            semantic_coverage_percent: super::scorer::round1(avg * 100.0),
            strong_section_titles,
            weak_section_titles,
            related_terms_found: related_terms_found(&keyword.text, main_text),
            competitor_has_advantage,
            competitor_mention_count,
        });
    }

    Ok(coverage)
}
