// ============================================
// SEMALIGN - Improvement Recommender
// ============================================

use serde::{Deserialize, Serialize};

use super::coverage::KeywordCoverage;
use super::scorer::{round1, SegmentScore};

/// Maximum missing keywords surfaced per section
const MAX_MISSING_PER_SECTION: usize = 3;
/// Maximum score predictions retained
const MAX_PREDICTIONS: usize = 5;
/// Semantic coverage below this marks a keyword as missing from a section
const MISSING_COVERAGE_PERCENT: f32 = 50.0;
/// Semantic coverage below this makes a keyword eligible for prediction
const PREDICTION_COVERAGE_PERCENT: f32 = 60.0;
/// Multiplicative decay applied per keyword when combining impacts
const DIMINISHING_FACTOR: f32 = 0.8;

/// Short phrase templates a missing keyword is instantiated into. Selection
/// cycles deterministically by index so repeated runs produce identical
/// suggestions. Placeholder text generation, not NLP-grounded.
const PHRASE_TEMPLATES: [&str; 5] = [
    "effective {keyword} strategies",
    "a comprehensive guide to {keyword}",
    "proven {keyword} techniques",
    "why {keyword} matters for your audience",
    "how to improve your {keyword} approach",
];

/// Actionable suggestions for one section of the user's document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionImprovement {
    pub section_title: String,
    pub current_score_percent: f32,
    pub missing_keywords: Vec<String>,
    pub suggested_phrases: Vec<String>,
    pub competitor_strengths: Vec<String>,
}

/// Predicted score gain from improving one keyword's coverage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorePrediction {
    pub keyword: String,
    pub current_mention_count: usize,
    pub suggested_mention_count: usize,
    pub current_score_percent: f32,
    pub predicted_score_percent: f32,
    pub impact_percent: f32,
}

fn instantiate_template(index: usize, keyword: &str) -> String {
    PHRASE_TEMPLATES[index % PHRASE_TEMPLATES.len()].replace("{keyword}", keyword)
}

/// Derive per-section improvements from the coverage records.
///
/// A keyword is missing from a section when the section is listed among its
/// weak sections, or it has zero mentions, or its semantic coverage is below
/// 50%. Sections never come out empty-handed: with no qualifying keyword the
/// top three keywords by weight are suggested instead.
pub fn section_improvements(
    section_scores: &[SegmentScore],
    coverage: &[KeywordCoverage],
) -> Vec<SectionImprovement> {
    let mut template_cursor = 0;

    // Fallback candidates: heaviest keywords first
    let mut by_weight: Vec<&KeywordCoverage> = coverage.iter().collect();
    by_weight.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let competitor_strengths: Vec<String> = coverage
        .iter()
        .filter(|c| c.competitor_has_advantage)
        .map(|c| {
            format!(
                "competitor mentions \"{}\" {} times (you: {})",
                c.keyword, c.competitor_mention_count, c.direct_mention_count
            )
        })
        .collect();

    section_scores
        .iter()
        .map(|section| {
            let mut missing: Vec<String> = coverage
                .iter()
                .filter(|c| {
                    c.weak_section_titles.contains(&section.title)
                        || c.direct_mention_count == 0
                        || c.semantic_coverage_percent < MISSING_COVERAGE_PERCENT
                })
                .map(|c| c.keyword.clone())
                .collect();

            if missing.is_empty() {
                missing = by_weight
                    .iter()
                    .take(MAX_MISSING_PER_SECTION)
                    .map(|c| c.keyword.clone())
                    .collect();
            }
            missing.truncate(MAX_MISSING_PER_SECTION);

            let suggested_phrases: Vec<String> = missing
                .iter()
                .map(|keyword| {
                    let phrase = instantiate_template(template_cursor, keyword);
                    template_cursor += 1;
                    phrase
                })
                .collect();

            SectionImprovement {
                section_title: section.title.clone(),
                current_score_percent: section.score,
                missing_keywords: missing,
                suggested_phrases,
                competitor_strengths: competitor_strengths.clone(),
            }
        })
        .collect()
}

/// What-if predictions for the keywords with the weakest coverage, ranked by
/// impact descending, at most five retained.
///
/// Impact is capped at `10 * weight` percentage points and scaled by how
/// incomplete the keyword's coverage currently is.
pub fn calculate_score_predictions(
    coverage: &[KeywordCoverage],
    current_score_percent: f32,
) -> Vec<ScorePrediction> {
    let mut predictions: Vec<ScorePrediction> = coverage
        .iter()
        .filter(|c| {
            c.direct_mention_count == 0
                || c.semantic_coverage_percent < PREDICTION_COVERAGE_PERCENT
        })
        .map(|c| {
            let suggested_mention_count = if c.competitor_mention_count > 0 {
                ((c.competitor_mention_count as f32 * 0.8).ceil() as usize).max(3)
            } else {
                3
            };

            let impact_percent = round1(
                ((100.0 - c.semantic_coverage_percent) / 100.0) * 10.0 * c.weight,
            );

            ScorePrediction {
                keyword: c.keyword.clone(),
                current_mention_count: c.direct_mention_count,
                suggested_mention_count,
                current_score_percent,
                predicted_score_percent: (current_score_percent + impact_percent).min(100.0),
                impact_percent,
            }
        })
        .collect();

    predictions.sort_by(|a, b| {
        b.impact_percent
            .partial_cmp(&a.impact_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    predictions.truncate(MAX_PREDICTIONS);
    predictions
}

/// Combine prediction impacts into one cumulative estimate with diminishing
/// returns: the factor starts at 1.0 and is multiplied by 0.8 after each
/// keyword applied. Real-world gains overlap; straight addition would
/// overpromise. Returns 0 for an empty prediction list.
pub fn calculate_cumulative_impact(predictions: &[ScorePrediction]) -> f32 {
    let Some(first) = predictions.first() else {
        return 0.0;
    };

    let mut total = first.current_score_percent;
    let mut factor = 1.0f32;
    for prediction in predictions {
        total += prediction.impact_percent * factor;
        factor *= DIMINISHING_FACTOR;
    }

    round1(total.min(100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(keyword: &str, weight: f32, mentions: usize, percent: f32) -> KeywordCoverage {
        KeywordCoverage {
            keyword: keyword.to_string(),
            weight,
            direct_mention_count: mentions,
            semantic_coverage_percent: percent,
            strong_section_titles: vec![],
            weak_section_titles: vec![],
            related_terms_found: vec![],
            competitor_has_advantage: false,
            competitor_mention_count: 0,
        }
    }

    fn segment(title: &str, score: f32) -> SegmentScore {
        SegmentScore {
            title: title.to_string(),
            score,
            start_offset: 0,
            end_offset: 0,
            text: String::new(),
        }
    }

    #[test]
    fn test_missing_keywords_capped_at_3() {
        let sections = vec![segment("Intro", 70.0)];
        let cov = vec![
            coverage("a", 1.0, 0, 10.0),
            coverage("b", 1.0, 0, 10.0),
            coverage("c", 1.0, 0, 10.0),
            coverage("d", 1.0, 0, 10.0),
        ];
        let improvements = section_improvements(&sections, &cov);
        assert_eq!(improvements[0].missing_keywords.len(), 3);
        assert_eq!(improvements[0].suggested_phrases.len(), 3);
    }

    #[test]
    fn test_well_covered_section_gets_fallback_suggestions() {
        let sections = vec![segment("Intro", 90.0)];
        // All keywords healthy: mentioned, high coverage, no weak sections
        let cov = vec![
            coverage("alpha", 1.0, 4, 80.0),
            coverage("beta", 3.0, 6, 85.0),
        ];
        let improvements = section_improvements(&sections, &cov);
        // Fallback picks top keywords by weight, never leaves the section empty
        assert_eq!(
            improvements[0].missing_keywords,
            vec!["beta".to_string(), "alpha".to_string()]
        );
    }

    #[test]
    fn test_weak_section_listing_selects_keyword() {
        let sections = vec![segment("Weak Spot", 40.0), segment("Strong", 90.0)];
        let mut c = coverage("gamma", 1.0, 5, 75.0);
        c.weak_section_titles = vec!["Weak Spot".to_string()];
        let cov = vec![c, coverage("delta", 1.0, 5, 80.0)];

        let improvements = section_improvements(&sections, &cov);
        // Weak Spot lists gamma directly; delta does not qualify there
        assert_eq!(improvements[0].missing_keywords, vec!["gamma".to_string()]);
        // Strong has no qualifying keyword and falls back to top keywords
        assert_eq!(improvements[1].missing_keywords.len(), 2);
    }

    #[test]
    fn test_phrases_are_deterministic() {
        let sections = vec![segment("Intro", 70.0)];
        let cov = vec![coverage("seo", 1.0, 0, 10.0)];
        let a = section_improvements(&sections, &cov);
        let b = section_improvements(&sections, &cov);
        assert_eq!(a[0].suggested_phrases, b[0].suggested_phrases);
        assert!(a[0].suggested_phrases[0].contains("seo"));
    }

    #[test]
    fn test_competitor_strengths_reported() {
        let sections = vec![segment("Intro", 70.0)];
        let mut c = coverage("seo", 1.0, 1, 80.0);
        c.competitor_has_advantage = true;
        c.competitor_mention_count = 6;
        let improvements = section_improvements(&sections, &[c]);
        assert_eq!(improvements[0].competitor_strengths.len(), 1);
        assert!(improvements[0].competitor_strengths[0].contains("seo"));
    }

    #[test]
    fn test_predictions_capped_and_sorted() {
        let cov: Vec<KeywordCoverage> = (0..8)
            .map(|i| coverage(&format!("kw{}", i), 1.0 + i as f32 * 0.5, 0, 20.0))
            .collect();
        let predictions = calculate_score_predictions(&cov, 50.0);

        assert!(predictions.len() <= 5);
        for pair in predictions.windows(2) {
            assert!(pair[0].impact_percent >= pair[1].impact_percent);
        }
        // Heaviest keyword carries the largest impact
        assert_eq!(predictions[0].keyword, "kw7");
    }

    #[test]
    fn test_prediction_impact_formula() {
        // ((100 - 40) / 100) * 10 * 3 = 18.0
        let cov = vec![coverage("main topic", 3.0, 0, 40.0)];
        let predictions = calculate_score_predictions(&cov, 60.0);
        assert_eq!(predictions[0].impact_percent, 18.0);
        assert_eq!(predictions[0].predicted_score_percent, 78.0);
    }

    #[test]
    fn test_prediction_skips_healthy_keywords() {
        let cov = vec![coverage("healthy", 1.0, 4, 75.0)];
        assert!(calculate_score_predictions(&cov, 60.0).is_empty());
    }

    #[test]
    fn test_suggested_mentions_from_competitor() {
        let mut c = coverage("seo", 1.0, 0, 20.0);
        c.competitor_mention_count = 10;
        let predictions = calculate_score_predictions(&[c], 50.0);
        // ceil(10 * 0.8) = 8
        assert_eq!(predictions[0].suggested_mention_count, 8);

        let mut c = coverage("seo", 1.0, 0, 20.0);
        c.competitor_mention_count = 2;
        let predictions = calculate_score_predictions(&[c], 50.0);
        // ceil(2 * 0.8) = 2, floored at 3
        assert_eq!(predictions[0].suggested_mention_count, 3);

        let c = coverage("seo", 1.0, 0, 20.0);
        let predictions = calculate_score_predictions(&[c], 50.0);
        assert_eq!(predictions[0].suggested_mention_count, 3);
    }

    #[test]
    fn test_predicted_score_clamped_at_100() {
        let cov = vec![coverage("huge", 10.0, 0, 0.0)];
        let predictions = calculate_score_predictions(&cov, 95.0);
        assert_eq!(predictions[0].predicted_score_percent, 100.0);
    }

    #[test]
    fn test_cumulative_impact_empty_is_0() {
        assert_eq!(calculate_cumulative_impact(&[]), 0.0);
    }

    #[test]
    fn test_cumulative_impact_diminishes() {
        let cov = vec![
            coverage("a", 2.0, 0, 0.0), // impact 20
            coverage("b", 1.0, 0, 0.0), // impact 10
        ];
        let predictions = calculate_score_predictions(&cov, 40.0);
        // 40 + 20*1.0 + 10*0.8 = 68
        assert_eq!(calculate_cumulative_impact(&predictions), 68.0);
    }

    #[test]
    fn test_cumulative_impact_clamped_and_monotone() {
        let mut cov: Vec<KeywordCoverage> = Vec::new();
        let mut last = 0.0;
        for i in 0..5 {
            cov.push(coverage(&format!("k{}", i), 5.0, 0, 10.0));
            let predictions = calculate_score_predictions(&cov, 70.0);
            let cumulative = calculate_cumulative_impact(&predictions);
            assert!(cumulative <= 100.0);
            assert!(cumulative >= last);
            last = cumulative;
        }
    }
}
