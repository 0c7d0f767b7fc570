// ============================================
// SEMALIGN - Analysis Engine Integration Tests
// ============================================

mod analysis_tests {
    use std::sync::Arc;

    use semalign::analysis::{
        calculate_cumulative_impact, calculate_score_predictions, enhance_text, AnalysisMode,
        AnalysisRequest, Analyzer, AnalyzerOptions, Keyword,
    };
    use semalign::providers::{MockCompletionProvider, MockEmbeddingProvider};
    use semalign::AnalysisError;

    fn analyzer() -> Analyzer {
        Analyzer::new(Arc::new(MockEmbeddingProvider::new(64)))
    }

    /// Build a document of exactly `total` words where `keyword_counts`
    /// pairs are spliced in as whole words among neutral filler.
    fn document(total: usize, keyword_counts: &[(&str, usize)]) -> String {
        let mut words: Vec<String> = Vec::with_capacity(total);
        for (keyword, count) in keyword_counts {
            for _ in 0..*count {
                words.push(keyword.to_string());
            }
        }
        while words.len() < total {
            words.push("filler".to_string());
        }
        words.join(" ")
    }

    /// End-to-end example: the user mentions "SEO" five times against the
    /// competitor's one, so the user holds the mention advantage.
    #[tokio::test]
    async fn test_end_to_end_keyword_coverage() {
        let request = AnalysisRequest {
            keywords: vec![Keyword::new("SEO", 3.0), Keyword::new("content", 1.0)],
            main_text: document(200, &[("SEO", 5), ("content", 1)]),
            competitor_text: document(200, &[("SEO", 1)]),
            mode: AnalysisMode::Chunked,
        };

        let result = analyzer().analyze(&request).await.unwrap();

        let seo = result
            .keyword_coverage
            .iter()
            .find(|c| c.keyword == "SEO")
            .unwrap();
        assert_eq!(seo.direct_mention_count, 5);
        assert_eq!(seo.competitor_mention_count, 1);
        assert!(!seo.competitor_has_advantage);

        let content = result
            .keyword_coverage
            .iter()
            .find(|c| c.keyword == "content")
            .unwrap();
        assert_eq!(content.direct_mention_count, 1);
        assert_eq!(content.competitor_mention_count, 0);
    }

    /// Chunked mode exposes per-section scores; full mode does not.
    #[tokio::test]
    async fn test_mode_controls_section_output() {
        let main = "<h2>Intro</h2>first part\n<h2>Body</h2>second part";
        let competitor = "<h2>Alpha</h2>their intro\n<h2>Beta</h2>their body";

        let mut request = AnalysisRequest {
            keywords: vec![Keyword::new("topic", 1.0)],
            main_text: main.to_string(),
            competitor_text: competitor.to_string(),
            mode: AnalysisMode::Chunked,
        };

        let result = analyzer().analyze(&request).await.unwrap();
        let sections = result.main_sections.as_ref().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Intro");
        assert_eq!(result.competitor_sections.as_ref().unwrap().len(), 2);

        request.mode = AnalysisMode::Full;
        let result = analyzer().analyze(&request).await.unwrap();
        assert!(result.main_sections.is_none());
        assert!(result.competitor_sections.is_none());
    }

    /// Scores stay inside [0, 100] and the result echoes the keyword weights.
    #[tokio::test]
    async fn test_result_invariants() {
        let request = AnalysisRequest {
            keywords: vec![Keyword::new("alignment", 2.0)],
            main_text: "Some ordinary article body.\n\nA second paragraph of prose.".to_string(),
            competitor_text: "Entirely different competitor material.".to_string(),
            mode: AnalysisMode::Chunked,
        };

        let result = analyzer().analyze(&request).await.unwrap();

        assert!((0.0..=100.0).contains(&result.main_score_percent));
        assert!((0.0..=100.0).contains(&result.competitor_score_percent));
        for section in result.main_sections.as_ref().unwrap() {
            assert!((0.0..=100.0).contains(&section.score));
        }
        assert_eq!(result.keyword_weights.len(), 1);
        assert_eq!(result.keyword_weights[0].text, "alignment");
        assert!(!result.section_improvements.is_empty());
    }

    /// Identical documents tie, and a tie reads as "less aligned" with a
    /// 0.0% gap.
    #[tokio::test]
    async fn test_gap_boundary_tie_is_less_aligned() {
        let text = "The very same article text on both sides.";
        let request = AnalysisRequest {
            keywords: vec![Keyword::new("article", 1.0)],
            main_text: text.to_string(),
            competitor_text: text.to_string(),
            mode: AnalysisMode::Full,
        };

        let result = analyzer().analyze(&request).await.unwrap();
        assert_eq!(result.main_score_percent, result.competitor_score_percent);
        assert!(result.gap_analysis_text.contains("0.0% less aligned"));
    }

    /// Invalid requests are rejected before any provider call.
    #[tokio::test]
    async fn test_invalid_input_rejected() {
        let request = AnalysisRequest {
            keywords: vec![],
            main_text: "text".to_string(),
            competitor_text: "text".to_string(),
            mode: AnalysisMode::Full,
        };
        let err = analyzer().analyze(&request).await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));

        let request = AnalysisRequest {
            keywords: vec![Keyword::new("seo", 99.0)],
            main_text: "text".to_string(),
            competitor_text: "text".to_string(),
            mode: AnalysisMode::Full,
        };
        let err = analyzer().analyze(&request).await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    /// Unstructured chunked-mode text falls back to fixed windows, giving
    /// multiple analysis units.
    #[tokio::test]
    async fn test_chunked_mode_windows_unstructured_text() {
        let long_text: String = (0..1200)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ");

        let request = AnalysisRequest {
            keywords: vec![Keyword::new("word7", 1.0)],
            main_text: long_text.clone(),
            competitor_text: long_text,
            mode: AnalysisMode::Chunked,
        };

        let analyzer = Analyzer::with_options(
            Arc::new(MockEmbeddingProvider::new(32)),
            AnalyzerOptions {
                max_concurrent_embeddings: 2,
                chunk_words: 500,
                overlap_words: 100,
            },
        );
        let result = analyzer.analyze(&request).await.unwrap();
        let sections = result.main_sections.as_ref().unwrap();
        assert_eq!(sections.len(), 3);
        assert!(sections[0].title.starts_with("Chunk"));
    }

    /// Predictions derived from an analysis stay capped, sorted, and
    /// combine under 100%.
    #[tokio::test]
    async fn test_predictions_from_analysis() {
        let keywords: Vec<Keyword> = (0..8)
            .map(|i| Keyword::new(format!("absent{}", i), 1.0 + i as f32))
            .collect();
        let request = AnalysisRequest {
            keywords,
            main_text: document(120, &[]),
            competitor_text: document(120, &[("absent0", 4)]),
            mode: AnalysisMode::Chunked,
        };

        let result = analyzer().analyze(&request).await.unwrap();
        let predictions =
            calculate_score_predictions(&result.keyword_coverage, result.main_score_percent);

        assert!(predictions.len() <= 5);
        for pair in predictions.windows(2) {
            assert!(pair[0].impact_percent >= pair[1].impact_percent);
        }

        let cumulative = calculate_cumulative_impact(&predictions);
        assert!(cumulative <= 100.0);
        assert!(cumulative >= result.main_score_percent.min(100.0));
    }

    /// The enhancement flow wires analysis output into the completion
    /// provider and falls back to the original on empty content.
    #[tokio::test]
    async fn test_enhance_flow() {
        let request = AnalysisRequest {
            keywords: vec![Keyword::new("seo", 3.0)],
            main_text: "A short draft without the target terms.".to_string(),
            competitor_text: "Competitor copy about seo and more seo.".to_string(),
            mode: AnalysisMode::Full,
        };
        let result = analyzer().analyze(&request).await.unwrap();

        let provider = MockCompletionProvider::new("An improved draft about seo.");
        let rewritten = enhance_text(&provider, &request.main_text, &result.section_improvements)
            .await
            .unwrap();
        assert_eq!(rewritten, "An improved draft about seo.");

        let empty = MockCompletionProvider::empty();
        let kept = enhance_text(&empty, &request.main_text, &result.section_improvements)
            .await
            .unwrap();
        assert_eq!(kept, request.main_text);
    }
}
