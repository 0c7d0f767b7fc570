use colored::Colorize;

use crate::analysis::{AnalysisResult, ScorePrediction};

pub struct Console;

impl Console {
    pub fn new() -> Self {
        Self
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", "[INFO]".blue(), message);
    }

    pub fn warn(&self, message: &str) {
        println!("{} {}", "[WARN]".yellow(), message);
    }

    pub fn error(&self, message: &str) {
        println!("{} {}", "[ERROR]".red(), message);
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", "[OK]".green(), message);
    }

    /// Print the full analysis report.
    pub fn report(&self, result: &AnalysisResult, predictions: &[ScorePrediction], cumulative: f32) {
        println!("\n{}", "ALIGNMENT SCORES".bold().underline());
        println!("{}", "─".repeat(50));
        println!(
            "  Your content:       {}",
            format!("{:.1}%", result.main_score_percent).cyan().bold()
        );
        println!(
            "  Competitor content: {}",
            format!("{:.1}%", result.competitor_score_percent).cyan()
        );
        println!("  {}", result.gap_analysis_text.dimmed());

        if let Some(sections) = &result.main_sections {
            println!("\n{}", "YOUR SECTIONS".bold().underline());
            println!("{}", "─".repeat(50));
            for section in sections {
                println!(
                    "  {:>6} {}",
                    format!("{:.1}%", section.score).cyan(),
                    section.title
                );
            }
        }

        println!("\n{}", "KEYWORD COVERAGE".bold().underline());
        println!("{}", "─".repeat(50));
        for coverage in &result.keyword_coverage {
            let advantage = if coverage.competitor_has_advantage {
                " (competitor advantage)".red().to_string()
            } else {
                String::new()
            };
            println!(
                "  {} {} mentions, {:.1}% semantic coverage{}",
                format!("\"{}\"", coverage.keyword).bold(),
                coverage.direct_mention_count,
                coverage.semantic_coverage_percent,
                advantage
            );
            if !coverage.weak_section_titles.is_empty() {
                println!(
                    "      weak in: {}",
                    coverage.weak_section_titles.join(", ").dimmed()
                );
            }
            if !coverage.related_terms_found.is_empty() {
                println!(
                    "      related terms present: {}",
                    coverage.related_terms_found.join(", ").dimmed()
                );
            }
        }

        println!("\n{}", "SUGGESTED IMPROVEMENTS".bold().underline());
        println!("{}", "─".repeat(50));
        for improvement in &result.section_improvements {
            println!(
                "  {} ({:.1}%)",
                improvement.section_title.bold(),
                improvement.current_score_percent
            );
            if !improvement.missing_keywords.is_empty() {
                println!(
                    "      add: {}",
                    improvement.missing_keywords.join(", ").yellow()
                );
            }
            for phrase in &improvement.suggested_phrases {
                println!("      try: {}", format!("\"{}\"", phrase).dimmed());
            }
        }

        if !predictions.is_empty() {
            println!("\n{}", "PREDICTED GAINS".bold().underline());
            println!("{}", "─".repeat(50));
            for prediction in predictions {
                println!(
                    "  {} {} -> {} mentions, +{:.1}% (to {:.1}%)",
                    format!("\"{}\"", prediction.keyword).bold(),
                    prediction.current_mention_count,
                    prediction.suggested_mention_count,
                    prediction.impact_percent,
                    prediction.predicted_score_percent
                );
            }
            println!(
                "  Combined (diminishing returns): {}",
                format!("{:.1}%", cumulative).green().bold()
            );
        }

        println!(
            "\n{}",
            format!("Completed in {} ms", result.processing_time_ms).dimmed()
        );
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
