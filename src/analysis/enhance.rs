// ============================================
// SEMALIGN - Enhancement Prompt Builder
// ============================================

use crate::error::Result;
use crate::providers::CompletionProvider;

use super::recommend::SectionImprovement;

const SYSTEM_PROMPT: &str = "You are an expert content editor. You rewrite text to \
incorporate target keywords while preserving the author's voice. Return only the \
rewritten text, with no commentary.";

/// Build the rewrite instruction handed to the completion provider: the
/// original text verbatim, the per-section recommendations, and five fixed
/// editorial constraints.
pub fn build_enhancement_prompt(
    original_text: &str,
    improvements: &[SectionImprovement],
) -> String {
    let mut prompt = String::new();

    prompt.push_str("Rewrite the following text so it incorporates the recommended keywords and phrases.\n\n");
    prompt.push_str("=== ORIGINAL TEXT ===\n");
    prompt.push_str(original_text);
    prompt.push_str("\n=== END ORIGINAL TEXT ===\n\n");

    if !improvements.is_empty() {
        prompt.push_str("Recommendations by section:\n");
        for improvement in improvements {
            prompt.push_str(&format!(
                "\nSection: {} (current alignment {:.1}%)\n",
                improvement.section_title, improvement.current_score_percent
            ));
            if !improvement.missing_keywords.is_empty() {
                prompt.push_str(&format!(
                    "  Missing keywords: {}\n",
                    improvement.missing_keywords.join(", ")
                ));
            }
            if !improvement.suggested_phrases.is_empty() {
                prompt.push_str(&format!(
                    "  Suggested phrases: {}\n",
                    improvement.suggested_phrases.join("; ")
                ));
            }
        }
        prompt.push('\n');
    }

    prompt.push_str(
        "Constraints:\n\
         1. Insert keywords naturally; never stuff them.\n\
         2. Preserve the original tone and voice.\n\
         3. Preserve the document structure and headings.\n\
         4. Make the minimal changes needed to cover the keywords.\n\
         5. The result must read as natural, flowing text.\n",
    );

    prompt
}

/// Run the enhancement flow. The single graceful fallback in the system:
/// an empty completion returns the original text instead of failing.
pub async fn enhance_text(
    provider: &dyn CompletionProvider,
    original_text: &str,
    improvements: &[SectionImprovement],
) -> Result<String> {
    let prompt = build_enhancement_prompt(original_text, improvements);
    let rewritten = provider.complete(SYSTEM_PROMPT, &prompt).await?;

    if rewritten.trim().is_empty() {
        tracing::warn!("completion provider returned empty content, keeping original text");
        return Ok(original_text.to_string());
    }

    Ok(rewritten)
}
