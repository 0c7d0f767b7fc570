// ============================================
// SEMALIGN - Embedding Orchestrator
// ============================================

use std::sync::Arc;

use futures::future::try_join_all;
use tokio::sync::Semaphore;

use crate::error::{AnalysisError, Result};
use crate::providers::EmbeddingProvider;
use crate::segmenter::{self, TextSection};
use crate::vecmath::Embedding;

use super::Keyword;

/// One document's analysis units with their embeddings, computed once per
/// run. The coverage analyzer reuses these embeddings for every keyword;
/// only the keyword embedding differs per comparison.
#[derive(Debug)]
pub(crate) struct DocumentEmbeddings {
    pub sections: Vec<TextSection>,
    pub embeddings: Vec<Embedding>,
}

/// Request one embedding per keyword, concurrently. All-or-nothing: a single
/// provider failure fails the whole run.
pub(crate) async fn embed_keywords(
    provider: &dyn EmbeddingProvider,
    keywords: &[Keyword],
) -> Result<Vec<Embedding>> {
    tracing::debug!(count = keywords.len(), "embedding keywords");
    try_join_all(keywords.iter().map(|k| provider.embed(&k.text))).await
}

/// Analysis units for chunked mode: the tiered segmenter's output, except
/// that a single fallback section means the document has no usable structure
/// and the fixed-window splitter takes over.
pub(crate) fn chunked_sections(
    text: &str,
    chunk_words: usize,
    overlap_words: usize,
) -> Vec<TextSection> {
    let sections = segmenter::segment(text);
    if sections.len() > 1 {
        return sections;
    }
    // Sanitize config-sourced values so the splitter's invariants hold
    let chunk_words = chunk_words.max(1);
    let overlap_words = overlap_words.min(chunk_words - 1);
    let windows = segmenter::split_fixed_windows(text, chunk_words, overlap_words);
    if windows.is_empty() {
        sections
    } else {
        windows
    }
}

/// Embed every section of one document with a bounded concurrent fan-out.
/// The bound keeps the O(sections) burst from overwhelming the provider;
/// nothing is retried here.
pub(crate) async fn embed_document(
    provider: &dyn EmbeddingProvider,
    sections: Vec<TextSection>,
    max_concurrent: usize,
) -> Result<DocumentEmbeddings> {
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    tracing::debug!(
        sections = sections.len(),
        max_concurrent,
        "embedding document sections"
    );

    let embeddings = try_join_all(sections.iter().map(|section| {
        let semaphore = Arc::clone(&semaphore);
        async move {
            let _permit = semaphore.acquire().await.map_err(|_| {
                AnalysisError::ProviderUnavailable("embedding pool closed".into())
            })?;
            provider.embed(&section.content).await
        }
    }))
    .await?;

    Ok(DocumentEmbeddings {
        sections,
        embeddings,
    })
}

/// Full-mode variant: the whole document is one analysis unit, embedded once.
pub(crate) async fn embed_whole_document(
    provider: &dyn EmbeddingProvider,
    text: &str,
) -> Result<DocumentEmbeddings> {
    let lead = text.len() - text.trim_start().len();
    let trail = text.len() - text.trim_end().len();
    let section = TextSection {
        title: "Full Content".to_string(),
        content: text.trim().to_string(),
        start_offset: lead,
        end_offset: text.len() - trail,
        level: 0,
        kind: segmenter::SectionKind::FallbackChunk,
    };
    let embedding = provider.embed(&section.content).await?;
    Ok(DocumentEmbeddings {
        sections: vec![section],
        embeddings: vec![embedding],
    })
}
