// ============================================
// SEMALIGN - Text Segmenter
// ============================================

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default fixed-window size in words
pub const DEFAULT_CHUNK_WORDS: usize = 500;
/// Default overlap between consecutive windows in words
pub const DEFAULT_OVERLAP_WORDS: usize = 100;

lazy_static! {
    static ref HTML_HEADING: Regex =
        Regex::new(r"(?is)<h([1-6])[^>]*>(.*?)</h[1-6]\s*>").unwrap();
    static ref MARKDOWN_HEADING: Regex =
        Regex::new(r"(?m)^(#{1,6})[ \t]+(.+?)[ \t#]*\r?$").unwrap();
    static ref INNER_MARKUP: Regex = Regex::new(r"<[^>]+>|[*_`]").unwrap();
    static ref PARAGRAPH_BREAK: Regex = Regex::new(r"\r?\n[ \t]*\r?\n").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Heading,
    Paragraph,
    FallbackChunk,
}

/// A titled, contiguous span of one source document.
///
/// Offsets are character indices into the source text for every tier,
/// including fixed-window chunking. Sections from one document are in
/// document order and never overlap in content (fixed windows are the
/// deliberate exception: consecutive windows share their overlap words).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSection {
    pub title: String,
    pub content: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub level: usize,
    pub kind: SectionKind,
}

/// Split a document into semantically meaningful sections.
///
/// Tiered fallback, first successful tier wins:
/// 1. HTML or Markdown headings (needs at least 2 sections)
/// 2. Blank-line paragraphs (needs at least 2 non-empty paragraphs)
/// 3. The whole document as a single "Full Content" section
pub fn segment(text: &str) -> Vec<TextSection> {
    if let Some(sections) = segment_by_headings(text) {
        return sections;
    }
    if let Some(sections) = segment_by_paragraphs(text) {
        return sections;
    }
    vec![full_content_section(text)]
}

fn full_content_section(text: &str) -> TextSection {
    TextSection {
        title: "Full Content".to_string(),
        content: text.trim().to_string(),
        start_offset: 0,
        end_offset: text.len(),
        level: 0,
        kind: SectionKind::FallbackChunk,
    }
}

/// Tier 1: heading-delimited sections. Returns None when fewer than two
/// headings are found in either markup style.
fn segment_by_headings(text: &str) -> Option<Vec<TextSection>> {
    // (heading_start, content_start, level, raw_title)
    let html: Vec<(usize, usize, usize, String)> = HTML_HEADING
        .captures_iter(text)
        .map(|cap| {
            let whole = cap.get(0).unwrap();
            let level = cap[1].parse::<usize>().unwrap_or(1);
            (whole.start(), whole.end(), level, cap[2].to_string())
        })
        .collect();

    let headings = if html.len() >= 2 {
        html
    } else {
        let markdown: Vec<(usize, usize, usize, String)> = MARKDOWN_HEADING
            .captures_iter(text)
            .map(|cap| {
                let whole = cap.get(0).unwrap();
                let level = cap[1].len();
                (whole.start(), whole.end(), level, cap[2].to_string())
            })
            .collect();
        if markdown.len() >= 2 {
            markdown
        } else {
            return None;
        }
    };

    let mut sections = Vec::with_capacity(headings.len());
    for (i, (start, content_start, level, raw_title)) in headings.iter().enumerate() {
        let end = headings
            .get(i + 1)
            .map(|(next_start, _, _, _)| *next_start)
            .unwrap_or(text.len());

        let title = strip_inner_markup(raw_title);
        let title = if title.is_empty() {
            format!("Section {}", i + 1)
        } else {
            title
        };

        sections.push(TextSection {
            title,
            content: text[*content_start..end].trim().to_string(),
            start_offset: *start,
            end_offset: end,
            level: *level,
            kind: SectionKind::Heading,
        });
    }

    Some(sections)
}

/// Tier 2: blank-line-delimited paragraphs. Returns None when fewer than two
/// non-empty paragraphs result.
fn segment_by_paragraphs(text: &str) -> Option<Vec<TextSection>> {
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut cursor = 0;
    for sep in PARAGRAPH_BREAK.find_iter(text) {
        spans.push((cursor, sep.start()));
        cursor = sep.end();
    }
    spans.push((cursor, text.len()));

    let mut sections = Vec::new();
    for (start, end) in spans {
        let raw = &text[start..end];
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        // Tighten offsets to the trimmed content
        let lead = raw.len() - raw.trim_start().len();
        let trail = raw.len() - raw.trim_end().len();
        sections.push(TextSection {
            title: format!("Paragraph {}", sections.len() + 1),
            content: trimmed.to_string(),
            start_offset: start + lead,
            end_offset: end - trail,
            level: 0,
            kind: SectionKind::Paragraph,
        });
    }

    if sections.len() >= 2 {
        Some(sections)
    } else {
        None
    }
}

fn strip_inner_markup(title: &str) -> String {
    INNER_MARKUP.replace_all(title, "").trim().to_string()
}

/// Split a document into fixed word-count windows with fixed word overlap.
///
/// Used by chunked mode whenever the tiered strategy yields only the single
/// fallback section; this is the only way unstructured text gets multiple
/// analysis units. The last window may be shorter; the loop terminates once
/// a window reaches the end of the document.
pub fn split_fixed_windows(text: &str, chunk_words: usize, overlap_words: usize) -> Vec<TextSection> {
    assert!(chunk_words > 0, "chunk size must be positive");
    assert!(overlap_words < chunk_words, "overlap must be smaller than chunk size");

    // Word spans as character offsets into the source
    let words: Vec<(usize, usize)> = word_spans(text);
    if words.is_empty() {
        return Vec::new();
    }

    let stride = chunk_words - overlap_words;
    let mut sections = Vec::new();
    let mut start_word = 0;

    loop {
        let end_word = (start_word + chunk_words).min(words.len());
        let start_char = words[start_word].0;
        let end_char = words[end_word - 1].1;

        sections.push(TextSection {
            title: format!("Chunk {}", sections.len() + 1),
            content: text[start_char..end_char].to_string(),
            start_offset: start_char,
            end_offset: end_char,
            level: 0,
            kind: SectionKind::FallbackChunk,
        });

        if end_word == words.len() {
            break;
        }
        start_word += stride;
    }

    sections
}

/// Whitespace-delimited word spans as (start, end) character offsets.
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                spans.push((s, i));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

/// Number of whitespace-delimited words in a text.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
