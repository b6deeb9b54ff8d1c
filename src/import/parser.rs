//! Segmenter: splits a pasted prompt into blocks and classifies them.
//!
//! Splitting is tiered. Each tier runs only when the previous one produced
//! a degenerate result:
//! 1. Marker lines (category headings or generic `Heading:` shapes)
//! 2. Blank-line paragraphs, then single lines
//! 3. Oversized single segment: paragraphs again, then sentence packing

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classifiers::{BlockClassifier, HeuristicClassifier, is_marker_line};
use super::types::DissectedBlock;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Tunables for splitting. Defaults match the documented behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// A lone segment longer than this (in chars) is force-split.
    #[serde(default = "default_long_segment_chars")]
    pub long_segment_chars: usize,

    /// Lines at or under this many chars are not segments on their own
    /// during line splitting.
    #[serde(default = "default_min_line_chars")]
    pub min_line_chars: usize,

    /// Pack sentences into chunks when nothing else can subdivide an
    /// oversized segment.
    #[serde(default = "default_sentence_fallback")]
    pub sentence_fallback: bool,
}

const fn default_long_segment_chars() -> usize {
    500
}

const fn default_min_line_chars() -> usize {
    20
}

const fn default_sentence_fallback() -> bool {
    true
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            long_segment_chars: default_long_segment_chars(),
            min_line_chars: default_min_line_chars(),
            sentence_fallback: default_sentence_fallback(),
        }
    }
}

// =============================================================================
// SEGMENTS
// =============================================================================

/// A trimmed slice of the input, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub content: String,
    /// Char offset of the first char in the original text.
    pub start: usize,
    /// Char offset one past the last char.
    pub end: usize,
}

/// Byte range into the input text.
type Span = (usize, usize);

#[derive(Debug, Clone, Copy)]
struct Line {
    start: usize,
    end: usize,
    blank: bool,
}

fn lines_with_offsets(text: &str, span: Span) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut pos = span.0;
    for raw in text[span.0..span.1].split_inclusive('\n') {
        let body = raw.strip_suffix('\n').unwrap_or(raw);
        let body = body.strip_suffix('\r').unwrap_or(body);
        lines.push(Line {
            start: pos,
            end: pos + body.len(),
            blank: body.trim().is_empty(),
        });
        pos += raw.len();
    }
    lines
}

/// Shrink a byte range to its trimmed content; `None` when only whitespace.
fn trim_span(text: &str, span: Span) -> Option<Span> {
    let slice = &text[span.0..span.1];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lead = slice.len() - slice.trim_start().len();
    Some((span.0 + lead, span.0 + lead + trimmed.len()))
}

fn char_len(text: &str, span: Span) -> usize {
    text[span.0..span.1].chars().count()
}

// =============================================================================
// DISSECTOR
// =============================================================================

/// Splits prompt text into classified blocks.
///
/// # Example
///
/// ```
/// use dissect::import::{BlockType, Dissector};
///
/// let blocks = Dissector::new().dissect("# Role\nYou are terse.\n\n# Task\nFix typos.");
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[0].suggested_type, BlockType::Role);
/// ```
pub struct Dissector {
    classifier: Box<dyn BlockClassifier>,
    config: SegmenterConfig,
}

impl Default for Dissector {
    fn default() -> Self {
        Self::new()
    }
}

impl Dissector {
    /// Create a dissector with the heuristic classifier and default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SegmenterConfig::default())
    }

    #[must_use]
    pub fn with_config(config: SegmenterConfig) -> Self {
        Self {
            classifier: Box::new(HeuristicClassifier),
            config,
        }
    }

    /// Create a dissector with a custom classifier.
    #[must_use]
    pub fn with_classifier(classifier: Box<dyn BlockClassifier>, config: SegmenterConfig) -> Self {
        Self { classifier, config }
    }

    #[must_use]
    pub const fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    #[must_use]
    pub fn classifier(&self) -> &dyn BlockClassifier {
        self.classifier.as_ref()
    }

    /// Split and classify. Empty or whitespace-only input yields no blocks.
    #[must_use]
    pub fn dissect(&self, text: &str) -> Vec<DissectedBlock> {
        self.segment(text)
            .into_iter()
            .map(|segment| {
                let classification = self.classifier.classify(&segment.content);
                DissectedBlock::classified(
                    segment.content,
                    &classification,
                    Some(segment.start),
                    Some(segment.end),
                )
            })
            .collect()
    }

    /// Split text into ordered, trimmed segments.
    #[must_use]
    pub fn segment(&self, text: &str) -> Vec<Segment> {
        let spans = self.split_spans(text);
        spans
            .into_iter()
            .map(|(start, end)| {
                let char_start = text[..start].chars().count();
                Segment {
                    content: text[start..end].to_string(),
                    start: char_start,
                    end: char_start + char_len(text, (start, end)),
                }
            })
            .collect()
    }

    fn split_spans(&self, text: &str) -> Vec<Span> {
        let Some(whole) = trim_span(text, (0, text.len())) else {
            return Vec::new();
        };

        let mut spans = split_on_markers(text, whole);
        debug!(target: "dissect", tier = "markers", segments = spans.len());

        if spans.is_empty() || (spans.len() == 1 && spans[0] == whole) {
            spans = self.split_paragraphs(text, whole);
            debug!(target: "dissect", tier = "paragraphs", segments = spans.len());
        }

        if spans.len() == 1 && char_len(text, spans[0]) > self.config.long_segment_chars {
            let lone = spans[0];
            spans = self.split_paragraphs(text, lone);
            if spans.len() == 1 && self.config.sentence_fallback {
                spans = pack_sentences(text, lone, self.config.long_segment_chars);
            }
            debug!(target: "dissect", tier = "length", segments = spans.len());
        }

        spans
    }

    /// Blank-line paragraphs; a single paragraph falls back to line splitting.
    fn split_paragraphs(&self, text: &str, span: Span) -> Vec<Span> {
        let lines = lines_with_offsets(text, span);
        let mut paragraphs = Vec::new();
        let mut current: Option<Span> = None;

        for line in &lines {
            if line.blank {
                if let Some(done) = current.take().and_then(|p| trim_span(text, p)) {
                    paragraphs.push(done);
                }
            } else {
                current = Some(match current {
                    Some((start, _)) => (start, line.end),
                    None => (line.start, line.end),
                });
            }
        }
        if let Some(done) = current.and_then(|p| trim_span(text, p)) {
            paragraphs.push(done);
        }

        if paragraphs.len() == 1 {
            return self.split_lines(text, paragraphs[0]);
        }
        paragraphs
    }

    /// One segment per line longer than `min_line_chars`. Shorter lines ride
    /// along with the next long line (or the previous one at the end), so no
    /// text is lost.
    fn split_lines(&self, text: &str, span: Span) -> Vec<Span> {
        let lines = lines_with_offsets(text, span);
        let mut groups: Vec<Span> = Vec::new();
        let mut pending_start: Option<usize> = None;

        for line in lines.iter().filter(|line| !line.blank) {
            let long = text[line.start..line.end].trim().chars().count() > self.config.min_line_chars;
            if long {
                let start = pending_start.take().unwrap_or(line.start);
                groups.push((start, line.end));
            } else if pending_start.is_none() {
                pending_start = Some(line.start);
            }
        }

        if groups.is_empty() {
            return vec![span];
        }

        if pending_start.is_some() {
            let last_end = lines.iter().rfind(|line| !line.blank).map(|line| line.end);
            if let (Some(end), Some(last_group)) = (last_end, groups.last_mut()) {
                last_group.1 = end;
            }
        }

        groups
            .into_iter()
            .filter_map(|group| trim_span(text, group))
            .collect()
    }
}

/// Start a new segment at every marker line once the current one has text.
fn split_on_markers(text: &str, span: Span) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut current: Option<Span> = None;

    for line in lines_with_offsets(text, span) {
        let has_text = current.is_some_and(|c| trim_span(text, c).is_some());
        if !line.blank && has_text && is_marker_line(&text[line.start..line.end]) {
            if let Some(done) = current.take().and_then(|c| trim_span(text, c)) {
                spans.push(done);
            }
        }
        current = Some(match current {
            Some((start, _)) => (start, line.end),
            None => (line.start, line.end),
        });
    }

    if let Some(done) = current.and_then(|c| trim_span(text, c)) {
        spans.push(done);
    }
    spans
}

/// Greedily pack whole sentences into chunks of at most `max_chars`.
/// A single sentence longer than the limit becomes its own chunk.
fn pack_sentences(text: &str, span: Span, max_chars: usize) -> Vec<Span> {
    let slice = &text[span.0..span.1];
    let mut sentences: Vec<Span> = Vec::new();
    let mut start = 0;
    let mut chars = slice.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?')
            && chars.peek().is_some_and(|(_, next)| next.is_whitespace())
        {
            let end = idx + ch.len_utf8();
            sentences.push((span.0 + start, span.0 + end));
            start = end;
        }
    }
    if start < slice.len() {
        sentences.push((span.0 + start, span.1));
    }

    let mut chunks: Vec<Span> = Vec::new();
    for sentence in sentences {
        match chunks.last_mut() {
            Some(chunk) if char_len(text, (chunk.0, sentence.1)) <= max_chars => {
                chunk.1 = sentence.1;
            }
            _ => chunks.push(sentence),
        }
    }

    chunks
        .into_iter()
        .filter_map(|chunk| trim_span(text, chunk))
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
