//! Marks AI-flagged segments in the original document
//!
//! Flagged spans are located by the byte offsets recorded at segmentation
//! time. Overlapping or adjacent spans are merged first, so markers never
//! nest and repeated passages elsewhere in the document are left alone.

use std::ops::Range;
use veritext_core::{HighlightFragment, Segment};

pub const DEFAULT_HIGHLIGHT_THRESHOLD: f64 = 0.7;
pub const DEFAULT_HIGHLIGHT_MIN_CHARS: usize = 20;

const MARK_OPEN: &str = r#"<span class="ai-highlight">"#;
const MARK_CLOSE: &str = "</span>";

#[derive(Debug, Clone, PartialEq)]
pub struct Highlighter {
    /// Segments scoring above this are flagged
    pub threshold: f64,
    /// Segments must be longer than this many characters to be flagged
    pub min_chars: usize,
}

impl Highlighter {
    pub fn new(threshold: f64, min_chars: usize) -> Self {
        Self {
            threshold,
            min_chars,
        }
    }

    pub fn is_flagged(&self, segment: &Segment, score: f64) -> bool {
        score > self.threshold && segment.char_len() > self.min_chars
    }

    /// Merged, sorted byte spans of `text` to flag
    ///
    /// Segments and scores are paired positionally; extras on either side are
    /// ignored. Spans that do not fall on character boundaries of `text` are
    /// skipped.
    pub fn flagged_spans(&self, text: &str, segments: &[Segment], scores: &[f64]) -> Vec<Range<usize>> {
        let mut spans: Vec<Range<usize>> = segments
            .iter()
            .zip(scores)
            .filter(|(segment, score)| self.is_flagged(segment, **score))
            .map(|(segment, _)| segment.span())
            .filter(|span| {
                span.start < span.end
                    && span.end <= text.len()
                    && text.is_char_boundary(span.start)
                    && text.is_char_boundary(span.end)
            })
            .collect();

        spans.sort_by_key(|span| span.start);

        let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
        for span in spans {
            match merged.last_mut() {
                Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
                _ => merged.push(span),
            }
        }
        merged
    }

    /// `text` split into flagged and plain runs, in order
    pub fn fragments(&self, text: &str, segments: &[Segment], scores: &[f64]) -> Vec<HighlightFragment> {
        let mut fragments = Vec::new();
        let mut cursor = 0;

        for span in self.flagged_spans(text, segments, scores) {
            if span.start > cursor {
                fragments.push(HighlightFragment {
                    text: text[cursor..span.start].to_string(),
                    flagged: false,
                });
            }
            fragments.push(HighlightFragment {
                text: text[span.clone()].to_string(),
                flagged: true,
            });
            cursor = span.end;
        }

        if cursor < text.len() {
            fragments.push(HighlightFragment {
                text: text[cursor..].to_string(),
                flagged: false,
            });
        }
        fragments
    }

    /// `text` with every flagged span wrapped in highlight markers
    pub fn highlight(&self, text: &str, segments: &[Segment], scores: &[f64]) -> String {
        let spans = self.flagged_spans(text, segments, scores);
        if spans.is_empty() {
            return text.to_string();
        }

        let mut out =
            String::with_capacity(text.len() + spans.len() * (MARK_OPEN.len() + MARK_CLOSE.len()));
        let mut cursor = 0;
        for span in spans {
            out.push_str(&text[cursor..span.start]);
            out.push_str(MARK_OPEN);
            out.push_str(&text[span.clone()]);
            out.push_str(MARK_CLOSE);
            cursor = span.end;
        }
        out.push_str(&text[cursor..]);
        out
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT_THRESHOLD, DEFAULT_HIGHLIGHT_MIN_CHARS)
    }
}
