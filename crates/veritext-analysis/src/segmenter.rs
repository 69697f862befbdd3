//! Overlapping word-window segmentation
//!
//! A document is split on whitespace and a window of `window_size` words is
//! slid across it with a stride of half the window. Windows shorter than the
//! minimum (only ever the trailing ones) are dropped. Every segment records
//! its word range and the byte span it covers in the original text, so later
//! stages can point back into the document without searching for it.

use std::ops::Range;
use veritext_core::{Error, Result, Segment};

pub const DEFAULT_WINDOW_SIZE: usize = 50;
pub const DEFAULT_MIN_SEGMENT_WORDS: usize = 10;

/// Sliding-window segmenter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segmenter {
    window_size: usize,
    min_words: usize,
}

impl Segmenter {
    pub fn new(window_size: usize, min_words: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(Error::config("segment window size must be at least 1 word"));
        }
        if min_words > window_size {
            return Err(Error::config(format!(
                "minimum segment length ({} words) exceeds the window size ({} words)",
                min_words, window_size
            )));
        }
        Ok(Self {
            window_size,
            min_words,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn min_words(&self) -> usize {
        self.min_words
    }

    /// Step between window starts: half the window, at least one word
    pub fn stride(&self) -> usize {
        (self.window_size / 2).max(1)
    }

    /// Lazily segment `text`; calling again restarts from the first window
    pub fn segments<'a>(&self, text: &'a str) -> Segments<'a> {
        Segments {
            text,
            words: word_spans(text),
            window_size: self.window_size,
            min_words: self.min_words,
            stride: self.stride(),
            next_start: 0,
        }
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            min_words: DEFAULT_MIN_SEGMENT_WORDS,
        }
    }
}

/// Iterator over the segments of one document, in document order
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    text: &'a str,
    words: Vec<Range<usize>>,
    window_size: usize,
    min_words: usize,
    stride: usize,
    next_start: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        while self.next_start < self.words.len() {
            let start_word = self.next_start;
            let end_word = (start_word + self.window_size).min(self.words.len());
            self.next_start += self.stride;

            let window = &self.words[start_word..end_word];
            if window.len() < self.min_words {
                continue;
            }

            let text = window
                .iter()
                .map(|span| &self.text[span.clone()])
                .collect::<Vec<_>>()
                .join(" ");

            return Some(Segment {
                text,
                start_word,
                word_count: window.len(),
                start: window[0].start,
                end: window[window.len() - 1].end,
            });
        }
        None
    }
}

/// Segment `text` with the given window size and the default minimum length
pub fn segment(text: &str, window_size: usize) -> Result<Vec<Segment>> {
    Ok(Segmenter::new(window_size, DEFAULT_MIN_SEGMENT_WORDS)?
        .segments(text)
        .collect())
}

/// Number of whitespace-delimited words in `text`
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Byte ranges of the whitespace-delimited words of `text`
fn word_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut word_start = None;

    for (idx, ch) in text.char_indices() {
        match (ch.is_whitespace(), word_start) {
            (true, Some(start)) => {
                spans.push(start..idx);
                word_start = None;
            }
            (false, None) => word_start = Some(idx),
            _ => {}
        }
    }
    if let Some(start) = word_start {
        spans.push(start..text.len());
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_word_spans_match_split_whitespace() {
        let text = "  Hello,\tworld \n\n  naïve café  ";
        let from_spans: Vec<&str> = word_spans(text).into_iter().map(|r| &text[r]).collect();
        let expected: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(from_spans, expected);
    }

    #[test]
    fn test_short_document_yields_nothing() {
        let segmenter = Segmenter::default();
        assert_eq!(segmenter.segments(&words(9)).count(), 0);
        assert_eq!(segmenter.segments("").count(), 0);
    }

    #[test]
    fn test_exactly_minimum_words() {
        let segments: Vec<_> = Segmenter::default().segments(&words(10)).collect();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].word_count, 10);
        assert_eq!(segments[0].start_word, 0);
    }

    #[test]
    fn test_windows_overlap_by_half() {
        let text = words(100);
        let segments: Vec<_> = Segmenter::default().segments(&text).collect();

        let starts: Vec<usize> = segments.iter().map(|s| s.start_word).collect();
        assert_eq!(starts, vec![0, 25, 50, 75]);
        assert_eq!(segments[0].word_count, 50);
        assert_eq!(segments[2].word_count, 50);
        // Trailing window of 25 words survives the 10-word minimum
        assert_eq!(segments[3].word_count, 25);
    }

    #[test]
    fn test_short_trailing_window_dropped() {
        // Starts 0, 25, 50; the window at 50 holds 8 words
        let segments: Vec<_> = Segmenter::default().segments(&words(58)).collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].end_word(), 58);
    }

    #[test]
    fn test_segment_text_joined_and_span_points_into_document() {
        let text = "one  two\nthree four five six seven eight nine ten eleven";
        let segments: Vec<_> = Segmenter::default().segments(text).collect();
        assert_eq!(segments.len(), 1);

        let seg = &segments[0];
        assert_eq!(
            seg.text,
            "one two three four five six seven eight nine ten eleven"
        );
        assert_eq!(&text[seg.span()], text);
    }

    #[test]
    fn test_restartable_and_idempotent() {
        let text = words(137);
        let segmenter = Segmenter::default();
        let first: Vec<_> = segmenter.segments(&text).collect();
        let second: Vec<_> = segmenter.segments(&text).collect();
        assert_eq!(first, second);

        let iter = segmenter.segments(&text);
        let cloned: Vec<_> = iter.clone().collect();
        assert_eq!(cloned, iter.collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(Segmenter::new(0, 10).is_err());
        assert!(segment("a b c", 0).is_err());
    }

    #[test]
    fn test_minimum_longer_than_window_rejected() {
        let err = Segmenter::new(5, 10).unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(segment(&words(100), 5).is_err());

        let segmenter = Segmenter::new(10, 10).unwrap();
        assert_eq!(segmenter.segments(&words(100)).count(), 19);
    }

    #[test]
    fn test_tiny_window_still_advances() {
        let segmenter = Segmenter::new(1, 1).unwrap();
        assert_eq!(segmenter.stride(), 1);
        assert_eq!(segmenter.segments(&words(5)).count(), 5);
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("  a b\n c  "), 3);
        assert_eq!(count_words(""), 0);
    }
}
