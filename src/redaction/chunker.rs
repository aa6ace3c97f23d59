//! Sentence-aware text chunking
//!
//! Long inputs are split into bounded, slightly overlapping chunks so each
//! detector call stays within its size limit. Each [`Chunk`] borrows the input
//! and records the exact byte offset it starts at; entities found inside a
//! chunk are shifted by that offset before anything compares ranges.
//!
//! Sizes are measured in bytes and every cut is snapped to a `char` boundary.

use serde::Serialize;

/// How far back from a cut point to look for a sentence terminator
pub const SENTENCE_LOOKBACK: usize = 100;

/// A bounded slice of the input text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chunk<'a> {
    /// The chunk's text
    pub text: &'a str,
    /// Byte offset of `text` within the original input
    pub start_offset: usize,
}

impl<'a> Chunk<'a> {
    /// Exclusive end offset within the original input
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.text.len()
    }
}

/// Splits text into overlapping chunks at sentence boundaries where possible
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    max_size: usize,
    overlap_size: usize,
}

impl Chunker {
    /// Create a chunker. `max_size` is raised to at least 1 and the overlap is
    /// capped below `max_size` so chunking always terminates.
    pub fn new(max_size: usize, overlap_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            max_size,
            overlap_size: overlap_size.min(max_size - 1),
        }
    }

    /// Maximum chunk size in bytes
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Overlap between consecutive chunks in bytes
    pub fn overlap_size(&self) -> usize {
        self.overlap_size
    }

    /// Split `text` into chunks.
    ///
    /// Text no longer than `max_size` yields a single chunk at offset 0 (an
    /// empty input yields one empty chunk). Otherwise each cut lands at
    /// `max_size` bytes from the chunk start, pulled back to the end of the
    /// last sentence terminator found within [`SENTENCE_LOOKBACK`] bytes, and
    /// every following chunk starts `overlap_size` bytes before the previous
    /// chunk's end. A terminator inside the overlap region is ignored so each
    /// chunk contributes new text.
    pub fn chunk<'a>(&self, text: &'a str) -> Vec<Chunk<'a>> {
        if text.len() <= self.max_size {
            return vec![Chunk {
                text,
                start_offset: 0,
            }];
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < text.len() {
            let mut end = floor_char_boundary(text, (start + self.max_size).min(text.len()));
            if end <= start {
                // max_size smaller than the next char: take the whole char
                end = ceil_char_boundary(text, start + 1);
            }

            if end < text.len() {
                let search_start =
                    ceil_char_boundary(text, end.saturating_sub(SENTENCE_LOOKBACK).max(start));
                if let Some(cut) = last_sentence_break(&text[search_start..end]) {
                    if search_start + cut > start + self.overlap_size {
                        end = search_start + cut;
                    }
                }
            }

            chunks.push(Chunk {
                text: &text[start..end],
                start_offset: start,
            });

            if end >= text.len() {
                break;
            }

            let next = floor_char_boundary(text, end.saturating_sub(self.overlap_size));
            start = if next > start { next } else { end };
        }

        chunks
    }
}

/// End of the last `[.!?]\s+` run inside `window`, relative to `window`.
fn last_sentence_break(window: &str) -> Option<usize> {
    let mut found = None;
    let mut chars = window.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let mut run_end = None;
        while let Some(&(idx, next)) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            run_end = Some(idx + next.len_utf8());
            chars.next();
        }
        if run_end.is_some() {
            found = run_end;
        }
    }

    found
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    if idx >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    if idx >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_full_coverage(text: &str, chunks: &[Chunk<'_>]) {
        let mut covered = vec![false; text.len()];
        for chunk in chunks {
            assert_eq!(
                &text[chunk.start_offset..chunk.end_offset()],
                chunk.text,
                "chunk text must match its recorded offset"
            );
            for flag in &mut covered[chunk.start_offset..chunk.end_offset()] {
                *flag = true;
            }
        }
        assert!(covered.iter().all(|c| *c), "every byte must be covered");
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunker = Chunker::new(100, 10);
        let chunks = chunker.chunk("Short text.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start_offset, 0);
        assert_eq!(chunks[0].text, "Short text.");
    }

    #[test]
    fn test_empty_text() {
        let chunks = Chunker::new(10, 2).chunk("");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "");
    }

    #[test]
    fn test_fixed_cuts_with_overlap() {
        let text = "Patient SSN 123-45-6789 on file";
        let chunks = Chunker::new(16, 12).chunk(text);

        let offsets: Vec<usize> = chunks.iter().map(|c| c.start_offset).collect();
        assert_eq!(offsets, vec![0, 4, 8, 12, 16]);
        assert_eq!(chunks[2].text, "SSN 123-45-6789 ");
        assert_eq!(chunks[3].text, "123-45-6789 on f");
        assert_eq!(chunks.last().map(|c| c.end_offset()), Some(text.len()));
        assert_full_coverage(text, &chunks);
    }

    #[test]
    fn test_snaps_to_sentence_terminator() {
        let text = "First sentence here. Second sentence follows and keeps going on.";
        let chunks = Chunker::new(30, 5).chunk(text);

        assert_eq!(chunks[0].text, "First sentence here. ");
        assert_eq!(chunks[1].start_offset, chunks[0].end_offset() - 5);
        assert_full_coverage(text, &chunks);
    }

    #[test]
    fn test_overlap_never_stalls() {
        // heavy overlap with an early terminator still has to advance
        let text = "A. bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
        let chunks = Chunker::new(10, 8).chunk(text);

        for pair in chunks.windows(2) {
            assert!(pair[1].start_offset > pair[0].start_offset);
        }
        assert_full_coverage(text, &chunks);
    }

    #[test]
    fn test_multibyte_text_cuts_on_char_boundaries() {
        let text = "Zoë Müller wohnt in Köln. Ihre Nummer ist 0221 555 1234. Grüße!";
        let chunks = Chunker::new(12, 4).chunk(text);

        assert!(chunks.len() > 1);
        assert_full_coverage(text, &chunks);
    }

    #[test]
    fn test_overlap_is_capped_below_max_size() {
        let chunker = Chunker::new(10, 50);
        assert_eq!(chunker.overlap_size(), 9);
        let text = "x".repeat(35);
        assert_full_coverage(&text, &chunker.chunk(&text));
    }

    #[test]
    fn test_chunks_are_restartable() {
        let text = "One. Two. Three. Four. Five. Six. Seven. Eight.";
        let chunks = Chunker::new(12, 3).chunk(text);
        let first: Vec<_> = chunks.iter().map(|c| c.start_offset).collect();
        let second: Vec<_> = chunks.iter().map(|c| c.start_offset).collect();
        assert_eq!(first, second);
    }
}
