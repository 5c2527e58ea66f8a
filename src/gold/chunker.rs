//! Fixed-window text chunking with character offsets
//!
//! Windows are measured in characters, not bytes, so offsets line up with the
//! gold table's `char_start`/`char_end` columns and slicing stays UTF-8 safe.

use crate::error::{Error, Result};

/// A single chunk of a document's text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan<'a> {
    /// Character offset of the first character, inclusive
    pub char_start: usize,
    /// Character offset past the last character, exclusive
    pub char_end: usize,
    /// The chunk's text, borrowed from the source document
    pub text: &'a str,
}

/// Split `text` into overlapping fixed-size windows.
///
/// Each chunk covers `window_size` characters except possibly the last, which
/// ends exactly at the end of the text. Consecutive chunks overlap by exactly
/// `overlap` characters. Empty input yields no chunks.
///
/// Parameters are validated once, before any slicing: `window_size` must be
/// positive and `overlap` strictly smaller than `window_size`.
pub fn chunk_spans(text: &str, window_size: usize, overlap: usize) -> Result<ChunkIter<'_>> {
    if window_size == 0 {
        return Err(Error::invalid_parameter("chunk_size must be > 0"));
    }
    if overlap >= window_size {
        return Err(Error::invalid_parameter("overlap must be < chunk_size"));
    }

    Ok(ChunkIter {
        text,
        window_size,
        overlap,
        byte_start: 0,
        char_start: 0,
        done: text.is_empty(),
    })
}

/// Lazy iterator over the chunks of a document
///
/// Cloning restarts nothing: each [`chunk_spans`] call is cheap, and the
/// iterator borrows the text, so re-chunking a document is just another call.
#[derive(Debug, Clone)]
pub struct ChunkIter<'a> {
    text: &'a str,
    window_size: usize,
    overlap: usize,
    byte_start: usize,
    char_start: usize,
    done: bool,
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = ChunkSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let rest = &self.text[self.byte_start..];
        let stride = self.window_size - self.overlap;

        // Walk at most window_size characters, noting the byte offset where
        // the window ends and where the next window begins.
        let mut taken = 0usize;
        let mut end_rel = rest.len();
        let mut step_rel = rest.len();
        for (idx, _) in rest.char_indices() {
            if taken == stride {
                step_rel = idx;
            }
            if taken == self.window_size {
                end_rel = idx;
                break;
            }
            taken += 1;
        }

        let span = ChunkSpan {
            char_start: self.char_start,
            char_end: self.char_start + taken,
            text: &rest[..end_rel],
        };

        if self.byte_start + end_rel == self.text.len() {
            // Final chunk reaches the end of the document.
            self.done = true;
        } else {
            // overlap < window_size guarantees forward progress here.
            self.byte_start += step_rel;
            self.char_start += stride;
        }

        Some(span)
    }
}
