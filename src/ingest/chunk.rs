//! Fixed-size word-window chunking with overlap.

/// Chunks whose trimmed length falls below this are dropped before they
/// reach the caller; trailing windows of a few words are boundary noise,
/// not content worth embedding.
pub const MIN_CHUNK_CHARS: usize = 10;

/// Chunking parameters: words per window and words shared between
/// consecutive windows.
#[derive(Debug, Clone)]
pub struct ChunkParams {
    pub window_size: usize,
    pub overlap: usize,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            window_size: 800,
            overlap: 100,
        }
    }
}

impl ChunkParams {
    /// Words advanced per step. Clamped to at least 1 so a caller passing
    /// `overlap >= window_size` cannot produce a zero-length stride.
    pub fn stride(&self) -> usize {
        self.window_size.saturating_sub(self.overlap).max(1)
    }
}

/// Split `text` into overlapping word windows.
///
/// Words are whitespace-separated; each window holds up to
/// `params.window_size` words joined by single spaces, and each window after
/// the first repeats the final `params.overlap` words of the previous one.
/// The final window may be shorter than `window_size`; a trailing window
/// that would consist solely of words already emitted is not produced, so a
/// text of `N > window_size` words yields exactly
/// `ceil((N - overlap) / stride)` windows. Windows below
/// [`MIN_CHUNK_CHARS`] are discarded.
pub fn chunk_words(text: &str, params: &ChunkParams) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let stride = params.stride();

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut prev_end = 0;
    while start < words.len() {
        let end = (start + params.window_size).min(words.len());
        if start > 0 && end <= prev_end {
            // Every word here was already covered by the previous window.
            break;
        }
        let chunk = words[start..end].join(" ");
        if chunk.len() >= MIN_CHUNK_CHARS {
            chunks.push(chunk);
        }
        prev_end = end;
        start += stride;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn short_text_yields_single_chunk() {
        let text = words(50);
        let chunks = chunk_words(&text, &ChunkParams::default());
        assert_eq!(chunks, vec![text]);
    }

    #[test]
    fn exactly_window_size_yields_single_chunk() {
        let text = words(800);
        let chunks = chunk_words(&text, &ChunkParams::default());
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn chunk_count_matches_stride_formula() {
        let params = ChunkParams::default();
        for n in [801usize, 1500, 2000, 4200, 5000] {
            let text = words(n);
            let chunks = chunk_words(&text, &params);
            let expected = (n - params.overlap).div_ceil(params.stride());
            assert_eq!(chunks.len(), expected, "word count {}", n);
        }
    }

    #[test]
    fn consecutive_full_chunks_share_overlap_words() {
        let params = ChunkParams {
            window_size: 10,
            overlap: 3,
        };
        let text = words(31);
        let chunks = chunk_words(&text, &params);
        assert!(chunks.len() >= 2);

        for pair in chunks.windows(2) {
            let first: Vec<&str> = pair[0].split_whitespace().collect();
            let second: Vec<&str> = pair[1].split_whitespace().collect();
            if first.len() == params.window_size && second.len() == params.window_size {
                assert_eq!(
                    first[first.len() - params.overlap..],
                    second[..params.overlap]
                );
            }
        }
    }

    #[test]
    fn overlap_at_least_window_still_terminates() {
        let params = ChunkParams {
            window_size: 5,
            overlap: 7,
        };
        // Degenerate parameters: the stride clamp keeps this finite.
        let chunks = chunk_words(&words(12), &params);
        assert!(!chunks.is_empty());
        assert!(chunks.len() <= 12);
    }

    #[test]
    fn tiny_trailing_chunk_is_dropped() {
        let params = ChunkParams {
            window_size: 4,
            overlap: 0,
        };
        // 9 words; the trailing window is a single short word.
        let text = "alpha beta gamma delta epsilon zeta eta theta io";
        let chunks = chunk_words(text, &params);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len() >= MIN_CHUNK_CHARS));
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_words("", &ChunkParams::default()).is_empty());
        assert!(chunk_words("   \n\t ", &ChunkParams::default()).is_empty());
    }
}
