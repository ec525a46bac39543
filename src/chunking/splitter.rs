//! Recursive character splitter.
//!
//! Cuts text at the coarsest separator that yields pieces within the chunk
//! size, falling back to finer separators and finally to raw character
//! boundaries. Separators stay attached to the piece they end and nothing is
//! trimmed or overlapped, so the chunks always concatenate back to the input.

use crate::error::{RecapError, Result};

const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " "];

/// Split `text` into chunks of at most `chunk_size` characters.
pub fn split_text(text: &str, chunk_size: usize) -> Result<Vec<String>> {
    if chunk_size == 0 {
        return Err(RecapError::InvalidInput(
            "chunk size must be positive".to_string(),
        ));
    }

    let mut chunks = Vec::new();
    if !text.is_empty() {
        split_recursive(text, chunk_size, SEPARATORS, &mut chunks);
    }
    Ok(chunks)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn split_recursive(text: &str, chunk_size: usize, separators: &[&str], out: &mut Vec<String>) {
    if char_len(text) <= chunk_size {
        out.push(text.to_string());
        return;
    }

    let Some((separator, finer)) = separators.split_first() else {
        split_by_chars(text, chunk_size, out);
        return;
    };

    let pieces: Vec<&str> = text.split_inclusive(*separator).collect();
    if pieces.len() < 2 {
        split_recursive(text, chunk_size, finer, out);
        return;
    }

    let mut current = String::new();
    let mut current_len = 0;

    for piece in pieces {
        let piece_len = char_len(piece);

        if piece_len > chunk_size {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }
            split_recursive(piece, chunk_size, finer, out);
            continue;
        }

        if current_len + piece_len > chunk_size {
            out.push(std::mem::take(&mut current));
            current_len = 0;
        }

        current.push_str(piece);
        current_len += piece_len;
    }

    if !current.is_empty() {
        out.push(current);
    }
}

fn split_by_chars(text: &str, chunk_size: usize, out: &mut Vec<String>) {
    let chars: Vec<char> = text.chars().collect();
    for window in chars.chunks(chunk_size) {
        out.push(window.iter().collect());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_roundtrip(text: &str, chunk_size: usize) -> Vec<String> {
        let chunks = split_text(text, chunk_size).unwrap();
        assert_eq!(chunks.concat(), text, "chunk_size={chunk_size}");
        for chunk in &chunks {
            assert!(!chunk.is_empty());
            assert!(char_len(chunk) <= chunk_size, "{chunk:?} exceeds {chunk_size}");
        }
        chunks
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(matches!(
            split_text("abc", 0),
            Err(RecapError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_text() {
        assert!(split_text("", 10).unwrap().is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        assert_eq!(assert_roundtrip("hello world", 100), vec!["hello world"]);
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let text = "First paragraph here.\n\nSecond paragraph here.";
        let chunks = assert_roundtrip(text, 25);
        assert_eq!(chunks, vec!["First paragraph here.\n\n", "Second paragraph here."]);
    }

    #[test]
    fn test_sentence_and_word_fallback() {
        let text = "Neural networks learn. Gradient descent optimizes weights. Backpropagation computes gradients efficiently.";
        let chunks = assert_roundtrip(text, 30);
        assert!(chunks.len() > 3);
        assert!(chunks[0].starts_with("Neural networks learn."));
    }

    #[test]
    fn test_long_word_hard_split() {
        let text = "a".repeat(25);
        let chunks = assert_roundtrip(&text, 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 5);
    }

    #[test]
    fn test_multibyte_text() {
        let text = "déjà vu naïve café ".repeat(20);
        assert_roundtrip(&text, 7);
    }

    #[test]
    fn test_roundtrip_many_sizes() {
        let text = "Transformers use attention.\nAttention weighs tokens. Each head learns a pattern.\n\n\
                    Positional encodings add order information. Layers stack residual blocks."
            .repeat(7);
        for size in [1, 2, 5, 13, 40, 99, 1000] {
            assert_roundtrip(&text, size);
        }
    }
}
