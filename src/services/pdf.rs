use anyhow::{Context, Result};

pub fn extract_text(pdf_bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(pdf_bytes).context("Failed to extract text from PDF")
}

pub fn page_count(pdf_bytes: &[u8]) -> Result<usize> {
    let doc = lopdf::Document::load_mem(pdf_bytes).context("Failed to parse PDF")?;
    Ok(doc.get_pages().len())
}

/// Lazy overlapping character windows over the full document text. Each
/// window holds at most `chunk_size` chars and starts `chunk_size - overlap`
/// past the previous start; the final window may be shorter. Windowing is
/// done over `char`s so multi-byte text never splits mid-codepoint.
pub fn chunk_text(
    text: &str,
    chunk_size: usize,
    overlap: usize,
) -> impl Iterator<Item = String> + use<> {
    let chars: Vec<char> = text.chars().collect();
    let stride = chunk_size.saturating_sub(overlap).max(1);
    let mut start = 0;
    let mut done = chunk_size == 0 || chars.is_empty();

    std::iter::from_fn(move || {
        if done {
            return None;
        }

        let end = (start + chunk_size).min(chars.len());
        let piece: String = chars[start..end].iter().collect();

        if end == chars.len() {
            done = true;
        } else {
            start += stride;
        }

        Some(piece)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const C: usize = 800;
    const O: usize = 200;

    #[test]
    fn empty_input_yields_no_chunks() {
        assert_eq!(chunk_text("", C, O).count(), 0);
    }

    #[test]
    fn short_input_yields_one_chunk() {
        let chunks: Vec<String> = chunk_text("hello world", C, O).collect();
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn non_final_chunks_have_exact_length() {
        let text: String = ('a'..='z').cycle().take(2000).collect();
        let chunks: Vec<String> = chunk_text(&text, C, O).collect();

        assert!(chunks.len() > 1);
        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.chars().count(), C);
        }
        assert!(chunks.last().unwrap().chars().count() <= C);
    }

    #[test]
    fn consecutive_chunks_overlap_exactly() {
        let text: String = ('a'..='z').cycle().take(3000).collect();
        let chunks: Vec<String> = chunk_text(&text, C, O).collect();

        for pair in chunks.windows(2) {
            let tail: String = pair[0].chars().skip(C - O).collect();
            let head: String = pair[1].chars().take(O).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn unique_spans_reassemble_the_original_text() {
        let text: String = "0123456789".chars().cycle().take(2345).collect();
        let chunks: Vec<String> = chunk_text(&text, C, O).collect();

        let mut rebuilt = chunks[0].clone();
        for chunk in &chunks[1..] {
            rebuilt.extend(chunk.chars().skip(O));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn multibyte_text_chunks_without_panicking() {
        let text: String = "äöü€漢字".chars().cycle().take(1500).collect();
        let chunks: Vec<String> = chunk_text(&text, C, O).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), C);
        assert_eq!(chunks[2].chars().count(), 300);
    }
}
