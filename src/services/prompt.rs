use crate::index::ScoredChunk;

/// How much of the answer the tutor is allowed to reveal. Wire-level this is
/// the `give_final` flag; it only ever selects prompt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStyle {
    Hint,
    Full,
}

impl AnswerStyle {
    pub fn from_give_final(give_final: bool) -> Self {
        if give_final {
            AnswerStyle::Full
        } else {
            AnswerStyle::Hint
        }
    }
}

pub const NO_CONTEXT_PLACEHOLDER: &str =
    "(no study material has been indexed yet — say so and invite the student to upload a PDF)";

/// Turns search hits into context blocks, tagging each with the document it
/// came from so the tutor can cite its source. Blank hits are dropped.
pub fn context_blocks(hits: &[ScoredChunk]) -> Vec<String> {
    hits.iter()
        .filter(|hit| !hit.text.trim().is_empty())
        .map(|hit| format!("[source: {}]\n{}", hit.source, hit.text))
        .collect()
}

/// Assembles the tutor preamble: instruction, subject label, and the
/// retrieved context blocks. The question itself is sent as the chat message.
pub fn build_preamble(style: AnswerStyle, subject: &str, context_blocks: &[String]) -> String {
    let instruction = match style {
        AnswerStyle::Hint => {
            "Guide the student toward the answer with hints and leading questions. \
             Do not reveal the full solution."
        }
        AnswerStyle::Full => "Give a complete, clearly explained final answer.",
    };

    let context = if context_blocks.is_empty() {
        NO_CONTEXT_PLACEHOLDER.to_string()
    } else {
        context_blocks.join("\n\n---\n\n")
    };

    format!(
        "You are Teach AI, an educational study tutor.\n\
         Current subject: {subject}.\n\
         {instruction}\n\
         Answer ONLY from the context below. If the answer is not in the context, \
         say that you do not know.\n\n\
         CONTEXT:\n{context}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn give_final_maps_to_style() {
        assert_eq!(AnswerStyle::from_give_final(true), AnswerStyle::Full);
        assert_eq!(AnswerStyle::from_give_final(false), AnswerStyle::Hint);
    }

    #[test]
    fn preamble_includes_subject_and_context_blocks() {
        let blocks = vec!["photosynthesis notes".to_string(), "light reactions".to_string()];
        let preamble = build_preamble(AnswerStyle::Full, "Biology", &blocks);

        assert!(preamble.contains("Current subject: Biology."));
        assert!(preamble.contains("photosynthesis notes"));
        assert!(preamble.contains("light reactions"));
        assert!(preamble.contains("complete, clearly explained"));
    }

    #[test]
    fn context_blocks_carry_their_source() {
        let hits = vec![
            ScoredChunk {
                distance: 0.1,
                text: "cell walls are rigid".to_string(),
                source: "biology.pdf".to_string(),
            },
            ScoredChunk {
                distance: 0.4,
                text: "   ".to_string(),
                source: "biology.pdf".to_string(),
            },
        ];

        let blocks = context_blocks(&hits);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0], "[source: biology.pdf]\ncell walls are rigid");
    }

    #[test]
    fn empty_context_uses_the_placeholder() {
        let preamble = build_preamble(AnswerStyle::Hint, "History", &[]);
        assert!(preamble.contains(NO_CONTEXT_PLACEHOLDER));
        assert!(preamble.contains("Do not reveal the full solution"));
    }
}
