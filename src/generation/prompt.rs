//! Prompt assembly for RAG queries

use crate::retrieval::RetrievedChunk;

/// Fixed instruction preamble placed before the context
pub const INSTRUCTION_PREAMBLE: &str = "You are a helpful assistant. \
Use the provided context to answer the question. If the answer cannot be \
found in the context, say 'I don't know based on the given information.'";

/// Separator between context blocks
const BLOCK_SEPARATOR: &str = "\n---\n";

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Format one retrieved chunk as a labeled context block
    pub fn format_block(chunk: &RetrievedChunk) -> String {
        let label = if chunk.title.is_empty() {
            &chunk.book_id
        } else {
            &chunk.title
        };
        format!("[{} | {}]\n{}\n", label, chunk.chunk_id, chunk.text_snippet)
    }

    /// Pack context blocks under a total-character budget.
    ///
    /// Blocks are taken in the given order; the first block that would push
    /// the running total past `max_context_chars` is dropped along with
    /// everything after it. No block is ever truncated partially.
    pub fn build_context(chunks: &[RetrievedChunk], max_context_chars: usize) -> String {
        let mut blocks = Vec::new();
        let mut total = 0usize;

        for chunk in chunks {
            let block = Self::format_block(chunk);
            // Budget is in characters, not bytes.
            let block_chars = block.chars().count();
            if total + block_chars > max_context_chars {
                break;
            }
            total += block_chars;
            blocks.push(block);
        }

        blocks.join(BLOCK_SEPARATOR)
    }

    /// Assemble the final model prompt.
    ///
    /// Deterministic: identical chunks and budget produce byte-identical
    /// output. With no block fitting the budget the context section is empty
    /// but the prompt is still well-formed.
    pub fn build_prompt(
        question: &str,
        chunks: &[RetrievedChunk],
        max_context_chars: usize,
    ) -> String {
        let context = Self::build_context(chunks, max_context_chars);
        format!("{INSTRUCTION_PREAMBLE}\n\nContext:\n{context}\n\nQuestion: {question}\nAnswer:")
    }
}
