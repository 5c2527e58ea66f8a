//! Prompt assembly and answer generation

pub mod prompt;

pub use prompt::{PromptBuilder, INSTRUCTION_PREAMBLE};
