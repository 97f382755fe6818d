// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly for the Intervue pipeline.
//!
//! [`PromptBuilder`] renders a single user prompt from:
//! - a career-coach persona scoped to the candidate's category
//! - a length directive for the requested [`LengthTier`]
//! - the question and the retrieved documents as a `CONTEXT` block

pub mod length;

use intervue_core::{Category, Document, LengthTier};
use tracing::debug;

pub use length::length_directive;

/// Renders generation prompts. Stateless and deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the prompt for `question`, grounding it in `documents` (rank order).
    pub fn build(
        &self,
        question: &str,
        category: Category,
        documents: &[Document],
        tier: LengthTier,
    ) -> String {
        let context = render_context(documents);
        let prompt = format!(
            "You're an experienced career coach who worked as a technical recruiter and helps \
             {role}s prepare for job interviews. Answer the QUESTION based on the CONTEXT from \
             our knowledge database.\n\
             Use only the facts from the CONTEXT when answering the QUESTION.\n\
             {directive}\n\
             \n\
             QUESTION: {question}\n\
             \n\
             CONTEXT:\n\
             {context}",
            role = category.display_name(),
            directive = length_directive(tier),
        );
        let prompt = prompt.trim().to_string();

        debug!(
            documents = documents.len(),
            tier = %tier,
            chars = prompt.len(),
            "prompt rendered"
        );
        prompt
    }
}

/// One `section/question/answer` block per document, separated by blank lines.
fn render_context(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|doc| {
            format!(
                "section: {}\nquestion: {}\nanswer: {}",
                doc.section, doc.question, doc.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
