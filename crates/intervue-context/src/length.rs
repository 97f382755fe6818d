// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response-length directives, one per tier.

use intervue_core::LengthTier;

/// Instruction sentence appended to the persona for a tier.
///
/// Every directive states the tier's word ceiling.
pub fn length_directive(tier: LengthTier) -> String {
    let limit = tier.word_limit();
    match tier {
        LengthTier::Short => format!(
            "Responses should be brief and concise with minimal narration. \
             One paragraph, no more than three sentences, no more than {limit} words."
        ),
        LengthTier::Medium => format!(
            "Responses should be with minimal narration. \
             Two paragraphs, no more than three sentences each, no more than {limit} words."
        ),
        LengthTier::Long => {
            format!("Responses should be thorough and well structured, no more than {limit} words.")
        }
    }
}
