// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Intervue.
//!
//! Deterministic stand-ins for the external collaborators so pipeline tests
//! run without a search cluster, model files, or API keys.
//!
//! # Components
//!
//! - [`MockProvider`] - queued completions with fixed token usage
//! - [`MockSearchBackend`] - in-memory corpus with category filtering
//! - [`HashEmbedder`] - deterministic unit vectors derived from text
//! - [`fixtures`] - sample knowledge-base documents

pub mod fixtures;
pub mod hash_embedder;
pub mod mock_provider;
pub mod mock_search;

pub use hash_embedder::HashEmbedder;
pub use mock_provider::MockProvider;
pub use mock_search::MockSearchBackend;
