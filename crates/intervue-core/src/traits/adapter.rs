// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all collaborator adapters implement.

use async_trait::async_trait;

use crate::error::IntervueError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for search, embedding, and provider adapters.
///
/// Provides identity and a health probe used by `intervue doctor`.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the kind of collaborator this adapter fronts.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, IntervueError>;
}
