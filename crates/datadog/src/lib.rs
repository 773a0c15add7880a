//! # dashform-datadog
//!
//! Clients for the boards API that stores dashboards remotely.
//!
//! [`BoardApi`] is the seam the provider talks to. [`DatadogClient`] implements
//! it over HTTPS; [`MemoryBoardApi`] keeps dashboards in memory for tests and
//! dry runs.

use async_trait::async_trait;
use dashform_model::Dashboard;

pub mod client;
pub mod config;
pub mod error;
pub mod memory;

pub use client::DatadogClient;
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use memory::MemoryBoardApi;

/// Remote operations on dashboards.
///
/// Implementations convert between [`Dashboard`] and the service's payloads
/// and report a missing dashboard as [`ApiError::NotFound`].
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// Creates a dashboard and returns it as stored, with its assigned id.
    async fn create_board(&self, dashboard: &Dashboard) -> Result<Dashboard>;

    /// Replaces the dashboard identified by `dashboard.id`.
    async fn update_board(&self, dashboard: &Dashboard) -> Result<()>;

    /// Fetches a dashboard by id.
    async fn get_board(&self, id: &str) -> Result<Dashboard>;

    /// Deletes a dashboard by id.
    async fn delete_board(&self, id: &str) -> Result<()>;

    /// Short name used in logs.
    fn api_name(&self) -> &'static str;
}
