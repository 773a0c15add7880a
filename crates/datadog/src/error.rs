//! Errors returned by boards API clients.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using the API error type.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Failures reported by a [`BoardApi`](crate::BoardApi) implementation.
#[derive(Error, Debug, Diagnostic)]
pub enum ApiError {
    /// The dashboard does not exist (HTTP 404).
    #[error("Dashboard not found: {id}")]
    #[diagnostic(code(dashform_datadog::not_found))]
    NotFound {
        /// Requested dashboard id
        id: String,
    },

    /// The API answered with a non-success status.
    #[error("Boards API returned HTTP {status}: {message}")]
    #[diagnostic(code(dashform_datadog::status))]
    Status {
        /// HTTP status code
        status: u16,
        /// Error messages from the response body
        message: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("HTTP transport error: {0}")]
    #[diagnostic(code(dashform_datadog::transport))]
    Transport(#[from] reqwest::Error),

    /// The request or response body does not describe a valid dashboard.
    #[error("Invalid dashboard payload: {0}")]
    #[diagnostic(code(dashform_datadog::payload))]
    Model(#[from] dashform_model::Error),

    /// An update or delete was attempted on a dashboard without an id.
    #[error("Dashboard has no id")]
    #[diagnostic(code(dashform_datadog::missing_id))]
    MissingId,

    /// The client is missing credentials or has an invalid setting.
    #[error("Invalid client configuration: {message}")]
    #[diagnostic(
        code(dashform_datadog::config),
        help("Set DD_API_KEY and DD_APP_KEY, or pass them in the provider configuration")
    )]
    Config {
        /// What is wrong
        message: String,
    },
}

impl ApiError {
    /// Whether this error means the dashboard no longer exists.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Shorthand for [`ApiError::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
