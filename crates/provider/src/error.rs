//! Error types for the dashboard resource.

use dashform_datadog::ApiError;
use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using the resource error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of a resource entry point.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The configuration tree is invalid. Nothing was sent to the API.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Configuration(#[from] dashform_model::Error),

    /// The client could not be built.
    #[error("Failed to set up the boards API client: {source}")]
    #[diagnostic(code(dashform_provider::client_setup))]
    ClientSetup {
        /// Underlying client error
        #[source]
        source: ApiError,
    },

    /// The API rejected the new dashboard.
    #[error("Failed to create dashboard: {source}")]
    #[diagnostic(code(dashform_provider::create))]
    CreateFailed {
        /// Underlying API error
        #[source]
        source: ApiError,
    },

    /// The dashboard could not be fetched.
    #[error("Failed to read dashboard {id}: {source}")]
    #[diagnostic(code(dashform_provider::read))]
    ReadFailed {
        /// Dashboard id
        id: String,
        /// Underlying API error
        #[source]
        source: ApiError,
    },

    /// The API rejected the changes.
    #[error("Failed to update dashboard {id}: {source}")]
    #[diagnostic(code(dashform_provider::update))]
    UpdateFailed {
        /// Dashboard id
        id: String,
        /// Underlying API error
        #[source]
        source: ApiError,
    },

    /// The dashboard could not be deleted.
    #[error("Failed to delete dashboard {id}: {source}")]
    #[diagnostic(code(dashform_provider::delete))]
    DeleteFailed {
        /// Dashboard id
        id: String,
        /// Underlying API error
        #[source]
        source: ApiError,
    },

    /// The entry point needs a resource id and none is set.
    #[error("Cannot {operation} a dashboard without an id")]
    #[diagnostic(code(dashform_provider::missing_id))]
    MissingId {
        /// Entry point name
        operation: &'static str,
    },

    /// The imported dashboard does not exist.
    #[error("Cannot import dashboard {id}: it does not exist")]
    #[diagnostic(
        code(dashform_provider::import_not_found),
        help("Check the id in the dashboard URL: /dashboard/<id>/<slug>")
    )]
    ImportNotFound {
        /// Requested id
        id: String,
    },
}

impl Error {
    /// The configuration error, if this is one.
    #[must_use]
    pub const fn as_configuration(&self) -> Option<&dashform_model::Error> {
        match self {
            Self::Configuration(err) => Some(err),
            _ => None,
        }
    }
}
