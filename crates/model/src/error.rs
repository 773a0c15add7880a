//! Error types for dashboard configuration and payload decoding.

use miette::Diagnostic;
use thiserror::Error;

use crate::path::FieldPath;

/// Result type alias using the model error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating or converting a dashboard.
///
/// Every variant is detected locally, before any request reaches the API.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A required attribute is absent or empty.
    #[error("Missing required field: {path}")]
    #[diagnostic(code(dashform::missing_required_field))]
    MissingRequiredField {
        /// Location of the missing attribute
        path: FieldPath,
    },

    /// An attribute holds a value of the wrong shape.
    #[error("Invalid value for {path}: expected {expected}, got {found}")]
    #[diagnostic(code(dashform::invalid_field_value))]
    InvalidFieldValue {
        /// Location of the attribute
        path: FieldPath,
        /// Human readable description of the expected value
        expected: &'static str,
        /// The offending value, rendered as JSON
        found: String,
    },

    /// An enum-constrained attribute holds a value outside its allowed set.
    #[error("Invalid value {value:?} for {path}: expected one of {}", .allowed.join(", "))]
    #[diagnostic(code(dashform::invalid_enum_value))]
    InvalidEnumValue {
        /// Location of the attribute
        path: FieldPath,
        /// The rejected value
        value: String,
        /// Values accepted by the schema
        allowed: Vec<&'static str>,
    },

    /// The configuration names an attribute the schema does not declare.
    #[error("Unsupported attribute: {path}")]
    #[diagnostic(
        code(dashform::unknown_attribute),
        help("Check the attribute name against the resource schema")
    )]
    UnknownAttribute {
        /// Location of the attribute
        path: FieldPath,
    },

    /// A list attribute holds more blocks than the schema allows.
    #[error("Too many items for {path}: at most {max} allowed, got {found}")]
    #[diagnostic(code(dashform::too_many_items))]
    TooManyItems {
        /// Location of the list
        path: FieldPath,
        /// Maximum number of items
        max: usize,
        /// Number of items found
        found: usize,
    },

    /// Two mutually exclusive attributes are both set.
    #[error("{path} conflicts with {other}")]
    #[diagnostic(code(dashform::conflicting_attributes))]
    ConflictingAttributes {
        /// Location of the attribute
        path: FieldPath,
        /// Name of the conflicting sibling attribute
        other: String,
    },

    /// A widget block populates none of the known definition kinds.
    #[error("Failed to find valid definition in widget configuration at {path}")]
    #[diagnostic(
        code(dashform::no_definition_specified),
        help("Add exactly one `<kind>_definition` block to the widget")
    )]
    NoDefinitionSpecified {
        /// Location of the widget
        path: FieldPath,
    },

    /// A widget block populates more than one definition kind.
    #[error("Widget at {path} sets more than one definition: {}", .kinds.join(", "))]
    #[diagnostic(
        code(dashform::multiple_definitions),
        help("A widget must declare exactly one definition; split it into several widgets")
    )]
    MultipleDefinitions {
        /// Location of the widget
        path: FieldPath,
        /// Definition blocks that were populated
        kinds: Vec<String>,
    },

    /// A request block populates none of `q`, `apm_query`, `log_query`, `process_query`.
    #[error("Request at {path} does not specify a query")]
    #[diagnostic(code(dashform::no_query_specified))]
    NoQuerySpecified {
        /// Location of the request
        path: FieldPath,
    },

    /// A request block populates more than one query alternative.
    #[error("Request at {path} sets more than one query: {}", .alternatives.join(", "))]
    #[diagnostic(
        code(dashform::ambiguous_query),
        help("Keep exactly one of q, apm_query, log_query or process_query")
    )]
    AmbiguousQuery {
        /// Location of the request
        path: FieldPath,
        /// Query attributes that were populated
        alternatives: Vec<String>,
    },

    /// A definition carries a discriminator outside the known catalog.
    #[error("Unsupported widget type: {widget_type}")]
    #[diagnostic(code(dashform::unsupported_widget_type))]
    UnsupportedWidgetType {
        /// The unrecognized `type` tag
        widget_type: String,
    },

    /// A group widget contains another group widget.
    #[error("Group widgets cannot contain group widgets: {path}")]
    #[diagnostic(code(dashform::nested_group))]
    NestedGroup {
        /// Location of the nested group
        path: FieldPath,
    },

    /// A wire payload or raw JSON definition could not be decoded.
    #[error("Invalid payload at {path}: {message}")]
    #[diagnostic(code(dashform::invalid_payload))]
    InvalidPayload {
        /// Location of the payload
        path: FieldPath,
        /// Decoder message
        message: String,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    #[diagnostic(code(dashform::serialization_error))]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for [`Error::MissingRequiredField`].
    #[must_use]
    pub fn missing(path: FieldPath) -> Self {
        Self::MissingRequiredField { path }
    }

    /// Shorthand for [`Error::InvalidFieldValue`].
    #[must_use]
    pub fn invalid(path: FieldPath, expected: &'static str, found: &serde_json::Value) -> Self {
        Self::InvalidFieldValue {
            path,
            expected,
            found: found.to_string(),
        }
    }

    /// Shorthand for [`Error::InvalidPayload`].
    pub fn payload(path: FieldPath, message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            path,
            message: message.into(),
        }
    }

    /// The field path this error points at, when it has one.
    #[must_use]
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Self::MissingRequiredField { path }
            | Self::InvalidFieldValue { path, .. }
            | Self::InvalidEnumValue { path, .. }
            | Self::UnknownAttribute { path }
            | Self::TooManyItems { path, .. }
            | Self::ConflictingAttributes { path, .. }
            | Self::NoDefinitionSpecified { path }
            | Self::MultipleDefinitions { path, .. }
            | Self::NoQuerySpecified { path }
            | Self::AmbiguousQuery { path, .. }
            | Self::NestedGroup { path }
            | Self::InvalidPayload { path, .. } => Some(path),
            Self::UnsupportedWidgetType { .. } | Self::Serialization(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let error = Error::missing(FieldPath::from("widget.0.note_definition.0.content"));
        assert_eq!(
            error.to_string(),
            "Missing required field: widget.0.note_definition.0.content"
        );
    }

    #[test]
    fn test_enum_message_lists_allowed_values() {
        let error = Error::InvalidEnumValue {
            path: FieldPath::from("layout_type"),
            value: "grid".to_string(),
            allowed: vec!["ordered", "free"],
        };
        assert_eq!(
            error.to_string(),
            "Invalid value \"grid\" for layout_type: expected one of ordered, free"
        );
    }

    #[test]
    fn test_unsupported_widget_type_carries_tag() {
        let error = Error::UnsupportedWidgetType {
            widget_type: "sunburst".to_string(),
        };
        assert_eq!(error.to_string(), "Unsupported widget type: sunburst");
        assert!(error.path().is_none());
    }

    #[test]
    fn test_path_accessor() {
        let error = Error::NoDefinitionSpecified {
            path: FieldPath::from("widget.2"),
        };
        assert_eq!(error.path().map(ToString::to_string).as_deref(), Some("widget.2"));
    }
}
