//! # Converter Errors
//!
//! Every conversion call is all-or-nothing: the first error aborts the call and
//! nothing partially built is handed back. The variants below let callers tell
//! a permanently malformed document apart from a failure worth retrying (for
//! example a resolver that timed out).

use crate::identifier::ResourceIdentifier;

/// Boxed error returned by resolver callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used throughout the converter.
pub type Result<T> = std::result::Result<T, ConverterError>;

/// Errors produced while registering types, reading documents or writing them.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConverterError {
    /// Bad or missing type metadata, found at registration or at first use.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A wire type name that the registry does not know.
    #[error("Type not registered: {0}")]
    NotFound(String),

    /// The top-level document shape is invalid.
    #[error("Invalid document: {0}")]
    DocumentFormat(String),

    /// A single resource was expected but a collection arrived, or vice versa.
    #[error("Cardinality mismatch: expected {expected}, found {found}")]
    CardinalityMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A resource showed up where a different type was required.
    #[error("Type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch { expected: String, found: String },

    /// An attribute value could not be stored in (or read from) its field.
    #[error("Attribute `{attribute}` of {resource}: {source}")]
    Attribute {
        resource: ResourceIdentifier,
        attribute: String,
        #[source]
        source: serde_json::Error,
    },

    /// A pool entry was populated twice within one conversion.
    #[error("Resource already populated: {0}")]
    AlreadyPopulated(ResourceIdentifier),

    /// A relationship resolver failed.
    #[error("Resolver failed for `{url}`: {source}")]
    Resolver {
        url: String,
        #[source]
        source: BoxError,
    },

    /// JSON syntax error from the underlying codec, passed through unchanged.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ConverterError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        ConverterError::Configuration(msg.into())
    }

    pub(crate) fn format(msg: impl Into<String>) -> Self {
        ConverterError::DocumentFormat(msg.into())
    }
}
