//! Error types for the GitLab client core.
//!
//! # Design
//! Validation failures are raised by the parameter resolver before any request
//! exists, so they get their own `ValidationError` enum that `ApiError` wraps
//! transparently. `TransportError` belongs to the executor and is carried
//! through untouched. A 404 maps to `NotFound`; any other non-2xx status
//! maps to `HttpError`.

use thiserror::Error;

/// A caller-supplied argument map did not satisfy an endpoint's parameter rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The argument is not declared by the endpoint.
    #[error("unknown parameter \"{0}\"")]
    UnknownParameter(String),

    /// A required argument (or path placeholder) was not supplied.
    #[error("missing required parameter \"{0}\"")]
    MissingRequiredParameter(String),

    /// The argument's runtime type is not one of the declared types.
    #[error("parameter \"{key}\" must be of type {expected}, got {actual}")]
    InvalidType {
        key: String,
        expected: String,
        actual: String,
    },

    /// The argument is outside the declared value set or fails its check.
    #[error("parameter \"{key}\" must be {allowed}, got {actual}")]
    InvalidValue {
        key: String,
        allowed: String,
        actual: String,
    },
}

/// Opaque failure reported by an [`Executor`](crate::Executor).
///
/// The core never inspects or retries these; it only hands them back to the
/// caller of the operation that triggered the request.
#[derive(Debug, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn from_source(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors returned by endpoint dispatch, hydration and domain objects.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A response lacked the identity field its model is addressed by.
    #[error("{model} payload is missing identity field \"{field}\"")]
    SchemaMismatch {
        model: &'static str,
        field: &'static str,
    },

    /// Domain objects are read-only once hydrated.
    #[error("cannot set \"{property}\" on {model}: model properties are immutable")]
    ImmutableWrite { model: &'static str, property: String },

    #[error("property \"{property}\" does not exist for {model}")]
    UnknownProperty { model: &'static str, property: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),

    #[error("missing configuration value {0}")]
    MissingConfig(&'static str),
}

impl ApiError {
    /// Returns the validation failure, if this error was raised before I/O.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            ApiError::Validation(err) => Some(err),
            _ => None,
        }
    }
}
