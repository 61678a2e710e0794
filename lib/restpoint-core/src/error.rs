//! Error types for restpoint.
//!
//! The taxonomy splits three ways:
//! - request-construction failures (`MissingUrl`, `InvalidParams`,
//!   `MissingParameter`, `MethodNotAllowed`, `InvalidUrl`) are captured when a
//!   request is built and surface only when it completes;
//! - client-construction failures (`DuplicateKey`, `EndpointUrlRequired`) are
//!   returned synchronously from client construction;
//! - transport failures (`Http`, `Connection`, `Tls`, `Timeout`) pass through
//!   the completion path unchanged.

use derive_more::{Display, Error, From};

use crate::Method;

/// Main error type for restpoint operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// No target URL pattern was provided for a request.
    #[display("no target URL was provided")]
    #[from(skip)]
    MissingUrl,

    /// Params were supplied but are not a JSON object.
    #[display("expected an object for params, found {_0}")]
    #[from(skip)]
    InvalidParams(#[error(not(source))] &'static str),

    /// A required named parameter was absent from the params object.
    #[display("expected {name:?} to be defined")]
    #[from(skip)]
    MissingParameter {
        /// Name of the placeholder that had no value.
        name: String,
    },

    /// The request method is outside the client's allowed set.
    #[display("method {_0} is not allowed by this client")]
    #[from(skip)]
    MethodNotAllowed(#[error(not(source))] Method),

    /// URL parsing or base-URL resolution error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// An endpoint or mixin key collides with an existing namespace entry.
    #[display("cannot add {path:?}, key already exists")]
    #[from(skip)]
    DuplicateKey {
        /// Dotted path of the colliding key.
        path: String,
    },

    /// An endpoint was declared with an empty URL pattern.
    #[display("no url was provided for the {path:?} endpoint")]
    #[from(skip)]
    EndpointUrlRequired {
        /// Dotted path of the offending endpoint.
        path: String,
    },

    /// A namespace lookup named a path that was never declared.
    #[display("no endpoint or mixin named {path:?}")]
    #[from(skip)]
    UnknownKey {
        /// Dotted path that failed to resolve.
        path: String,
    },

    /// HTTP-level errors (non-2xx status codes).
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
        /// Response body, if available.
        #[error(not(source))]
        body: Option<bytes::Bytes>,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a missing-parameter error naming the placeholder.
    #[must_use]
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    /// Create a duplicate-key error for the given dotted path.
    #[must_use]
    pub fn duplicate_key(path: impl Into<String>) -> Self {
        Self::DuplicateKey { path: path.into() }
    }

    /// Create an empty-endpoint-URL error for the given dotted path.
    #[must_use]
    pub fn endpoint_url_required(path: impl Into<String>) -> Self {
        Self::EndpointUrlRequired { path: path.into() }
    }

    /// Create an unknown-key error for the given dotted path.
    #[must_use]
    pub fn unknown_key(path: impl Into<String>) -> Self {
        Self::UnknownKey { path: path.into() }
    }

    /// Create an HTTP error from status code and message.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Create an HTTP error with body.
    #[must_use]
    pub fn http_with_body(status: u16, message: impl Into<String>, body: bytes::Bytes) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: Some(body),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if this failure was captured while building the request,
    /// before any transport activity.
    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        matches!(
            self,
            Self::MissingUrl
                | Self::InvalidParams(_)
                | Self::MissingParameter { .. }
                | Self::MethodNotAllowed(_)
                | Self::InvalidUrl(_)
        )
    }

    /// Returns the HTTP status code if this is an HTTP error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns the response body if this is an HTTP error with a body.
    #[must_use]
    pub fn body(&self) -> Option<&bytes::Bytes> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Try to decode the HTTP error body as JSON.
    ///
    /// Returns `Some(Ok(value))` if the error has a body and it deserializes
    /// successfully, `Some(Err(error))` if the body exists but deserialization
    /// fails, or `None` if there is no body or this is not an HTTP error.
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.body().map(|body| crate::from_json(body))
    }
}
