//! Core types for the restpoint declarative HTTP client.
//!
//! This crate provides the foundational types used by restpoint:
//! - [`Method`] - HTTP method enum
//! - [`Request`] and [`RequestBuilder`] - transport-level request types
//! - [`Response`] - HTTP response type
//! - [`Error`] and [`Result`] - Error handling
//! - [`Params`] - named parameters for URL templates
//! - [`template`] - URL pattern compiler (`/user/:username`)
//! - [`Transport`] - the HTTP execution seam
//! - [`Spec`] / [`EndpointSpec`] - namespace declaration trees
//! - [`StatusCode`] and [`header`] - re-exported from the `http` crate

mod body;
mod error;
mod method;
mod params;
mod request;
mod response;
mod spec;
pub mod template;
mod transport;

pub use body::{from_json, to_json};
pub use error::{Error, Result};
pub use method::Method;
pub use params::Params;
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use spec::{EndpointSpec, Spec};
pub use transport::{Transport, TransportFuture};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
