//! Declarative HTTP client factory.
//!
//! Describe a REST surface once — base URL, allowed methods, default headers,
//! authentication, and a tree of named endpoints and mixins — and get back a
//! [`Client`] whose namespace mirrors the declaration. Requests never fail at
//! construction time: resolution problems are captured and surface only when
//! the request completes.
//!
//! # Example
//!
//! ```no_run
//! use restpoint::{Client, Config, mixin};
//! use serde_json::json;
//!
//! # async fn run() -> restpoint::Result<()> {
//! let client = Client::new(
//!     Config::new()
//!         .base_url("https://api.example.com")
//!         .header("Accept", "application/json")
//!         .endpoint("user", "/user/:username")
//!         .endpoint("orders.byId", "/order/:orderid")
//!         .mixin("getUser", mixin(|client, username| async move {
//!             client
//!                 .invoke_endpoint("user", json!({ "username": username }))
//!                 .await
//!         })),
//! )?;
//!
//! // Named endpoint, awaited directly for the decoded body.
//! let user = client
//!     .endpoint("user")
//!     .expect("declared")
//!     .get(json!({ "username": "alice" }))
//!     .await?;
//!
//! // Ad-hoc pattern, completed for the full response.
//! let response = client.get("/status", ()).end().await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod namespace;
pub mod prelude;
mod request;
mod transport;

// Re-export client types
pub use client::{Client, Endpoint, Mixin, MixinFuture, MixinSpec, mixin};
pub use config::{Auth, Config, DebugHook, ErrorHook, Options};
pub use request::PendingRequest;
pub use transport::HyperTransport;

// Re-export core types
pub use restpoint_core::{
    EndpointSpec, Error, Method, Params, Request, RequestBuilder, Response, Result, Spec,
    Transport, TransportFuture, from_json, template, to_json,
};

// Re-export http types for status codes and headers
pub use restpoint_core::{StatusCode, header};

pub use url;
