//! Prelude module for convenient imports.
//!
//! Re-exports the most commonly used types and functions for easy glob
//! importing:
//!
//! ```ignore
//! use restpoint::prelude::*;
//! ```

pub use crate::{
    Client, Config, Endpoint, EndpointSpec, Error, Method, Params, PendingRequest, Request,
    Response, Result, StatusCode, Transport, from_json, header, mixin, to_json,
};
pub use serde::{Deserialize, Serialize};
