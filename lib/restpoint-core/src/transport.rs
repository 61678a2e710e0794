//! The HTTP transport seam.
//!
//! The client factory never talks to the network itself; it hands a fully
//! built [`Request`] to a [`Transport`]. The trait is object safe so a client
//! can hold `Arc<dyn Transport>` and mixin functions stay non-generic.

use std::future::Future;
use std::pin::Pin;

use crate::{Request, Response, Result};

/// Boxed future returned by [`Transport::send`].
pub type TransportFuture = Pin<Box<dyn Future<Output = Result<Response>> + Send>>;

/// Executes HTTP requests.
///
/// Implementations own sockets, TLS, redirects, and whatever timeout policy
/// they choose; the client treats their errors as opaque and forwards them
/// unchanged through the request completion path.
pub trait Transport: Send + Sync {
    /// Execute an HTTP request and return the buffered response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason: network errors,
    /// TLS errors, timeouts, or an invalid response.
    fn send(&self, request: Request) -> TransportFuture;
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::Method;

    struct Stub;

    impl Transport for Stub {
        fn send(&self, _request: Request) -> TransportFuture {
            Box::pin(async { Ok(Response::new(204, HashMap::new(), bytes::Bytes::new())) })
        }
    }

    #[test]
    fn transport_is_object_safe() {
        let transport: Arc<dyn Transport> = Arc::new(Stub);
        let url = url::Url::parse("http://example.com/ping").expect("url");
        let _future = transport.send(Request::builder(Method::Get, url).build());
    }
}
