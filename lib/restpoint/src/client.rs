//! The client factory and its namespace surface.

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

use restpoint_core::{Error, Method, Params, Result, Spec, Transport};
use serde_json::Value;

use crate::config::{Config, Options};
use crate::namespace::{self, Node};
use crate::request::PendingRequest;
use crate::transport::HyperTransport;

/// Boxed future returned by mixin functions and [`Client::invoke`].
pub type MixinFuture = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;

/// A mixin: a user function attached to the namespace.
///
/// Mixins receive a clone of the root [`Client`] so they can call sibling
/// endpoints and mixins, plus one JSON argument value. Build one with
/// [`crate::mixin`].
pub type Mixin = Arc<dyn Fn(Client, Value) -> MixinFuture + Send + Sync>;

/// Mixin declarations: leaves are callables.
pub type MixinSpec = Spec<Mixin>;

/// Wrap an async closure as a [`Mixin`].
///
/// ```
/// use restpoint::{Config, mixin};
/// use serde_json::json;
///
/// let config = Config::new()
///     .base_url("http://example.com")
///     .endpoint("user", "/user/:username")
///     .mixin("getUser", mixin(|client, username| async move {
///         client.invoke_endpoint("user", json!({ "username": username })).await
///     }));
/// ```
pub fn mixin<F, Fut>(f: F) -> Mixin
where
    F: Fn(Client, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Arc::new(move |client, args| Box::pin(f(client, args)))
}

struct ClientInner {
    options: Arc<Options>,
    root: Node,
    transport: Arc<dyn Transport>,
}

/// The root client: a namespace of request-issuing handles built from a
/// [`Config`].
///
/// Construction is synchronous and performs no I/O. The client is cheaply
/// cloneable and immutable after construction, so any number of requests may
/// be in flight concurrently.
///
/// # Example
///
/// ```no_run
/// use restpoint::{Client, Config};
/// use serde_json::json;
///
/// # async fn run() -> restpoint::Result<()> {
/// let client = Client::new(
///     Config::new()
///         .base_url("http://example.com")
///         .endpoint("user", "/user/:username"),
/// )?;
///
/// let body = client
///     .endpoint("user")
///     .expect("declared")
///     .get(json!({ "username": "alice" }))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("options", &self.inner.options)
            .field("namespace", &self.keys())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Build a client over the default [`HyperTransport`].
    ///
    /// # Errors
    ///
    /// Fails synchronously on invalid declarations: a duplicate namespace key
    /// or an endpoint with an empty URL pattern.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_transport(config, Arc::new(HyperTransport::new()))
    }

    /// Build a client over a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Client::new`].
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Result<Self> {
        let (options, endpoints, mixins) = config.into_parts();
        let root = namespace::build(endpoints, mixins)?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                options: Arc::new(options),
                root,
                transport,
            }),
        })
    }

    /// The normalized, read-only options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.inner.options
    }

    /// Dotted paths of every namespace entry, depth first.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        namespace::keys(&self.inner.root)
    }

    /// Issue a request against an explicit URL pattern.
    ///
    /// Never fails synchronously: any resolution problem is captured in the
    /// returned request and surfaces when it completes.
    pub fn call(&self, method: Method, pattern: &str, params: impl Into<Params>) -> PendingRequest {
        PendingRequest::new(
            Arc::clone(&self.inner.transport),
            Arc::clone(&self.inner.options),
            method,
            pattern,
            params.into(),
        )
    }

    /// GET against an explicit URL pattern.
    pub fn get(&self, pattern: &str, params: impl Into<Params>) -> PendingRequest {
        self.call(Method::Get, pattern, params)
    }

    /// POST against an explicit URL pattern.
    pub fn post(&self, pattern: &str, params: impl Into<Params>) -> PendingRequest {
        self.call(Method::Post, pattern, params)
    }

    /// PUT against an explicit URL pattern.
    pub fn put(&self, pattern: &str, params: impl Into<Params>) -> PendingRequest {
        self.call(Method::Put, pattern, params)
    }

    /// DELETE against an explicit URL pattern.
    pub fn delete(&self, pattern: &str, params: impl Into<Params>) -> PendingRequest {
        self.call(Method::Delete, pattern, params)
    }

    /// PATCH against an explicit URL pattern.
    pub fn patch(&self, pattern: &str, params: impl Into<Params>) -> PendingRequest {
        self.call(Method::Patch, pattern, params)
    }

    /// HEAD against an explicit URL pattern.
    pub fn head(&self, pattern: &str, params: impl Into<Params>) -> PendingRequest {
        self.call(Method::Head, pattern, params)
    }

    /// Look up an endpoint handle by dotted path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> Option<Endpoint> {
        let node = namespace::find(&self.inner.root, path)?;
        let pattern = node.pattern.clone()?;
        Some(Endpoint {
            client: self.clone(),
            pattern,
        })
    }

    /// Look up a mixin by dotted path.
    #[must_use]
    pub fn mixin(&self, path: &str) -> Option<Mixin> {
        namespace::find(&self.inner.root, path)?.mixin.clone()
    }

    /// Invoke the mixin at the dotted path with the given argument.
    ///
    /// An unknown path resolves to [`Error::UnknownKey`].
    pub fn invoke(&self, path: &str, args: Value) -> MixinFuture {
        match self.mixin(path) {
            Some(mixin) => mixin(self.clone(), args),
            None => {
                let err = Error::unknown_key(path);
                Box::pin(async move { Err(err) })
            }
        }
    }

    /// Await the endpoint at the dotted path with a GET, yielding the decoded
    /// body. Convenience for mixins; an unknown path fails with
    /// [`Error::UnknownKey`].
    pub fn invoke_endpoint(&self, path: &str, params: impl Into<Params>) -> MixinFuture {
        match self.endpoint(path) {
            Some(endpoint) => endpoint.get(params).into_future(),
            None => {
                let err = Error::unknown_key(path);
                Box::pin(async move { Err(err) })
            }
        }
    }
}

/// A namespace leaf bound to a fixed URL pattern.
///
/// Callable with an optional method (defaulting to GET) or through one
/// per-method shortcut; every call resolves the same pattern.
#[derive(Debug, Clone)]
pub struct Endpoint {
    client: Client,
    pattern: String,
}

impl Endpoint {
    /// The URL pattern this endpoint resolves.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Issue a request; `None` defaults the method to GET.
    pub fn call(
        &self,
        method: impl Into<Option<Method>>,
        params: impl Into<Params>,
    ) -> PendingRequest {
        let method = method.into().unwrap_or(Method::Get);
        self.client.call(method, &self.pattern, params)
    }

    /// GET this endpoint.
    pub fn get(&self, params: impl Into<Params>) -> PendingRequest {
        self.client.call(Method::Get, &self.pattern, params)
    }

    /// POST this endpoint.
    pub fn post(&self, params: impl Into<Params>) -> PendingRequest {
        self.client.call(Method::Post, &self.pattern, params)
    }

    /// PUT this endpoint.
    pub fn put(&self, params: impl Into<Params>) -> PendingRequest {
        self.client.call(Method::Put, &self.pattern, params)
    }

    /// DELETE this endpoint.
    pub fn delete(&self, params: impl Into<Params>) -> PendingRequest {
        self.client.call(Method::Delete, &self.pattern, params)
    }

    /// PATCH this endpoint.
    pub fn patch(&self, params: impl Into<Params>) -> PendingRequest {
        self.client.call(Method::Patch, &self.pattern, params)
    }

    /// HEAD this endpoint.
    pub fn head(&self, params: impl Into<Params>) -> PendingRequest {
        self.client.call(Method::Head, &self.pattern, params)
    }
}
