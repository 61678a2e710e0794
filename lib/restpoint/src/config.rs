//! Client configuration types.
//!
//! [`Config`] is the partial, user-facing configuration: every field has a
//! default and builder-style setters overlay the caller's values shallowly.
//! [`Options`] is the normalized record a built client retains; nothing
//! mutates it after construction. Validation happens in the components that
//! consume each field, not here.

use std::collections::BTreeMap;
use std::sync::Arc;

use restpoint_core::{EndpointSpec, Error, Method, Response};

use crate::client::MixinSpec;

/// Hook invoked with the raw response after a successful completion.
pub type DebugHook = Arc<dyn Fn(&Response) + Send + Sync>;

/// Hook invoked with the error after a failed completion.
pub type ErrorHook = Arc<dyn Fn(&Error) + Send + Sync>;

/// Authentication applied to every outgoing request.
#[derive(Clone, Default)]
pub enum Auth {
    /// No authentication.
    #[default]
    None,
    /// HTTP Basic credentials.
    Basic {
        /// Username.
        user: String,
        /// Password.
        pass: String,
    },
    /// Bearer token (`Authorization: Bearer <token>`).
    Bearer(String),
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Basic { user, .. } => f.debug_struct("Basic").field("user", user).finish_non_exhaustive(),
            Self::Bearer(_) => f.write_str("Bearer(..)"),
        }
    }
}

/// Partial client configuration.
///
/// # Example
///
/// ```
/// use restpoint::Config;
///
/// let config = Config::new()
///     .base_url("http://example.com")
///     .header("Accept", "application/json")
///     .endpoint("user", "/user/:username")
///     .endpoint("orders.byId", "/order/:orderid");
/// ```
#[derive(Clone)]
pub struct Config {
    pub(crate) base_url: String,
    pub(crate) methods: Vec<Method>,
    pub(crate) headers: BTreeMap<String, String>,
    pub(crate) endpoints: BTreeMap<String, EndpointSpec>,
    pub(crate) mixins: BTreeMap<String, MixinSpec>,
    pub(crate) auth: Auth,
    pub(crate) log_debug: DebugHook,
    pub(crate) log_error: ErrorHook,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            methods: Method::standard().to_vec(),
            headers: BTreeMap::new(),
            endpoints: BTreeMap::new(),
            mixins: BTreeMap::new(),
            auth: Auth::None,
            // Inert without a tracing subscriber
            log_debug: Arc::new(|response| {
                tracing::debug!(status = response.status(), "request completed");
            }),
            log_error: Arc::new(|error| {
                tracing::error!(error = %error, "request failed");
            }),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("methods", &self.methods)
            .field("headers", &self.headers)
            .field("endpoints", &self.endpoints)
            .field("mixins", &self.mixins.keys().collect::<Vec<_>>())
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Create a configuration with the defaults: empty base URL, the six
    /// standard methods, no headers, empty endpoint/mixin trees, no auth.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL requests resolve against.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the allowed HTTP methods.
    #[must_use]
    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    /// Set a default header applied to every request.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set multiple default headers.
    #[must_use]
    pub fn headers(
        mut self,
        headers: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Declare an endpoint. The key may be a dotted path (`"orders.byId"`)
    /// and the spec a URL pattern or a nested tree.
    #[must_use]
    pub fn endpoint(mut self, key: impl Into<String>, spec: impl Into<EndpointSpec>) -> Self {
        self.endpoints.insert(key.into(), spec.into());
        self
    }

    /// Declare multiple endpoints.
    #[must_use]
    pub fn endpoints(
        mut self,
        endpoints: impl IntoIterator<Item = (impl Into<String>, EndpointSpec)>,
    ) -> Self {
        self.endpoints
            .extend(endpoints.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Declare a mixin. The key may be a dotted path and the spec a callable
    /// (see [`crate::mixin`]) or a nested tree.
    #[must_use]
    pub fn mixin(mut self, key: impl Into<String>, spec: impl Into<MixinSpec>) -> Self {
        self.mixins.insert(key.into(), spec.into());
        self
    }

    /// Declare multiple mixins.
    #[must_use]
    pub fn mixins(
        mut self,
        mixins: impl IntoIterator<Item = (impl Into<String>, MixinSpec)>,
    ) -> Self {
        self.mixins
            .extend(mixins.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Use HTTP Basic authentication for every request.
    #[must_use]
    pub fn basic_auth(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.auth = Auth::Basic {
            user: user.into(),
            pass: pass.into(),
        };
        self
    }

    /// Use a bearer token for every request.
    #[must_use]
    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Auth::Bearer(token.into());
        self
    }

    /// Replace the debug-log hook fired on successful completions.
    #[must_use]
    pub fn log_debug(mut self, hook: impl Fn(&Response) + Send + Sync + 'static) -> Self {
        self.log_debug = Arc::new(hook);
        self
    }

    /// Replace the error-log hook fired on failed completions.
    #[must_use]
    pub fn log_error(mut self, hook: impl Fn(&Error) + Send + Sync + 'static) -> Self {
        self.log_error = Arc::new(hook);
        self
    }

    /// Split into the retained options and the declaration trees consumed by
    /// namespace construction.
    pub(crate) fn into_parts(
        self,
    ) -> (
        Options,
        BTreeMap<String, EndpointSpec>,
        BTreeMap<String, MixinSpec>,
    ) {
        let options = Options {
            base_url: self.base_url,
            methods: self.methods,
            headers: self.headers,
            auth: self.auth,
            log_debug: self.log_debug,
            log_error: self.log_error,
        };
        (options, self.endpoints, self.mixins)
    }
}

/// Normalized options retained by a built client, read-only thereafter.
#[derive(Clone)]
pub struct Options {
    base_url: String,
    methods: Vec<Method>,
    headers: BTreeMap<String, String>,
    auth: Auth,
    pub(crate) log_debug: DebugHook,
    pub(crate) log_error: ErrorHook,
}

impl Options {
    /// The configured base URL, empty when none was set.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The allowed HTTP methods.
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Default headers applied to every request.
    #[must_use]
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// The configured authentication.
    #[must_use]
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Returns `true` if the method is in the allowed set.
    #[must_use]
    pub fn allows(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("base_url", &self.base_url)
            .field("methods", &self.methods)
            .field("headers", &self.headers)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}
