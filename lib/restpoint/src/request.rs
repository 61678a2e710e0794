//! The request wrapper and its dual completion surface.
//!
//! Building a [`PendingRequest`] never fails: every resolution problem
//! (missing URL, bad params, missing template parameter, disallowed method,
//! unparseable URL) is captured and surfaces only at completion. A request
//! with a captured failure never contacts the transport.
//!
//! Completion comes in two forms, both consuming the request so the logging
//! hooks fire exactly once:
//! - [`PendingRequest::end`] yields the full [`Response`];
//! - awaiting the request directly yields the decoded body (or the raw text
//!   when the body is not JSON).

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

use base64::Engine;
use bytes::Bytes;
use restpoint_core::{
    Error, Method, Params, Request, Response, Result, StatusCode, Transport, template,
};
use serde_json::Value;
use url::Url;

use crate::config::{Auth, Options};

/// One outbound request, carrying either a resolved transport request or a
/// failure captured during construction.
pub struct PendingRequest {
    transport: Arc<dyn Transport>,
    options: Arc<Options>,
    outcome: Result<Request>,
}

impl std::fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRequest")
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

impl PendingRequest {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        options: Arc<Options>,
        method: Method,
        pattern: &str,
        params: Params,
    ) -> Self {
        let outcome = resolve(&options, method, pattern, &params).map(|url| {
            let mut request = Request::builder(method, url).build();
            apply_auth(&mut request, options.auth());
            for (name, value) in options.headers() {
                request.insert_header(name.clone(), value.clone());
            }
            request
        });

        Self {
            transport,
            options,
            outcome,
        }
    }

    /// The built transport request, or the failure captured while building it.
    pub fn built(&self) -> std::result::Result<&Request, &Error> {
        self.outcome.as_ref()
    }

    /// Set a header on the in-flight request.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Ok(request) = &mut self.outcome {
            request.insert_header(name, value);
        }
        self
    }

    /// Set a raw request body.
    #[must_use]
    pub fn body(mut self, body: Bytes) -> Self {
        if let Ok(request) = &mut self.outcome {
            request.set_body(body);
        }
        self
    }

    /// Set a JSON request body with the matching content type.
    ///
    /// A serialization failure replaces a successful outcome and surfaces at
    /// completion like any other captured failure.
    #[must_use]
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Self {
        self.outcome = self.outcome.and_then(|mut request| {
            let body = restpoint_core::to_json(value)?;
            request.insert_header("Content-Type", "application/json");
            request.set_body(body);
            Ok(request)
        });
        self
    }

    /// Complete the request, yielding the full response.
    ///
    /// A captured failure is routed through the error-log hook and returned
    /// without contacting the transport. Otherwise the transport result is
    /// routed through the matching hook and forwarded unchanged; a non-2xx
    /// status becomes [`Error::Http`] carrying the response body.
    pub async fn end(self) -> Result<Response> {
        let request = match self.outcome {
            Ok(request) => request,
            Err(err) => {
                (self.options.log_error)(&err);
                return Err(err);
            }
        };

        let result = match self.transport.send(request).await {
            Ok(response) if response.is_success() => Ok(response),
            Ok(response) => {
                let status = response.status();
                let reason = StatusCode::from_u16(status)
                    .ok()
                    .and_then(|code| code.canonical_reason())
                    .unwrap_or("HTTP error");
                Err(Error::http_with_body(status, reason, response.into_body()))
            }
            Err(err) => Err(err),
        };

        match &result {
            Ok(response) => (self.options.log_debug)(response),
            Err(err) => (self.options.log_error)(err),
        }
        result
    }
}

impl IntoFuture for PendingRequest {
    type Output = Result<Value>;
    type IntoFuture = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { Ok(self.end().await?.body_value()) })
    }
}

/// Resolve a URL pattern into a concrete absolute URL. Every failure here is
/// captured by the caller, never thrown.
fn resolve(options: &Options, method: Method, pattern: &str, params: &Params) -> Result<Url> {
    if !options.allows(method) {
        return Err(Error::MethodNotAllowed(method));
    }
    if pattern.is_empty() {
        return Err(Error::MissingUrl);
    }
    params.fields()?;

    let path = template::compile(pattern, params)?;
    if options.base_url().is_empty() {
        Ok(Url::parse(&path)?)
    } else {
        let base = Url::parse(options.base_url())?;
        Ok(base.join(&path)?)
    }
}

fn apply_auth(request: &mut Request, auth: &Auth) {
    match auth {
        Auth::None => {}
        Auth::Basic { user, pass } => {
            let credentials =
                base64::engine::general_purpose::STANDARD.encode(format!("{user}:{pass}"));
            request.insert_header("Authorization", format!("Basic {credentials}"));
        }
        Auth::Bearer(token) => {
            request.insert_header("Authorization", format!("Bearer {token}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert2::check;
    use restpoint_core::TransportFuture;
    use serde_json::json;

    use super::*;
    use crate::config::Config;

    /// Transport that counts calls and echoes a canned response.
    struct CountingTransport {
        calls: Arc<AtomicUsize>,
        status: u16,
        body: &'static str,
    }

    impl CountingTransport {
        fn ok(calls: Arc<AtomicUsize>) -> Self {
            Self {
                calls,
                status: 200,
                body: r#"{"ok":true}"#,
            }
        }
    }

    impl Transport for CountingTransport {
        fn send(&self, _request: Request) -> TransportFuture {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let status = self.status;
            let body = Bytes::from_static(self.body.as_bytes());
            Box::pin(async move { Ok(Response::new(status, HashMap::new(), body)) })
        }
    }

    fn pending(config: Config, method: Method, pattern: &str, params: Params) -> PendingRequest {
        let calls = Arc::new(AtomicUsize::new(0));
        pending_counted(config, method, pattern, params, calls)
    }

    fn pending_counted(
        config: Config,
        method: Method,
        pattern: &str,
        params: Params,
        calls: Arc<AtomicUsize>,
    ) -> PendingRequest {
        let (options, _, _) = config.into_parts();
        PendingRequest::new(
            Arc::new(CountingTransport::ok(calls)),
            Arc::new(options),
            method,
            pattern,
            params,
        )
    }

    #[test]
    fn resolves_pattern_against_base_url() {
        let request = pending(
            Config::new().base_url("http://example.com"),
            Method::Get,
            "/user/:username",
            json!({ "username": "alice" }).into(),
        );

        let built = request.built().expect("resolved");
        check!(built.url().as_str() == "http://example.com/user/alice");
        check!(built.method() == Method::Get);
    }

    #[test]
    fn applies_auth_and_default_headers_eagerly() {
        let request = pending(
            Config::new()
                .base_url("http://example.com")
                .basic_auth("USERNAME", "PASSWORD")
                .header("Accepts", "text/text"),
            Method::Put,
            "/user/USERNAME",
            Params::none(),
        );

        let built = request.built().expect("resolved");
        check!(built.header("Authorization") == Some("Basic VVNFUk5BTUU6UEFTU1dPUkQ="));
        check!(built.header("Accepts") == Some("text/text"));
    }

    #[test]
    fn applies_bearer_token() {
        let request = pending(
            Config::new()
                .base_url("http://example.com")
                .bearer_auth("ABCDEFGHIJKLMNOPQRSTUVWXYZ"),
            Method::Patch,
            "/user/USERNAME",
            Params::none(),
        );

        let built = request.built().expect("resolved");
        check!(built.header("Authorization") == Some("Bearer ABCDEFGHIJKLMNOPQRSTUVWXYZ"));
    }

    #[test]
    fn captures_missing_parameter() {
        let request = pending(
            Config::new().base_url("http://example.com"),
            Method::Get,
            "/user/:username",
            Params::none(),
        );

        let err = request.built().expect_err("captured");
        check!(err.to_string() == "expected \"username\" to be defined");
    }

    #[test]
    fn captures_missing_url_and_bad_params() {
        let config = Config::new().base_url("http://example.com");

        let request = pending(config.clone(), Method::Get, "", Params::none());
        check!(matches!(request.built(), Err(Error::MissingUrl)));

        let request = pending(
            config,
            Method::Get,
            "/user",
            json!("not an object").into(),
        );
        check!(matches!(request.built(), Err(Error::InvalidParams("string"))));
    }

    #[test]
    fn captures_disallowed_method() {
        let request = pending(
            Config::new()
                .base_url("http://example.com")
                .methods([Method::Get]),
            Method::Delete,
            "/user",
            Params::none(),
        );

        check!(matches!(
            request.built(),
            Err(Error::MethodNotAllowed(Method::Delete))
        ));
    }

    #[test]
    fn relative_pattern_without_base_url_is_captured() {
        let request = pending(Config::new(), Method::Get, "/user", Params::none());
        check!(matches!(request.built(), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn absolute_pattern_without_base_url_resolves() {
        let request = pending(
            Config::new(),
            Method::Get,
            "http://example.com/user",
            Params::none(),
        );
        check!(request.built().is_ok());
    }

    #[tokio::test]
    async fn deferred_failure_never_contacts_the_transport() {
        let calls = Arc::new(AtomicUsize::new(0));
        let request = pending_counted(
            Config::new().base_url("http://example.com"),
            Method::Get,
            "/user/:username",
            Params::none(),
            Arc::clone(&calls),
        );

        let err = request.end().await.expect_err("deferred failure");
        check!(err.to_string() == "expected \"username\" to be defined");
        check!(calls.load(Ordering::SeqCst) == 0);
    }

    #[tokio::test]
    async fn deferred_failure_surfaces_on_await_too() {
        let calls = Arc::new(AtomicUsize::new(0));
        let request = pending_counted(
            Config::new().base_url("http://example.com"),
            Method::Get,
            "/user/:username",
            Params::none(),
            Arc::clone(&calls),
        );

        let err = request.await.expect_err("deferred failure");
        check!(err.to_string() == "expected \"username\" to be defined");
        check!(calls.load(Ordering::SeqCst) == 0);
    }

    #[tokio::test]
    async fn end_yields_full_response_and_await_yields_decoded_body() {
        let config = Config::new().base_url("http://example.com");

        let response = pending(config.clone(), Method::Get, "/ok", Params::none())
            .end()
            .await
            .expect("response");
        check!(response.status() == 200);
        check!(response.body().as_ref() == br#"{"ok":true}"#);

        let body = pending(config, Method::Get, "/ok", Params::none())
            .await
            .expect("body");
        check!(body == json!({ "ok": true }));
    }

    #[tokio::test]
    async fn non_success_status_becomes_http_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let transport = CountingTransport {
            calls: Arc::clone(&calls),
            status: 404,
            body: "missing",
        };
        let (options, _, _) = Config::new().base_url("http://example.com").into_parts();
        let request = PendingRequest::new(
            Arc::new(transport),
            Arc::new(options),
            Method::Get,
            "/nope",
            Params::none(),
        );

        let err = request.end().await.expect_err("http error");
        check!(err.status() == Some(404));
        check!(err.body().map(AsRef::as_ref) == Some(b"missing".as_ref()));
        check!(calls.load(Ordering::SeqCst) == 1);
    }

    #[tokio::test]
    async fn hooks_fire_once_per_completion() {
        let errors = Arc::new(AtomicUsize::new(0));
        let debugs = Arc::new(AtomicUsize::new(0));
        let config = {
            let errors = Arc::clone(&errors);
            let debugs = Arc::clone(&debugs);
            Config::new()
                .base_url("http://example.com")
                .log_error(move |_| {
                    errors.fetch_add(1, Ordering::SeqCst);
                })
                .log_debug(move |_| {
                    debugs.fetch_add(1, Ordering::SeqCst);
                })
        };

        pending(config.clone(), Method::Get, "/ok", Params::none())
            .end()
            .await
            .expect("response");
        check!(debugs.load(Ordering::SeqCst) == 1);
        check!(errors.load(Ordering::SeqCst) == 0);

        pending(config, Method::Get, "/user/:id", Params::none())
            .await
            .expect_err("deferred failure");
        check!(debugs.load(Ordering::SeqCst) == 1);
        check!(errors.load(Ordering::SeqCst) == 1);
    }

    #[test]
    fn json_body_mutator() {
        #[derive(serde::Serialize)]
        struct Payload {
            name: &'static str,
        }

        let request = pending(
            Config::new().base_url("http://example.com"),
            Method::Post,
            "/user",
            Params::none(),
        )
        .json(&Payload { name: "alice" });

        let built = request.built().expect("resolved");
        check!(built.header("Content-Type") == Some("application/json"));
        check!(built.body().map(AsRef::as_ref) == Some(br#"{"name":"alice"}"#.as_ref()));
    }
}
