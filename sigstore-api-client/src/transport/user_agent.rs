//! `User-Agent` decoration for request senders.
//!
//! [`UserAgent`] wraps any [`Service`] that accepts `http::Request`s and
//! stamps each outgoing request with a fixed `User-Agent` header before
//! handing it to the wrapped service. Everything else about the request and
//! everything about the response or error is passed through untouched.
//!
//! # Example
//!
//! ```ignore
//! use sigstore_api_client::transport::{HyperTransport, UserAgentLayer};
//! use http::HeaderValue;
//! use tower::ServiceBuilder;
//!
//! let transport = ServiceBuilder::new()
//!     .layer(UserAgentLayer::new(HeaderValue::from_static("cosign/2.0")))
//!     .service(HyperTransport::new()?);
//! ```

use std::task::{Context, Poll};

use http::header::USER_AGENT;
use http::{HeaderValue, Request};
use tower::Layer;
use tower_service::Service;

use super::{BoxTransport, HyperTransport};
use crate::{ClientBuildError, ClientOptions};

/// Sets the `User-Agent` header on every request before delegating.
///
/// Holds no mutable state, so clones can be used concurrently.
#[derive(Debug, Clone)]
pub struct UserAgent<S> {
    inner: S,
    user_agent: Option<HeaderValue>,
}

impl<S> UserAgent<S> {
    /// Wrap `inner`.
    ///
    /// With `None`, requests are forwarded with whatever `User-Agent` they
    /// already carry.
    pub fn new(inner: S, user_agent: Option<HeaderValue>) -> Self {
        Self { inner, user_agent }
    }

    /// The header value injected into requests, if any.
    pub fn user_agent(&self) -> Option<&HeaderValue> {
        self.user_agent.as_ref()
    }
}

impl<S, B> Service<Request<B>> for UserAgent<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        if let Some(user_agent) = &self.user_agent {
            #[cfg(feature = "tracing")]
            tracing::trace!(user_agent = ?user_agent, uri = %req.uri(), "setting user agent");
            req.headers_mut().insert(USER_AGENT, user_agent.clone());
        }
        self.inner.call(req)
    }
}

/// [`Layer`] producing [`UserAgent`] services.
#[derive(Debug, Clone, Default)]
pub struct UserAgentLayer {
    user_agent: Option<HeaderValue>,
}

impl UserAgentLayer {
    /// Inject `user_agent` into every request.
    pub fn new(user_agent: HeaderValue) -> Self {
        Self {
            user_agent: Some(user_agent),
        }
    }

    /// Build the layer from resolved options.
    ///
    /// An empty `user_agent` yields a pass-through layer.
    pub fn from_options(options: &ClientOptions) -> Result<Self, ClientBuildError> {
        if options.user_agent.is_empty() {
            return Ok(Self::default());
        }
        let value = HeaderValue::from_str(&options.user_agent)
            .map_err(|_| ClientBuildError::InvalidUserAgent(options.user_agent.clone()))?;
        Ok(Self::new(value))
    }
}

impl<S> Layer<S> for UserAgentLayer {
    type Service = UserAgent<S>;

    fn layer(&self, inner: S) -> Self::Service {
        UserAgent::new(inner, self.user_agent.clone())
    }
}

/// Decorate `inner` according to `options`.
///
/// When `inner` is `None` the default [`HyperTransport`] is used, so the
/// result always has a transport to send through.
///
/// # Errors
///
/// Returns [`ClientBuildError::InvalidUserAgent`] if the user agent is not a
/// valid header value, or [`ClientBuildError::Tls`] if the default transport
/// is needed and cannot be built.
pub fn create_transport(
    inner: Option<BoxTransport>,
    options: &ClientOptions,
) -> Result<UserAgent<BoxTransport>, ClientBuildError> {
    let layer = UserAgentLayer::from_options(options)?;
    let inner = match inner {
        Some(inner) => inner,
        None => BoxTransport::new(HyperTransport::new()?),
    };
    Ok(layer.layer(inner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::{Arc, Mutex};

    use http::Response;
    use tower::ServiceExt;

    use crate::transport::{TransportBody, full_response_body};
    use crate::{ClientError, make_options, with_user_agent};

    type Seen = Arc<Mutex<Vec<Request<()>>>>;

    /// Records every request and answers with the same canned response.
    fn recording(
        resp: Arc<Response<()>>,
    ) -> (
        Seen,
        impl Service<Request<()>, Response = Arc<Response<()>>, Error = Infallible> + Clone,
    ) {
        let seen: Seen = Arc::default();
        let svc = tower::service_fn({
            let seen = seen.clone();
            move |req: Request<()>| {
                seen.lock().unwrap().push(req);
                let resp = resp.clone();
                async move { Ok::<_, Infallible>(resp) }
            }
        });
        (seen, svc)
    }

    fn test_request() -> Request<()> {
        Request::get("http://www.example.com/test").body(()).unwrap()
    }

    #[tokio::test]
    async fn test_sets_user_agent_and_returns_inner_response() {
        let canned = Arc::new(Response::builder().status(200).body(()).unwrap());
        let (seen, inner) = recording(canned.clone());

        let svc = UserAgent::new(inner, Some(HeaderValue::from_static("test UserAgent")));
        let got = svc.oneshot(test_request()).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1, "inner service should be called exactly once");
        assert_eq!(seen[0].headers()[USER_AGENT], "test UserAgent");
        assert!(Arc::ptr_eq(&got, &canned));
    }

    #[tokio::test]
    async fn test_overwrites_existing_user_agent() {
        let (seen, inner) = recording(Arc::new(Response::new(())));
        let svc = UserAgent::new(inner, Some(HeaderValue::from_static("configured")));

        let mut req = test_request();
        req.headers_mut()
            .insert(USER_AGENT, HeaderValue::from_static("caller"));
        svc.oneshot(req).await.unwrap();

        let seen = seen.lock().unwrap();
        let values: Vec<_> = seen[0].headers().get_all(USER_AGENT).iter().collect();
        assert_eq!(values, vec!["configured"]);
    }

    #[tokio::test]
    async fn test_empty_user_agent_leaves_header_untouched() {
        let (seen, inner) = recording(Arc::new(Response::new(())));
        let layer = UserAgentLayer::from_options(&ClientOptions::default()).unwrap();
        let svc = layer.layer(inner);
        assert!(svc.user_agent().is_none());

        let mut req = test_request();
        req.headers_mut()
            .insert(USER_AGENT, HeaderValue::from_static("caller"));
        svc.clone().oneshot(req).await.unwrap();
        svc.oneshot(test_request()).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].headers()[USER_AGENT], "caller");
        assert!(seen[1].headers().get(USER_AGENT).is_none());
    }

    #[tokio::test]
    async fn test_passes_other_request_parts_through() {
        let (seen, inner) = recording(Arc::new(Response::new(())));
        let svc = UserAgent::new(inner, Some(HeaderValue::from_static("ua")));

        let req = Request::post("http://www.example.com/api/v1/signingCert?x=1")
            .header("authorization", "Bearer token")
            .header("content-type", "application/json")
            .body(())
            .unwrap();
        svc.oneshot(req).await.unwrap();

        let seen = seen.lock().unwrap();
        let got = &seen[0];
        assert_eq!(got.method(), http::Method::POST);
        assert_eq!(got.uri(), "http://www.example.com/api/v1/signingCert?x=1");
        assert_eq!(got.headers()["authorization"], "Bearer token");
        assert_eq!(got.headers()["content-type"], "application/json");
        assert_eq!(got.headers().len(), 3);
    }

    #[tokio::test]
    async fn test_propagates_inner_error_verbatim() {
        let inner = tower::service_fn(|_req: Request<()>| async {
            Err::<Response<()>, _>(ClientError::Transport("dns failure".into()))
        });
        let svc = UserAgent::new(inner, Some(HeaderValue::from_static("ua")));

        let err = svc.oneshot(test_request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(ref msg) if msg == "dns failure"));
    }

    #[test]
    fn test_from_options_rejects_invalid_header() {
        let options = make_options([with_user_agent("bad\nagent")]);
        let err = UserAgentLayer::from_options(&options).unwrap_err();
        assert!(matches!(err, ClientBuildError::InvalidUserAgent(ua) if ua == "bad\nagent"));
    }

    #[tokio::test]
    async fn test_create_transport_with_inner() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::default();
        let inner = tower::service_fn({
            let seen = seen.clone();
            move |req: Request<TransportBody>| {
                let ua = req.headers()[USER_AGENT].to_str().unwrap().to_string();
                seen.lock().unwrap().push(ua);
                async move { Ok::<_, ClientError>(Response::new(full_response_body("ok"))) }
            }
        });

        let options = make_options([with_user_agent("sigstore-test/1.0")]);
        let transport = create_transport(Some(BoxTransport::new(inner)), &options).unwrap();
        let req = Request::get("http://localhost/")
            .body(TransportBody::empty())
            .unwrap();
        let resp = transport.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), 200);
        assert_eq!(*seen.lock().unwrap(), vec!["sigstore-test/1.0".to_string()]);
    }

    #[cfg(all(
        any(feature = "tls-ring", feature = "tls-aws-lc"),
        any(feature = "tls-native-roots", feature = "tls-webpki-roots")
    ))]
    #[tokio::test]
    async fn test_create_transport_defaults_inner() {
        let transport = create_transport(None, &ClientOptions::default()).unwrap();
        assert!(transport.user_agent().is_none());
        // Always has a usable sender underneath
        ServiceExt::<Request<TransportBody>>::ready_oneshot(transport)
            .await
            .unwrap();
    }
}
