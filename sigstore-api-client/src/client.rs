//! API client implementation.
//!
//! This module provides [`ApiClient`], the handle returned by the client
//! factory, and [`new_client`], the functional-options entry point.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method, Request, Response};
use http_body_util::BodyExt;
use serde::Serialize;
use std::time::Duration;
use tokio::time::{Instant, timeout_at};
use tower::ServiceExt;

use crate::builder::ClientBuilder;
use crate::options::{ClientOption, ClientOptions};
use crate::transport::{BoxTransport, DeadlineBody, ResponseBody, TransportBody, UserAgent};
use crate::{ClientBuildError, ClientError};

/// Client for a Sigstore-style signing/transparency service.
///
/// Every request goes through a [`UserAgent`]-decorated transport and is
/// bounded by the configured timeout. The client does not interpret
/// responses: non-2xx statuses are returned to the caller as-is.
///
/// Cloning is cheap and clones can be used from multiple tasks at once.
///
/// # Example
///
/// ```ignore
/// use sigstore_api_client::{ApiClient, SIGSTORE_PUBLIC_SERVER_URL};
/// use std::time::Duration;
///
/// let client = ApiClient::builder(SIGSTORE_PUBLIC_SERVER_URL)
///     .user_agent("cosign/2.0")
///     .timeout(Duration::from_secs(30))
///     .build()?;
///
/// let response = client.get("/api/v1/rootCert").await?;
/// println!("status: {}", response.status());
/// ```
#[derive(Clone)]
pub struct ApiClient {
    transport: UserAgent<BoxTransport>,
    /// Base URL without a trailing slash.
    base_url: String,
    options: ClientOptions,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Create a client for `base_url` configured by `opts`.
///
/// Options are applied in order; later options override earlier ones.
///
/// # Example
///
/// ```ignore
/// use sigstore_api_client::{new_client, with_timeout, with_user_agent};
/// use std::time::Duration;
///
/// let client = new_client(
///     "https://fulcio.sigstore.dev",
///     [with_user_agent("cosign/2.0"), with_timeout(Duration::from_secs(30))],
/// )?;
/// ```
pub fn new_client<I>(base_url: impl Into<String>, opts: I) -> Result<ApiClient, ClientBuildError>
where
    I: IntoIterator<Item = ClientOption>,
{
    ClientBuilder::new(base_url).options(opts).build()
}

impl ApiClient {
    /// Create a new [`ClientBuilder`] for `base_url`.
    pub fn builder<S: Into<String>>(base_url: S) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    pub(crate) fn new(
        transport: UserAgent<BoxTransport>,
        base_url: String,
        options: ClientOptions,
    ) -> Self {
        Self {
            transport,
            base_url,
            options,
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the resolved options.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Get the `User-Agent` injected into requests, if any.
    pub fn user_agent(&self) -> Option<&HeaderValue> {
        self.transport.user_agent()
    }

    /// Get the request timeout, if one is imposed.
    pub fn timeout(&self) -> Option<Duration> {
        self.options.effective_timeout()
    }

    /// Resolve `path` against the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request to `path` relative to the base URL.
    pub fn request(&self, method: Method, path: &str) -> http::request::Builder {
        Request::builder().method(method).uri(self.url(path))
    }

    /// Send a `GET` request to `path` and collect the response.
    pub async fn get(&self, path: &str) -> Result<Response<Bytes>, ClientError> {
        let req = self
            .request(Method::GET, path)
            .body(TransportBody::empty())
            .map_err(invalid_request)?;
        self.fetch(req).await
    }

    /// Send a `POST` request with `body` to `path` and collect the response.
    pub async fn post(
        &self,
        path: &str,
        content_type: &str,
        body: impl Into<Bytes>,
    ) -> Result<Response<Bytes>, ClientError> {
        let req = self
            .request(Method::POST, path)
            .header(CONTENT_TYPE, content_type)
            .body(TransportBody::full(body))
            .map_err(invalid_request)?;
        self.fetch(req).await
    }

    /// Send `body` as JSON to `path` and collect the response.
    pub async fn post_json<T>(&self, path: &str, body: &T) -> Result<Response<Bytes>, ClientError>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(body).map_err(|e| ClientError::Encode(e.to_string()))?;
        self.post(path, "application/json", body).await
    }

    /// Send `req` and return the response once its headers arrive.
    ///
    /// The timeout covers the whole exchange: if it passes while the
    /// returned body is still being read, the body yields
    /// [`ClientError::Timeout`].
    pub async fn execute(
        &self,
        req: Request<TransportBody>,
    ) -> Result<Response<ResponseBody>, ClientError> {
        #[cfg(feature = "tracing")]
        let span = request_span(&req);

        let fut = self.send(req);

        #[cfg(feature = "tracing")]
        let fut = tracing::Instrument::instrument(fut, span);

        fut.await
    }

    /// Send `req` and collect the full response body.
    ///
    /// The timeout covers sending the request and reading the whole body.
    pub async fn fetch(&self, req: Request<TransportBody>) -> Result<Response<Bytes>, ClientError> {
        #[cfg(feature = "tracing")]
        let span = request_span(&req);

        let fut = async {
            let (parts, body) = self.send(req).await?.into_parts();
            let collected = body.collect().await?;
            Ok::<_, ClientError>(Response::from_parts(parts, collected.to_bytes()))
        };

        #[cfg(feature = "tracing")]
        let fut = tracing::Instrument::instrument(fut, span);

        fut.await
    }

    async fn send(&self, req: Request<TransportBody>) -> Result<Response<ResponseBody>, ClientError> {
        let call = self.transport.clone().oneshot(req);
        let result = match self.deadline() {
            Some(deadline) => match timeout_at(deadline, call).await {
                Ok(result) => result.map(|response| {
                    response.map(|body| {
                        DeadlineBody::new(body, deadline, self.options.timeout).boxed_unsync()
                    })
                }),
                Err(_) => Err(self.timeout_error()),
            },
            None => call.await,
        };

        #[cfg(feature = "tracing")]
        match &result {
            Ok(response) => tracing::debug!(status = %response.status(), "response received"),
            Err(err) => tracing::debug!(error = %err, "request failed"),
        }

        result
    }

    fn deadline(&self) -> Option<Instant> {
        self.timeout().map(|t| Instant::now() + t)
    }

    fn timeout_error(&self) -> ClientError {
        ClientError::Timeout(self.options.timeout)
    }
}

fn invalid_request(err: http::Error) -> ClientError {
    ClientError::InvalidRequest(err.to_string())
}

#[cfg(feature = "tracing")]
fn request_span(req: &Request<TransportBody>) -> tracing::Span {
    tracing::info_span!(
        "http.request",
        http.method = %req.method(),
        url.path = %req.uri().path(),
        otel.kind = "client",
    )
}
