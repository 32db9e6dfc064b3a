//! Hyper-based HTTP transport.
//!
//! This module provides [`HyperTransport`], the default request sender used
//! when a client is built without a custom transport.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::{TokioExecutor, TokioTimer};
use rustls::ClientConfig;
use tower_service::Service;

use super::body::{ResponseBody, TransportBody, boxed_response_body};
use super::connector::{build_https_connector, default_tls_config};
use crate::{ClientBuildError, ClientError};

type HyperClient = Client<HttpsConnector<HttpConnector>, TransportBody>;

/// HTTP transport using hyper_util's legacy client.
///
/// Handles HTTP/1.1 and HTTP/2 (negotiated via ALPN) over TLS or plain
/// TCP. Cloning is cheap: clones share the same connection pool.
#[derive(Clone)]
pub struct HyperTransport {
    client: HyperClient,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport").finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a new transport builder.
    pub fn builder() -> HyperTransportBuilder {
        HyperTransportBuilder::new()
    }

    /// Create a new transport with default settings.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::builder().build()
    }

    /// Send an HTTP request and receive a response.
    pub async fn request(
        &self,
        request: http::Request<TransportBody>,
    ) -> Result<http::Response<ResponseBody>, ClientError> {
        send(self.client.clone(), request).await
    }
}

async fn send(
    client: HyperClient,
    request: http::Request<TransportBody>,
) -> Result<http::Response<ResponseBody>, ClientError> {
    let response = client.request(request).await?;
    Ok(response.map(boxed_response_body))
}

/// Builder for [`HyperTransport`].
///
/// Only a custom TLS configuration can be supplied; pooling and protocol
/// settings are left at hyper_util's defaults.
#[derive(Default)]
pub struct HyperTransportBuilder {
    tls_config: Option<ClientConfig>,
}

impl HyperTransportBuilder {
    /// Create a new transport builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` instead of the feature-selected default TLS configuration.
    pub fn tls_config(mut self, config: ClientConfig) -> Self {
        self.tls_config = Some(config);
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<HyperTransport, ClientBuildError> {
        let tls_config = match self.tls_config {
            Some(config) => config,
            None => default_tls_config()?,
        };
        let connector = build_https_connector(tls_config);

        let mut builder = Client::builder(TokioExecutor::new());
        // Required for the pool's idle timeout to fire
        builder.pool_timer(TokioTimer::new());
        builder.pool_idle_timeout(Duration::from_secs(90));

        Ok(HyperTransport {
            client: builder.build(connector),
        })
    }
}

impl std::fmt::Debug for HyperTransportBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransportBuilder")
            .field("tls_config", &self.tls_config.is_some())
            .finish()
    }
}

impl Service<http::Request<TransportBody>> for HyperTransport {
    type Response = http::Response<ResponseBody>;
    type Error = ClientError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // hyper_util legacy::Client is always ready
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<TransportBody>) -> Self::Future {
        Box::pin(send(self.client.clone(), req))
    }
}
