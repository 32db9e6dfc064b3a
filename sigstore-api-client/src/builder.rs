//! Client builder.
//!
//! Provides a fluent API for configuring and building an [`ApiClient`].
//! Every setter records a [`ClientOption`], so the builder and
//! [`new_client`](crate::new_client) resolve settings the same way.

use http::{Request, Response};
use std::time::Duration;
use tower_service::Service;

use crate::client::ApiClient;
use crate::options::{ClientOption, make_options, with_timeout, with_user_agent};
use crate::transport::{BoxTransport, ResponseBody, TransportBody, create_transport};
use crate::{ClientBuildError, ClientError};

/// Builder for creating an [`ApiClient`].
///
/// # Example
///
/// ```ignore
/// use sigstore_api_client::ClientBuilder;
/// use std::time::Duration;
///
/// let client = ClientBuilder::new("https://fulcio.sigstore.dev")
///     .user_agent("cosign/2.0")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct ClientBuilder {
    /// Base URL for the service (e.g., "https://fulcio.sigstore.dev").
    base_url: String,
    /// Options in the order they were added.
    options: Vec<ClientOption>,
    /// Transport to decorate instead of the default hyper transport.
    transport: Option<BoxTransport>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("option_count", &self.options.len())
            .field("transport", &self.transport.is_some())
            .finish()
    }
}

impl ClientBuilder {
    /// Create a new ClientBuilder with the given base URL.
    ///
    /// The base URL must be an absolute `http` or `https` URL. A trailing
    /// slash is removed.
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            options: Vec::new(),
            transport: None,
        }
    }

    /// Set the `User-Agent` header sent with every request.
    ///
    /// An empty string leaves the transport's own header alone.
    pub fn user_agent(self, user_agent: impl Into<String>) -> Self {
        self.option(with_user_agent(user_agent))
    }

    /// Set the overall request timeout.
    ///
    /// `Duration::ZERO` disables the client timeout.
    pub fn timeout(self, timeout: Duration) -> Self {
        self.option(with_timeout(timeout))
    }

    /// Add an option. Options are applied in the order they are added.
    pub fn option(mut self, option: ClientOption) -> Self {
        self.options.push(option);
        self
    }

    /// Add several options.
    pub fn options<I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = ClientOption>,
    {
        self.options.extend(options);
        self
    }

    /// Send requests through `transport` instead of the default
    /// [`HyperTransport`](crate::transport::HyperTransport).
    ///
    /// The transport is still wrapped with the `User-Agent` decorator.
    pub fn transport<S>(mut self, transport: S) -> Self
    where
        S: Service<Request<TransportBody>, Response = Response<ResponseBody>, Error = ClientError>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        self.transport = Some(BoxTransport::new(transport));
        self
    }

    /// Build the ApiClient.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or user agent is invalid, or if the
    /// default transport cannot be created.
    pub fn build(self) -> Result<ApiClient, ClientBuildError> {
        let base_url = normalize_base_url(&self.base_url)?;
        let options = make_options(self.options);
        let transport = create_transport(self.transport, &options)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            base_url = %base_url,
            user_agent = %options.user_agent,
            timeout = ?options.effective_timeout(),
            "built API client"
        );

        Ok(ApiClient::new(transport, base_url, options))
    }
}

fn normalize_base_url(url: &str) -> Result<String, ClientBuildError> {
    let invalid = |reason: &str| ClientBuildError::InvalidBaseUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let uri: http::Uri = url.parse().map_err(|e: http::uri::InvalidUri| invalid(&e.to_string()))?;
    match uri.scheme_str() {
        Some("http" | "https") => {}
        Some(_) => return Err(invalid("scheme must be http or https")),
        None => return Err(invalid("missing scheme")),
    }
    if uri.authority().is_none() {
        return Err(invalid("missing host"));
    }
    if uri.query().is_some() {
        return Err(invalid("must not contain a query"));
    }

    Ok(url.trim_end_matches('/').to_string())
}
