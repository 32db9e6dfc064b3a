//! HTTP client for Sigstore signing and transparency services.
//!
//! This crate builds the HTTP client used to talk to a remote service such
//! as the public Sigstore server. It takes care of two things:
//!
//! - every outgoing request carries the configured `User-Agent`
//! - every request is bounded by the configured timeout
//!
//! The service's own API and response formats are left to the caller.
//!
//! ## Example
//!
//! ```ignore
//! use sigstore_api_client::{new_client, with_timeout, with_user_agent, SIGSTORE_PUBLIC_SERVER_URL};
//! use std::time::Duration;
//!
//! let client = new_client(
//!     SIGSTORE_PUBLIC_SERVER_URL,
//!     [with_user_agent("cosign/2.0"), with_timeout(Duration::from_secs(30))],
//! )?;
//!
//! let response = client.get("/api/v1/rootCert").await?;
//! ```
//!
//! The same client can be built with the chained [`ClientBuilder`]:
//!
//! ```ignore
//! use sigstore_api_client::ApiClient;
//!
//! let client = ApiClient::builder("https://fulcio.sigstore.dev")
//!     .user_agent("cosign/2.0")
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//! ```
//!
//! ## Options
//!
//! Options are resolved in order into a [`ClientOptions`]:
//!
//! | Option | Default | Effect |
//! |--------|---------|--------|
//! | [`with_user_agent`] | `""` | Sets `User-Agent` on every request. Empty leaves the header alone. |
//! | [`with_timeout`] | zero | Bounds each request. Zero imposes no timeout. |
//!
//! When the same option is given twice the last one wins.
//!
//! ## Custom Transports
//!
//! Any [`tower_service::Service`] taking `http::Request<TransportBody>` and
//! returning `http::Response<ResponseBody>` can replace the default
//! [`HyperTransport`] via [`ClientBuilder::transport`]. The `User-Agent`
//! decorator is applied either way. The decorator is also available on its
//! own as [`UserAgentLayer`] for use with `tower::ServiceBuilder`.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `tls` (default) | `tls-ring` + `tls-native-roots` |
//! | `tls-ring` / `tls-aws-lc` | Crypto provider |
//! | `tls-native-roots` / `tls-webpki-roots` | Root certificates |
//! | `tracing` (default) | Spans and events for requests and client construction |
//!
//! With `tracing` enabled, each request runs in an `http.request` span with
//! `http.method`, `url.path` and `otel.kind = "client"`.

mod builder;
mod client;
mod error;
mod options;
pub mod transport;

pub use builder::ClientBuilder;
pub use client::{ApiClient, new_client};
pub use error::{ClientBuildError, ClientError};
pub use options::{ClientOption, ClientOptions, make_options, with_timeout, with_user_agent};

// Re-export transport types at the top level for convenience
pub use transport::{
    BoxTransport, HyperTransport, ResponseBody, TransportBody, UserAgent, UserAgentLayer,
    create_transport,
};

pub use bytes::Bytes;

/// URL of the public Sigstore server.
pub const SIGSTORE_PUBLIC_SERVER_URL: &str = "https://fulcio.sigstore.dev";
