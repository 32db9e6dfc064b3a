//! HTTP transport layer.
//!
//! A transport is any [`tower_service::Service`] that turns an
//! `http::Request<TransportBody>` into an `http::Response<ResponseBody>`.
//! This module provides:
//!
//! - [`HyperTransport`], the default transport built on hyper_util's legacy
//!   client (HTTP/1.1 and HTTP/2, rustls TLS, connection pooling)
//! - [`UserAgent`] / [`UserAgentLayer`], the decorator that stamps the
//!   configured `User-Agent` on every request
//! - [`BoxTransport`], a type-erased transport so custom senders and test
//!   doubles can be swapped in
//!
//! # Feature Flags
//!
//! - `tls` (default) - Enables `tls-ring` + `tls-native-roots`
//! - `tls-ring` / `tls-aws-lc` - Crypto providers
//! - `tls-native-roots` / `tls-webpki-roots` - Root certificates

mod body;
mod connector;
mod hyper;
mod user_agent;

use tower::util::BoxCloneSyncService;

pub(crate) use body::DeadlineBody;
pub use body::{ResponseBody, TransportBody, boxed_response_body, full_response_body};
pub use connector::{build_https_connector, default_tls_config, has_tls_support};
pub use hyper::{HyperTransport, HyperTransportBuilder};
pub use user_agent::{UserAgent, UserAgentLayer, create_transport};

/// A cloneable, type-erased transport.
pub type BoxTransport = BoxCloneSyncService<
    http::Request<TransportBody>,
    http::Response<ResponseBody>,
    crate::ClientError,
>;
