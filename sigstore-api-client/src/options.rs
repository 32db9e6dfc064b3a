//! Client options.
//!
//! This module provides [`ClientOptions`], the resolved settings for an
//! [`ApiClient`](crate::ApiClient), and [`ClientOption`], a deferred mutator
//! that changes one of those settings.
//!
//! # Example
//!
//! ```
//! use sigstore_api_client::{make_options, with_timeout, with_user_agent};
//! use std::time::Duration;
//!
//! let options = make_options([
//!     with_user_agent("cosign/2.0"),
//!     with_timeout(Duration::from_secs(30)),
//! ]);
//!
//! assert_eq!(options.user_agent, "cosign/2.0");
//! assert_eq!(options.timeout, Duration::from_secs(30));
//! ```

use std::fmt;
use std::time::Duration;

/// Resolved client settings.
///
/// Produced once per client by [`make_options`] and never changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Value for the `User-Agent` header.
    /// Empty means the transport's own header is left alone.
    pub user_agent: String,
    /// Overall timeout for a request.
    /// Zero means no timeout is imposed by the client.
    pub timeout: Duration,
}

impl ClientOptions {
    /// The timeout to apply, or `None` when it is zero.
    pub fn effective_timeout(&self) -> Option<Duration> {
        (!self.timeout.is_zero()).then_some(self.timeout)
    }
}

/// A single change to [`ClientOptions`], applied when options are resolved.
pub struct ClientOption(Box<dyn Fn(&mut ClientOptions) + Send + Sync>);

impl ClientOption {
    /// Create an option from a closure.
    ///
    /// The closure should only touch the fields it is responsible for so
    /// that options compose in any order.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&mut ClientOptions) + Send + Sync + 'static,
    {
        Self(Box::new(f))
    }

    /// Apply this option to `options`.
    pub fn apply(&self, options: &mut ClientOptions) {
        (self.0)(options)
    }
}

impl fmt::Debug for ClientOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOption").finish_non_exhaustive()
    }
}

/// Set the `User-Agent` header sent with every request.
///
/// Overwrites any value set by an earlier option.
pub fn with_user_agent(user_agent: impl Into<String>) -> ClientOption {
    let user_agent = user_agent.into();
    ClientOption::from_fn(move |options| options.user_agent = user_agent.clone())
}

/// Set the overall request timeout.
pub fn with_timeout(timeout: Duration) -> ClientOption {
    ClientOption::from_fn(move |options| options.timeout = timeout)
}

/// Fold `opts` into a [`ClientOptions`], in order, starting from the defaults.
pub fn make_options<I>(opts: I) -> ClientOptions
where
    I: IntoIterator<Item = ClientOption>,
{
    let mut options = ClientOptions::default();
    for opt in opts {
        opt.apply(&mut options);
    }
    options
}
