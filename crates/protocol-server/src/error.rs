//! Failure taxonomy for a single dispatch.
//!
//! Every variant is terminal for its request and maps to exactly one response.

use http::Method;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The identity cookie was present but its value is not text.
    #[error("error reading identity from cookie")]
    IdentityLookup(#[source] std::str::Utf8Error),

    #[error("method {0} not allowed")]
    MethodNotAllowed(Method),

    /// The adapter itself failed.
    #[error("{0:#}")]
    Adapter(anyhow::Error),

    /// The identity cookie could not be encoded as a header.
    #[error("cannot encode identity cookie: {0}")]
    InvalidCookie(String),
}
