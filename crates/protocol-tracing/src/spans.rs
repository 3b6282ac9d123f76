//! Span builder helpers for dispatcher instrumentation.

/// Span covering one inbound request from identity lookup to response.
///
/// Fields recorded once known:
/// - `operation`: the adapter slot the router picked (`probe`, `register`, ...)
/// - `identity_present`: whether the identity cookie carried a value
/// - `status`: final HTTP status code
/// - `latency_ms`: wall time spent in the dispatcher
#[macro_export]
macro_rules! dispatch_request_span {
    ($method:expr) => {
        tracing::info_span!(
            "dispatch_request",
            method = %$method,
            operation = tracing::field::Empty,
            identity_present = tracing::field::Empty,
            status = tracing::field::Empty,
            latency_ms = tracing::field::Empty,
        )
    };
}

/// Span around a single adapter invocation.
#[macro_export]
macro_rules! adapter_call_span {
    ($operation:expr) => {
        tracing::info_span!(
            "adapter_call",
            operation = %$operation,
            outcome = tracing::field::Empty,
            latency_ms = tracing::field::Empty,
        )
    };
}
