//! The dispatcher: identity lookup, routing, adapter call, response.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use http::StatusCode;
use tracing::Instrument;

use crate::adapter::{AdapterResult, Binding, Operation};
use crate::error::DispatchError;
use crate::options::{DispatcherConfig, ErrorDisclosure};
use crate::{identity, response, route};

/// Serves the protocol endpoint. Cheap to clone (Arc).
#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: Arc<DispatcherConfig>,
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Axum router with the dispatcher mounted on `/` for every method.
    pub fn into_router(self) -> Router {
        Router::new()
            .route("/", any(handle))
            .with_state(self)
    }

    /// Handle one request end to end. Never fails: every error becomes its
    /// own response.
    pub async fn dispatch(&self, request: Request) -> Response {
        let span = protocol_tracing::dispatch_request_span!(request.method());
        let start = Instant::now();

        async {
            let response = match self.try_dispatch(request).await {
                Ok(response) => response,
                Err(e) => self.reject(e),
            };

            let span = tracing::Span::current();
            span.record("status", response.status().as_u16());
            span.record("latency_ms", start.elapsed().as_millis() as u64);
            response
        }
        .instrument(span)
        .await
    }

    async fn try_dispatch(&self, request: Request) -> Result<Response, DispatchError> {
        let identity = identity::resolve(request.headers(), &self.config.cookie.name)?;
        let operation = route::route(request.method(), !identity.is_empty())?;

        let span = tracing::Span::current();
        span.record("operation", operation.as_str());
        span.record("identity_present", !identity.is_empty());

        let result = self.invoke(operation, request, identity).await?;
        response::materialize(result, &self.config.cookie, chrono::Utc::now())
    }

    /// Call the adapter bound to `operation`, or answer an empty 200 when the
    /// slot is unbound.
    async fn invoke(
        &self,
        operation: Operation,
        request: Request,
        identity: String,
    ) -> Result<AdapterResult, DispatchError> {
        let adapter = match self.config.adapters.get(operation) {
            Binding::Bound(adapter) => adapter.clone(),
            Binding::Unbound => {
                tracing::debug!(operation = %operation, "No adapter bound, answering empty 200");
                return Ok(AdapterResult::new().with_status(StatusCode::OK));
            }
        };

        let span = protocol_tracing::adapter_call_span!(operation);
        let start = Instant::now();

        async move {
            let result = adapter.call(request, identity).await;

            let span = tracing::Span::current();
            span.record("latency_ms", start.elapsed().as_millis() as u64);
            span.record("outcome", if result.is_ok() { "ok" } else { "error" });

            result.map_err(DispatchError::Adapter)
        }
        .instrument(span)
        .await
    }

    fn reject(&self, error: DispatchError) -> Response {
        match error {
            DispatchError::MethodNotAllowed(ref method) => {
                tracing::debug!(method = %method, "Rejecting unsupported method");
                status_text(StatusCode::METHOD_NOT_ALLOWED)
            }
            DispatchError::IdentityLookup(_) | DispatchError::InvalidCookie(_) => {
                tracing::error!(error = %error, "Dispatch failed");
                status_text(StatusCode::INTERNAL_SERVER_ERROR)
            }
            DispatchError::Adapter(ref e) => {
                tracing::warn!(error = %error, "Adapter failed");
                match self.config.error_disclosure {
                    ErrorDisclosure::Verbatim => {
                        (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}")).into_response()
                    }
                    ErrorDisclosure::Generic => status_text(StatusCode::INTERNAL_SERVER_ERROR),
                }
            }
        }
    }
}

/// Plain-text response whose body is the canonical reason phrase.
fn status_text(status: StatusCode) -> Response {
    (status, status.canonical_reason().unwrap_or_default()).into_response()
}

async fn handle(State(dispatcher): State<Dispatcher>, request: Request) -> Response {
    dispatcher.dispatch(request).await
}
