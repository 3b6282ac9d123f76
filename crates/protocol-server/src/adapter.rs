//! The adapter contract: the five operations a deployment plugs in.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::extract::Request;
use bytes::Bytes;
use futures_core::future::BoxFuture;
use http::StatusCode;

/// The five operations the protocol exposes on its single endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// GET with an identity cookie.
    Probe,
    /// POST; establishes a new identity.
    Register,
    /// PUT under an existing identity.
    Submit,
    /// GET without an identity cookie.
    Query,
    /// DELETE under an existing identity.
    Purge,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Probe,
        Operation::Register,
        Operation::Submit,
        Operation::Query,
        Operation::Purge,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Probe => "probe",
            Operation::Register => "register",
            Operation::Submit => "submit",
            Operation::Query => "query",
            Operation::Purge => "purge",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an adapter hands back for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterResult {
    /// Written to the response verbatim.
    pub body: Bytes,
    /// `None` answers 200.
    pub status: Option<StatusCode>,
    /// A non-empty value is issued to the client as the identity cookie.
    pub assigned_identity: Option<String>,
}

impl AdapterResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.assigned_identity = Some(identity.into());
        self
    }
}

/// Business logic behind one operation.
///
/// Receives the full request and the caller's current identity (empty when
/// the client sent none). Any async function or closure with the signature
/// `Fn(Request, String) -> impl Future<Output = anyhow::Result<AdapterResult>>`
/// is an adapter.
pub trait Adapter: Send + Sync + 'static {
    fn call(&self, request: Request, identity: String) -> BoxFuture<'static, anyhow::Result<AdapterResult>>;
}

impl<F, Fut> Adapter for F
where
    F: Fn(Request, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<AdapterResult>> + Send + 'static,
{
    fn call(&self, request: Request, identity: String) -> BoxFuture<'static, anyhow::Result<AdapterResult>> {
        Box::pin(self(request, identity))
    }
}

/// Whether an operation slot has an adapter plugged in.
///
/// An unbound slot is a valid deployment choice and answers an empty 200.
#[derive(Clone, Default)]
pub enum Binding {
    #[default]
    Unbound,
    Bound(Arc<dyn Adapter>),
}

impl Binding {
    pub fn bound(adapter: impl Adapter) -> Self {
        Binding::Bound(Arc::new(adapter))
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Binding::Bound(_))
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Unbound => f.write_str("Unbound"),
            Binding::Bound(_) => f.write_str("Bound(..)"),
        }
    }
}

/// One binding per operation, each addressed only through its own field.
#[derive(Debug, Clone, Default)]
pub struct AdapterSlots {
    pub probe: Binding,
    pub register: Binding,
    pub submit: Binding,
    pub query: Binding,
    pub purge: Binding,
}

impl AdapterSlots {
    pub fn get(&self, operation: Operation) -> &Binding {
        match operation {
            Operation::Probe => &self.probe,
            Operation::Register => &self.register,
            Operation::Submit => &self.submit,
            Operation::Query => &self.query,
            Operation::Purge => &self.purge,
        }
    }

    pub fn get_mut(&mut self, operation: Operation) -> &mut Binding {
        match operation {
            Operation::Probe => &mut self.probe,
            Operation::Register => &mut self.register,
            Operation::Submit => &mut self.submit,
            Operation::Query => &mut self.query,
            Operation::Purge => &mut self.purge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn ok_adapter(_request: Request, identity: String) -> anyhow::Result<AdapterResult> {
        Ok(AdapterResult::new().with_body(identity))
    }

    #[test]
    fn test_slot_accessors_agree() {
        let mut slots = AdapterSlots::default();
        for op in Operation::ALL {
            *slots.get_mut(op) = Binding::bound(ok_adapter);
            assert!(slots.get(op).is_bound(), "{op} should be bound");
        }
    }

    #[test]
    fn test_slots_start_unbound() {
        let slots = AdapterSlots::default();
        assert!(Operation::ALL.iter().all(|op| !slots.get(*op).is_bound()));
    }

    #[tokio::test]
    async fn test_async_fn_is_an_adapter() {
        let adapter: Arc<dyn Adapter> = Arc::new(ok_adapter);
        let request = http::Request::builder()
            .body(axum::body::Body::empty())
            .unwrap();
        let result = adapter.call(request, "abc".to_string()).await.unwrap();
        assert_eq!(result.body, Bytes::from("abc"));
        assert_eq!(result.status, None);
    }

    #[test]
    fn test_result_builder() {
        let result = AdapterResult::new()
            .with_status(StatusCode::CREATED)
            .with_identity("u-1");
        assert_eq!(result.status, Some(StatusCode::CREATED));
        assert_eq!(result.assigned_identity.as_deref(), Some("u-1"));
        assert!(result.body.is_empty());
    }
}
