//! Tracing setup shared by the protocol server: log filtering, optional OTLP
//! export, and the span shapes used on the dispatch path.

pub mod config;
pub mod otlp;
pub mod spans;

pub use config::{OtlpProtocol, TracingConfig};
pub use otlp::{init_tracing, TracingGuard};
