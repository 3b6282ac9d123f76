//! Protocol layer of the collector: a single endpoint that routes requests to
//! one of five pluggable adapters (probe, register, submit, query, purge)
//! based on method and the identity cookie, then turns the adapter's result
//! into a response.

pub mod adapter;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod identity;
pub mod options;
pub mod response;
pub mod route;
pub mod server;

pub use adapter::{Adapter, AdapterResult, Binding, Operation};
pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use options::{CookieSettings, DispatchOption, DispatcherBuilder, DispatcherConfig, ErrorDisclosure, SameSite};
