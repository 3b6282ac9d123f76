//! `[tracing]` section of the protocol server's config file.

use serde::Deserialize;

/// Where dispatch logs and spans go.
///
/// Every field may be omitted; an empty section logs `info` and above to
/// stderr and exports nothing.
#[derive(Debug, Clone, Deserialize)]
pub struct TracingConfig {
    /// Reported as `service.name` on exported dispatch spans.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Collector receiving `dispatch_request` / `adapter_call` spans.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    #[serde(default)]
    pub protocol: OtlpProtocol,

    /// Filter directive, e.g. `protocol_server=debug` to see unbound-slot
    /// and rejected-method events.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Wire format towards the collector: `"grpc"` or `"http"`.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OtlpProtocol {
    #[default]
    Grpc,
    Http,
}

fn default_service_name() -> String {
    "protocol-server".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            otlp_endpoint: None,
            protocol: OtlpProtocol::Grpc,
            log_level: default_log_level(),
        }
    }
}
