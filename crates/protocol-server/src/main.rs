//! protocol-server: serves the collector protocol endpoint.
//!
//! This binary runs an identity-only deployment: `register` issues a fresh
//! UUID identity and every other operation is left unbound.

use axum::extract::Request;
use protocol_server::config::ServiceConfig;
use protocol_server::{AdapterResult, DispatchOption, Dispatcher, DispatcherConfig, Operation};

fn main() -> anyhow::Result<()> {
    let config_path = {
        let args: Vec<String> = std::env::args().collect();
        args.iter()
            .position(|a| a == "--config")
            .and_then(|i| args.get(i + 1).cloned())
            .or_else(|| args.get(1).filter(|a| !a.starts_with('-')).cloned())
            .or_else(|| std::env::var("PROTOCOL_SERVER_CONFIG").ok())
            .unwrap_or_else(|| "protocol-server.toml".to_string())
    };

    let config = ServiceConfig::load(&config_path)?;

    // The tonic gRPC exporter needs a reactor context
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let tracing_guard = protocol_tracing::init_tracing(&config.tracing);

        tracing::info!(
            config_path = %config_path,
            listen_address = %config.server.listen_address,
            cookie_name = %config.cookie.name,
            expose_adapter_errors = config.expose_adapter_errors,
            otlp_export = tracing_guard.is_exporting(),
            "Starting protocol-server"
        );

        let mut options = config.dispatch_options();
        options.push(DispatchOption::bind(Operation::Register, issue_identity));
        let dispatcher = Dispatcher::new(DispatcherConfig::from_options(options));

        protocol_server::server::run(&config.server, dispatcher).await
    })
}

/// Hand every registering client a new random identity.
async fn issue_identity(_request: Request, _identity: String) -> anyhow::Result<AdapterResult> {
    let identity = uuid::Uuid::new_v4().to_string();
    tracing::debug!("Issued new identity");
    Ok(AdapterResult::new().with_identity(identity))
}
