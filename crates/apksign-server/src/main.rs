use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use apksign_core::config::{Config, Transport};
use apksign_core::signer::ApkSigner;
use apksign_server::cli::Cli;
use apksign_server::server::McpServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::from_env();

    if let Some(port) = cli.port {
        config.server.tcp_port = port;
        config.server.transport = Transport::Tcp;
    }
    if let Some(host) = cli.host {
        config.server.tcp_host = host;
    }
    if cli.stdio {
        config.server.transport = Transport::Stdio;
    }

    // The stdio transport owns stdout, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.signer.log_level.as_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if config.server.transport == Transport::Tcp {
        tracing::warn!(
            "TCP transport ({}:{}) is not implemented yet, serving stdio instead",
            config.server.tcp_host,
            config.server.tcp_port
        );
    }

    let signer = ApkSigner::new(config.signer.clone());
    if !signer.check_availability().await {
        tracing::warn!(
            "uber-apk-signer not found at '{}'; tool calls will fail until it is installed",
            config.signer.path
        );
    }

    let server = McpServer::new(config);
    server.run_stdio().await
}
