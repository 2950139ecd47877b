use clap::Parser;

/// MCP server for Uber APK Signer tool integration
#[derive(Parser, Debug)]
#[command(name = "apksign-mcp")]
#[command(version = apksign_core::VERSION)]
#[command(about = "MCP server exposing the Uber APK Signer CLI as callable tools", long_about = None)]
pub struct Cli {
    /// Port for TCP transport (optional)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host for TCP transport (default: localhost)
    #[arg(long)]
    pub host: Option<String>,

    /// Use stdio transport (default)
    #[arg(long)]
    pub stdio: bool,
}
