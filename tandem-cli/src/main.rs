use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::net::IpAddr;
use std::path::PathBuf;
use tandem_server::{DEFAULT_PORT, ServerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tandem", version, about = "Two-party WebRTC signalling server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signalling server.
    Serve {
        #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: IpAddr,

        /// Directory served for any unmatched GET.
        #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
        public_dir: PathBuf,

        /// Tracing filter, e.g. `info` or `tandem_server=debug`.
        #[arg(long, env = "RUST_LOG", default_value = "info")]
        log_level: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            host,
            public_dir,
            log_level,
        } => {
            init_tracing(&log_level)?;

            let config = ServerConfig {
                host,
                port,
                public_dir,
                ..ServerConfig::default()
            };

            println!("{}", "Starting Tandem signalling server...".green().bold());
            println!("   Listening: http://{}", config.addr());
            if !config.public_dir.is_dir() {
                println!(
                    "{}",
                    format!(
                        "   Public dir {} not found, static assets will 404",
                        config.public_dir.display()
                    )
                    .yellow()
                );
            }

            tandem_server::serve(config)
                .await
                .context("Signalling server failed")?;
        }
    }

    Ok(())
}

fn init_tracing(filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(filter).context("Invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}
