use clap::Parser;
use code_exec::ExecutionConfig;
use code_exec_server::{create_app, run_server};
use std::{net::SocketAddr, path::PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to listen on
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    addr: SocketAddr,

    /// TOML file with execution settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for source files and build artifacts
    #[arg(long)]
    workspace_dir: Option<PathBuf>,

    /// Maximum number of concurrent executions
    #[arg(short, long)]
    max_concurrent: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ExecutionConfig::from_toml_file(path)?,
        None => ExecutionConfig::default(),
    };
    if let Some(dir) = args.workspace_dir {
        config = config.with_workspace_dir(dir);
    }
    if let Some(max) = args.max_concurrent {
        config = config.with_max_concurrent_executions(max);
    }

    let app = create_app(config).await?;
    run_server(app, args.addr).await?;

    Ok(())
}
