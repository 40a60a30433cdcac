use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the loyalty tracking service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file, if one exists.
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            web_server::run_server(args.addr, args.ephemeral).await?;
        }
    }

    Ok(())
}

/// A REST service tracking customers, purchases and loyalty levels.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// The socket address to listen on.
    #[arg(long, default_value = "0.0.0.0:8000")]
    addr: SocketAddr,

    /// Demo mode: drop the loyalty tables on shutdown, erasing all data.
    #[arg(long)]
    ephemeral: bool,
}
