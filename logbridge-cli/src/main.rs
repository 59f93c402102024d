//! logbridge CLI - relay N1MM and JTDX/WSJT-X UDP broadcasts to a web endpoint
//!
//! Reads `config.ini`, starts one UDP listener per enabled source and runs
//! until interrupted with Ctrl+C.

mod error;
mod runner;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use logbridge::bridge::Bridge;
use logbridge::config::DEFAULT_CONFIG_FILE;
use logbridge::relay::ReqwestRelayClient;

use crate::error::CliError;
use crate::runner::CliRunner;

#[derive(Parser)]
#[command(name = "logbridge", version)]
#[command(about = "Relay N1MM and JTDX/WSJT-X UDP broadcasts to an HTTP endpoint", long_about = None)]
struct Args {
    /// Configuration file (INI); defaults apply when it does not exist
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Enable debug logging regardless of RUST_LOG
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        e.exit();
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let runner = CliRunner::new(&args.config, args.debug)?;
    runner.log_startup(&args.config);

    let client = ReqwestRelayClient::new()?;
    let handle = Bridge::new(runner.config(), client).start().await;

    tokio::signal::ctrl_c().await.map_err(CliError::Signal)?;
    info!("Stopping (interrupt)");
    handle.shutdown();

    Ok(())
}
