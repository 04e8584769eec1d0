mod display;

use std::time::Duration;

use anyhow::Context;
use buscacep_client::{Coordinator, DEFAULT_TIMEOUT, LookupContext};
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "buscacep",
    version,
    about = "Look a CEP up on BrasilAPI and ViaCEP concurrently"
)]
struct Cli {
    /// Postal code to look up, digits only
    #[arg(default_value = "01153000")]
    cep: String,

    /// Per-source timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_millis() as u64)]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    info!("buscacep v{}", env!("CARGO_PKG_VERSION"));

    let coordinator = Coordinator::with_default_sources()
        .context("building lookup client")?
        .with_timeout(Duration::from_millis(cli.timeout_ms));

    let (ctx, cancel) = LookupContext::with_cancel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, canceling in-flight lookups");
            cancel.cancel();
        }
    });

    let outcomes = coordinator.lookup(&cli.cep, &ctx).await;
    display::print_outcomes(&outcomes);

    anyhow::ensure!(
        outcomes.iter().any(Result::is_ok),
        "no source could resolve CEP {}",
        cli.cep
    );
    Ok(())
}
