//! Command-line poller.
//!
//! Reads the card settings from `SZEP_*` environment variables (see
//! [`PollerConfig::from_env`]) and logs through `RUST_LOG`.
//!
//! ```text
//! szep-balance          # poll every SZEP_SCAN_INTERVAL seconds until Ctrl-C
//! szep-balance --once   # run a single cycle and print both readings
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use szep_balance::{BalancePoller, PollerConfig, SzepError};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_readings(poller: &BalancePoller) {
    for r in poller.readings() {
        match r.value {
            Some(v) => println!("{}: {} {}", r.name, v, r.unit),
            None => println!("{}: unknown", r.name),
        }
    }
}

async fn run(once: bool) -> Result<(), SzepError> {
    let config = PollerConfig::from_env()?;
    let client = config.client()?;
    let poller = Arc::new(BalancePoller::new(config, client));

    if once {
        poller.run_once().await?;
        print_readings(&poller);
        return Ok(());
    }

    let mut updates = poller.subscribe();
    let handle = poller.clone().spawn();
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                print_readings(&poller);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
        }
    }
    handle.shutdown();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let once = std::env::args().skip(1).any(|a| a == "--once");
    match run(once).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "szep-balance failed");
            ExitCode::FAILURE
        }
    }
}
