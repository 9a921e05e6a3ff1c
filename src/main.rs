use std::env;
use std::process::ExitCode;
use std::time::Duration;

use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use vending_machine::csv::{read_actions, read_catalog, write_steps};
use vending_machine::{Catalog, VendingMachine};

const TIMEOUT_VAR: &str = "VENDING_SESSION_TIMEOUT_SECS";

/// Session timeout from the environment, if set to a positive number of seconds.
fn session_timeout() -> Option<Duration> {
    let raw = env::var(TIMEOUT_VAR).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            warn!(value = %raw, "ignoring invalid {TIMEOUT_VAR}");
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let Some(actions_path) = args.next() else {
        eprintln!("usage: vending-machine <actions.csv> [catalog.csv]");
        return ExitCode::FAILURE;
    };

    let catalog = match args.next() {
        Some(path) => match read_catalog(&path) {
            Ok(catalog) => catalog,
            Err(e) => {
                error!(path, "{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Catalog::standard(),
    };

    let actions = match read_actions(actions_path.clone()) {
        Ok(actions) => actions,
        Err(e) => {
            error!(path = actions_path, "{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut machine = VendingMachine::new(catalog);
    let (action_sender, action_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in actions {
            match result {
                Ok(action) => {
                    if action_sender.send(action).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    let stream = ReceiverStream::new(action_receiver);
    let steps = match session_timeout() {
        Some(idle) => machine.run_with_timeout(stream, idle).await,
        None => machine.run(stream).await,
    };

    if let Err(e) = write_steps(std::io::stdout().lock(), &steps) {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
