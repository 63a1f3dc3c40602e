use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use matrix_remote::config::{ConfigError, TargetArgs};
use matrix_remote::*;
use tracing::error;

/// Send one command to the LED matrix.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    target: TargetArgs,

    /// Forward through a running matrix-remoted instead of the device
    #[arg(long, env = "MATRIX_REMOTE_SOCKET")]
    socket: Option<PathBuf>,

    /// Exit with an error when the device can't be reached
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("can't reach daemon: {0}")]
    Socket(#[from] std::io::Error),
}

async fn run(cli: Cli) -> Result<(), Error> {
    if let Some(path) = &cli.socket {
        let address = if cli.target.is_set() {
            Some(cli.target.provider()?.resolve()?)
        } else {
            None
        };
        socket::send_payload(
            path,
            SocketPayload {
                address,
                cmd: cli.cmd,
            },
        )
        .await?;
        return Ok(());
    }

    let dispatcher = Dispatcher::http(cli.target.provider()?);
    // keep the runtime alive until the request settles; the failure itself
    // is already logged by the dispatcher
    match dispatcher.dispatch(cli.cmd).outcome().await {
        Err(e) if cli.strict => Err(e.into()),
        _ => Ok(()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    trace::init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
