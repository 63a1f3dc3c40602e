use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

use clap::Parser;
use matrix_remote::config::{ConfigError, TargetArgs};
use matrix_remote::{socket, trace, Dispatcher};
use tracing::info;

/// Forward panel commands from local clients to the LED matrix.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    target: TargetArgs,

    /// Socket to bind when not started through socket activation
    #[arg(long, env = "MATRIX_REMOTE_SOCKET")]
    socket: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("no listener: not socket activated and no --socket given")]
    NoListener,
    #[error("{0} exists and is not a socket")]
    NotASocket(PathBuf),
}

fn bind(path: &Path) -> Result<tokio::net::UnixListener, Error> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_socket() => std::fs::remove_file(path)?,
        Ok(_) => return Err(Error::NotASocket(path.to_owned())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    Ok(tokio::net::UnixListener::bind(path)?)
}

fn listener(socket: Option<&Path>) -> Result<tokio::net::UnixListener, Error> {
    let mut listenfd = listenfd::ListenFd::from_env();
    if let Some(listener) = listenfd.take_unix_listener(0)? {
        info!("using activated socket");
        listener.set_nonblocking(true)?;
        return Ok(tokio::net::UnixListener::from_std(listener)?);
    }

    let path = socket.ok_or(Error::NoListener)?;
    info!(path = %path.display(), "binding socket");
    bind(path)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    trace::init_tracing();
    let cli = Cli::parse();

    let dispatcher = Dispatcher::http(cli.target.provider()?);
    let listener = listener(cli.socket.as_deref())?;

    socket::serve(listener, dispatcher).await;
    Ok(())
}
