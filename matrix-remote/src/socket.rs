//! Local socket protocol between button bindings and the panel daemon.
//!
//! Each connection carries length-delimited bincode [`SocketPayload`] frames.

use std::sync::Arc;

use futures::sink::SinkExt;
use futures::stream::TryStreamExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixListener;
use tokio_serde::formats::SymmetricalBincode;
use tokio_util::codec::{FramedRead, FramedWrite, LengthDelimitedCodec};
use tracing::{debug, error, info, warn};

use crate::address::StaticAddress;
use crate::command::Command;
use crate::dispatch::Dispatcher;

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct SocketPayload {
    /// Overrides the daemon's device for this one command.
    pub address: Option<String>,
    pub cmd: Command,
}

pub async fn write_payload<W>(writer: W, payload: SocketPayload) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let frames = FramedWrite::new(writer, LengthDelimitedCodec::new());
    let mut payloads = tokio_serde::SymmetricallyFramed::new(
        frames,
        SymmetricalBincode::<SocketPayload>::default(),
    );
    payloads.send(payload).await
}

pub async fn send_payload(
    path: &std::path::Path,
    payload: SocketPayload,
) -> std::io::Result<()> {
    let stream = tokio::net::UnixStream::connect(path).await?;
    write_payload(stream, payload).await
}

/// Dispatches every payload on the stream until the peer hangs up.
///
/// Returns the number of commands handed to the dispatcher. Their requests
/// are not awaited.
pub async fn handle_client<R>(stream: R, dispatcher: &Dispatcher) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let frames = FramedRead::new(stream, LengthDelimitedCodec::new());
    let mut payloads = tokio_serde::SymmetricallyFramed::new(
        frames,
        SymmetricalBincode::<SocketPayload>::default(),
    );

    let mut count = 0;
    while let Some(payload) = payloads.try_next().await? {
        debug!(command = %payload.cmd, address = ?payload.address, "client command");
        let handle = match payload.address {
            Some(address) => dispatcher
                .with_address(Arc::new(StaticAddress(address)))
                .dispatch(payload.cmd),
            None => dispatcher.dispatch(payload.cmd),
        };
        drop(handle);
        count += 1;
    }

    Ok(count)
}

/// Accept loop. Each client gets its own task so an idle connection can't
/// hold up other bindings.
pub async fn serve(listener: UnixListener, dispatcher: Dispatcher) {
    info!("accepting panel clients");
    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_client(stream, &dispatcher).await {
                        warn!(error = %e, "handle_client failed");
                    }
                });
            }
            Err(e) => error!(error = %e, "listener error"),
        }
    }
}
