use std::sync::Arc;

use reqwest::{StatusCode, Url};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::address::{AddressError, AddressProvider};
use crate::command::{Command, Direction};
use crate::transport::{HttpTransport, Transport, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("dispatch task aborted")]
    Aborted,
}

/// `<address>?name=<command>`, exactly as it goes on the wire.
pub fn request_target(address: &str, command: &Command) -> String {
    format!("{}?name={}", address, command.encode())
}

fn parse_target(target: &str) -> Result<Url, AddressError> {
    let parsed = if target.contains("://") {
        Url::parse(target)
    } else {
        Url::parse(&format!("http://{}", target))
    };
    parsed.map_err(|e| AddressError::InvalidTarget {
        target: target.to_owned(),
        reason: e.to_string(),
    })
}

/// Outcome of a dispatched command. Dropping it leaves the request running.
#[must_use = "drop the handle explicitly to fire and forget"]
pub struct DispatchHandle {
    task: JoinHandle<Result<(), DispatchError>>,
}

impl DispatchHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn outcome(self) -> Result<(), DispatchError> {
        match self.task.await {
            Ok(result) => result,
            Err(_) => Err(DispatchError::Aborted),
        }
    }
}

/// Turns panel commands into requests against the device.
///
/// Every command resolves the address again and runs as its own task on the
/// current tokio runtime. Commands are not ordered relative to each other.
#[derive(Clone)]
pub struct Dispatcher {
    address: Arc<dyn AddressProvider>,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(address: Arc<dyn AddressProvider>, transport: Arc<dyn Transport>) -> Self {
        Self { address, transport }
    }

    pub fn http(address: Arc<dyn AddressProvider>) -> Self {
        Self::new(address, Arc::new(HttpTransport::new()))
    }

    /// Same transport, different device.
    pub fn with_address(&self, address: Arc<dyn AddressProvider>) -> Self {
        Self {
            address,
            transport: self.transport.clone(),
        }
    }

    async fn deliver(&self, command: &Command) -> Result<StatusCode, DispatchError> {
        let address = self.address.resolve()?;
        let url = parse_target(&request_target(&address, command))?;
        Ok(self.transport.get(url).await?)
    }

    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, command: Command) -> DispatchHandle {
        let this = self.clone();
        let task = tokio::spawn(async move {
            // any response counts as delivered and is not logged
            match this.deliver(&command).await {
                Ok(_) => Ok(()),
                Err(e) => {
                    warn!(command = %command, error = %e, "command dispatch failed");
                    Err(e)
                }
            }
        });
        DispatchHandle { task }
    }

    pub fn adjust_brightness(&self, direction: Direction) -> DispatchHandle {
        self.dispatch(Command::Brightness { direction })
    }

    pub fn navigate(&self, direction: Direction) -> DispatchHandle {
        self.dispatch(Command::Navigate { direction })
    }

    pub fn reset(&self) -> DispatchHandle {
        self.dispatch(Command::Reset)
    }

    pub fn toggle_play(&self) -> DispatchHandle {
        self.dispatch(Command::TogglePlay)
    }
}
