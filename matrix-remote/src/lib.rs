pub mod address;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod socket;
pub mod trace;
pub mod transport;

pub use address::{AddressError, AddressProvider, EnvAddress, FileAddress, StaticAddress};
pub use command::{Command, Direction};
pub use dispatch::{request_target, DispatchError, DispatchHandle, Dispatcher};
pub use socket::SocketPayload;
pub use transport::{HttpTransport, Transport, TransportError};
