use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("environment variable {0} is not set")]
    MissingVar(String),
    #[error("can't read address file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("address is empty")]
    Empty,
    #[error("invalid request target {target}: {reason}")]
    InvalidTarget { target: String, reason: String },
}

/// Resolves the current address of the controlled device.
///
/// Called once per dispatched command; implementations must not cache on
/// behalf of the dispatcher.
pub trait AddressProvider: Send + Sync {
    fn resolve(&self) -> Result<String, AddressError>;
}

impl<F> AddressProvider for F
where
    F: Fn() -> Result<String, AddressError> + Send + Sync,
{
    fn resolve(&self) -> Result<String, AddressError> {
        self()
    }
}

fn non_empty(s: &str) -> Result<String, AddressError> {
    let s = s.trim();
    if s.is_empty() {
        Err(AddressError::Empty)
    } else {
        Ok(s.to_owned())
    }
}

#[derive(Debug, Clone)]
pub struct StaticAddress(pub String);

impl AddressProvider for StaticAddress {
    fn resolve(&self) -> Result<String, AddressError> {
        non_empty(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct EnvAddress {
    pub var: String,
}

impl AddressProvider for EnvAddress {
    fn resolve(&self) -> Result<String, AddressError> {
        let value =
            std::env::var(&self.var).map_err(|_| AddressError::MissingVar(self.var.clone()))?;
        non_empty(&value)
    }
}

/// Reads the address from a file that some other process keeps current.
#[derive(Debug, Clone)]
pub struct FileAddress {
    pub path: PathBuf,
}

impl AddressProvider for FileAddress {
    fn resolve(&self) -> Result<String, AddressError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| AddressError::Io {
            path: self.path.clone(),
            source,
        })?;
        non_empty(&content)
    }
}
