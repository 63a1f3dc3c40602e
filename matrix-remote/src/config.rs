use std::path::PathBuf;
use std::sync::Arc;

use crate::address::{AddressProvider, EnvAddress, FileAddress, StaticAddress};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no target address, pass --address, --address-file or --address-var")]
    NoTarget,
}

/// Where the device lives. Shared by the client and the daemon.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct TargetArgs {
    /// Device address, e.g. `192.168.1.50` or `http://192.168.1.50:8080/`
    #[arg(
        long,
        env = "MATRIX_REMOTE_ADDRESS",
        conflicts_with_all = ["address_file", "address_var"]
    )]
    pub address: Option<String>,

    /// File holding the device address, re-read for every command
    #[arg(
        long,
        env = "MATRIX_REMOTE_ADDRESS_FILE",
        conflicts_with = "address_var"
    )]
    pub address_file: Option<PathBuf>,

    /// Environment variable holding the device address, read for every command
    #[arg(long)]
    pub address_var: Option<String>,
}

impl TargetArgs {
    pub fn is_set(&self) -> bool {
        self.address.is_some() || self.address_file.is_some() || self.address_var.is_some()
    }

    pub fn provider(&self) -> Result<Arc<dyn AddressProvider>, ConfigError> {
        if let Some(path) = &self.address_file {
            return Ok(Arc::new(FileAddress { path: path.clone() }));
        }
        if let Some(var) = &self.address_var {
            return Ok(Arc::new(EnvAddress { var: var.clone() }));
        }
        match &self.address {
            Some(address) => Ok(Arc::new(StaticAddress(address.clone()))),
            None => Err(ConfigError::NoTarget),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        target: TargetArgs,
    }

    #[test]
    fn address_flag_gives_static_provider() {
        let cli = Cli::try_parse_from(["test", "--address", "192.168.1.50"]).unwrap();
        let provider = cli.target.provider().unwrap();
        assert_eq!(provider.resolve().unwrap(), "192.168.1.50");
    }

    #[test]
    fn address_and_file_conflict() {
        let res = Cli::try_parse_from([
            "test",
            "--address",
            "192.168.1.50",
            "--address-file",
            "/run/matrix/address",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn address_var_is_read_per_resolve() {
        let var = format!("MATRIX_REMOTE_TEST_VAR_{}", std::process::id());
        let cli = Cli::try_parse_from(["test", "--address-var", var.as_str()]).unwrap();
        let provider = cli.target.provider().unwrap();

        std::env::set_var(&var, "10.0.0.3");
        assert_eq!(provider.resolve().unwrap(), "10.0.0.3");
        std::env::set_var(&var, "10.0.0.4");
        assert_eq!(provider.resolve().unwrap(), "10.0.0.4");
        std::env::remove_var(&var);
    }

    #[test]
    fn missing_target_is_an_error() {
        let target = TargetArgs::default();
        assert!(!target.is_set());
        assert!(matches!(target.provider(), Err(ConfigError::NoTarget)));
    }
}
