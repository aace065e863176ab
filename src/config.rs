//! Process configuration, from flags or environment.

use crate::logging::LogFormat;
use crate::policy::WritePolicy;
use crate::store::{RecordStore, RecordStoreBuilder};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Command line / environment configuration for the server binary.
#[derive(Parser, Debug, Clone)]
#[command(name = "collection-store", version, about)]
pub struct ServerConfig {
    /// Interface to bind.
    #[arg(long, env = "COLLECTION_STORE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind.
    #[arg(long, env = "COLLECTION_STORE_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Directory holding one JSON file per collection. Defaults to `data`
    /// next to the executable.
    #[arg(long, env = "COLLECTION_STORE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Write indented JSON.
    #[arg(long, env = "COLLECTION_STORE_PRETTY", default_value_t = true, action = clap::ArgAction::Set)]
    pub pretty: bool,

    /// Write to a temp file and rename it over the collection file.
    #[arg(long, env = "COLLECTION_STORE_ATOMIC_WRITES")]
    pub atomic_writes: bool,

    /// Lock each collection for the duration of a load+save.
    #[arg(long, env = "COLLECTION_STORE_EXCLUSIVE")]
    pub exclusive: bool,

    /// Log output format.
    #[arg(long, env = "COLLECTION_STORE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Socket address from `host` and `port`.
    pub fn bind_addr(&self) -> crate::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| crate::Error::Config(format!("bad bind address {}:{}: {e}", self.host, self.port)))
    }

    /// The configured data directory, or `data` beside the running executable
    /// (`./data` if the executable path is unavailable).
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.join("data")))
            .unwrap_or_else(|| PathBuf::from("data"))
    }

    /// Store builder carrying this configuration.
    pub fn store_builder(&self) -> RecordStoreBuilder {
        RecordStore::builder(self.resolved_data_dir())
            .pretty(self.pretty)
            .write_policy(WritePolicy::from_flag(self.atomic_writes))
            .exclusive(self.exclusive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_binding() {
        let cfg = ServerConfig::try_parse_from(["collection-store"]).unwrap();
        assert_eq!(cfg.bind_addr().unwrap(), "0.0.0.0:3000".parse().unwrap());
        assert!(cfg.pretty);
        assert!(!cfg.atomic_writes);
        assert!(!cfg.exclusive);
        assert!(cfg.resolved_data_dir().ends_with("data"));
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = ServerConfig::try_parse_from([
            "collection-store",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--data-dir",
            "/tmp/records",
            "--pretty",
            "false",
            "--atomic-writes",
            "--exclusive",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr().unwrap(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(cfg.resolved_data_dir(), PathBuf::from("/tmp/records"));
        assert!(!cfg.pretty);
        assert!(cfg.atomic_writes);
        assert!(cfg.exclusive);
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn bad_host_is_a_config_error() {
        let cfg = ServerConfig::try_parse_from(["collection-store", "--host", "not a host"]).unwrap();
        assert!(matches!(cfg.bind_addr(), Err(crate::Error::Config(_))));
    }
}
