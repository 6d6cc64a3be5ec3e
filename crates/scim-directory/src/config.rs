//! Process configuration, from flags or environment.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use scim_path::{AtomicPaths, ENTERPRISE_USER_SCHEMA};
use uuid::Uuid;

#[derive(Debug, Clone, Parser)]
#[command(name = "scim-mock", version, about = "Mock SCIM 2.0 user directory")]
pub struct Config {
    /// Snapshot document holding the whole directory.
    #[arg(long, env = "SCIM_STORE_PATH", default_value = "users.json")]
    pub store_path: PathBuf,

    /// Shared bearer secret. A random one is generated when unset.
    #[arg(long, env = "SCIM_TOKEN")]
    pub token: Option<String>,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    #[arg(long, env = "SCIM_SNAPSHOT_INTERVAL_SECS", default_value_t = 30)]
    pub snapshot_interval_secs: u64,

    /// Keep the directory in memory only: no restore, no snapshots.
    #[arg(long, env = "SCIM_NO_PERSIST")]
    pub no_persist: bool,

    /// Log the bearer secret at startup. Development only.
    #[arg(long, env = "SCIM_EXPOSE_TOKEN")]
    pub expose_token: bool,

    /// Attribute paths never split on `.`.
    #[arg(
        long = "atomic-path",
        env = "SCIM_ATOMIC_PATHS",
        value_delimiter = ',',
        default_value = ENTERPRISE_USER_SCHEMA
    )]
    pub atomic_paths: Vec<String>,

    /// Filter applied to `GET /Users` requests that carry none.
    #[arg(long, env = "SCIM_DEFAULT_FILTER")]
    pub default_filter: Option<String>,
}

impl Config {
    pub fn atomic(&self) -> AtomicPaths {
        AtomicPaths::new(&self.atomic_paths)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    /// Snapshot period, never shorter than one second.
    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_secs(self.snapshot_interval_secs.max(1))
    }

    /// The configured secret, or a fresh random one. Returns whether it was
    /// generated.
    pub fn resolve_token(&self) -> (String, bool) {
        match self.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => (token.to_string(), false),
            None => (Uuid::new_v4().simple().to_string(), true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("scim-mock").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let config = parse(&["--store-path", "users.json"]);
        assert_eq!(config.snapshot_interval(), Duration::from_secs(30));
        assert!(!config.no_persist);
        assert!(config.atomic().contains(ENTERPRISE_USER_SCHEMA));
    }

    #[test]
    fn flags() {
        let config = parse(&[
            "--port",
            "9000",
            "--token",
            "s3cret",
            "--no-persist",
            "--atomic-path",
            "a.b,c.d",
            "--snapshot-interval-secs",
            "0",
        ]);
        assert_eq!(config.bind_addr().port(), 9000);
        assert_eq!(config.resolve_token(), ("s3cret".to_string(), false));
        assert!(config.no_persist);
        assert_eq!(config.atomic(), AtomicPaths::new(["a.b", "c.d"]));
        assert_eq!(config.snapshot_interval(), Duration::from_secs(1));
    }

    #[test]
    fn generated_token() {
        let config = parse(&["--token", "  "]);
        let (token, generated) = config.resolve_token();
        assert!(generated);
        assert_eq!(token.len(), 32);
    }
}
