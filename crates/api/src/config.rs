//! Runtime configuration, read once from the environment at startup.

use std::net::{Ipv4Addr, SocketAddr};

use thiserror::Error;

use livelum_observability::LogFormat;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has an invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must be set when USE_PERSISTENT_STORES=true")]
    Missing(&'static str),
}

/// Where repositories keep their data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    InMemory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub storage: Storage,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source. Unset and blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = parse_var::<SocketAddr>("LIVELUM_BIND_ADDR", get("LIVELUM_BIND_ADDR"))?
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)));

        let log_format = parse_var::<LogFormat>("LIVELUM_LOG_FORMAT", get("LIVELUM_LOG_FORMAT"))?.unwrap_or_default();

        let persistent = parse_var::<bool>("USE_PERSISTENT_STORES", get("USE_PERSISTENT_STORES"))?
            .unwrap_or(false);

        let storage = if persistent {
            let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
            let max_connections = parse_var::<u32>("DATABASE_MAX_CONNECTIONS", get("DATABASE_MAX_CONNECTIONS"))?
                .unwrap_or(DEFAULT_MAX_CONNECTIONS);
            if max_connections == 0 {
                return Err(invalid("DATABASE_MAX_CONNECTIONS", "0", "must be at least 1"));
            }
            Storage::Postgres {
                database_url,
                max_connections,
            }
        } else {
            Storage::InMemory
        };

        Ok(Self {
            bind_addr,
            storage,
            log_format,
        })
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self.storage, Storage::Postgres { .. })
    }
}

fn parse_var<T>(var: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|value| value.parse::<T>().map_err(|e| invalid(var, &value, e)))
        .transpose()
}

fn invalid(var: &'static str, value: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_to_in_memory_on_8080() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.storage, Storage::InMemory);
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert!(!cfg.is_persistent());
    }

    #[test]
    fn persistent_requires_database_url() {
        assert_eq!(
            config(&[("USE_PERSISTENT_STORES", "true")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn persistent_reads_pool_settings() {
        let cfg = config(&[
            ("USE_PERSISTENT_STORES", "true"),
            ("DATABASE_URL", "postgres://localhost/livelum"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
        ])
        .unwrap();
        assert_eq!(
            cfg.storage,
            Storage::Postgres {
                database_url: "postgres://localhost/livelum".into(),
                max_connections: 4,
            }
        );
    }

    #[test]
    fn garbage_values_are_errors() {
        assert!(matches!(
            config(&[("USE_PERSISTENT_STORES", "yes")]),
            Err(ConfigError::Invalid { var: "USE_PERSISTENT_STORES", .. })
        ));
        assert!(matches!(
            config(&[("LIVELUM_BIND_ADDR", "localhost")]),
            Err(ConfigError::Invalid { var: "LIVELUM_BIND_ADDR", .. })
        ));
        assert!(matches!(
            config(&[("LIVELUM_LOG_FORMAT", "xml")]),
            Err(ConfigError::Invalid { var: "LIVELUM_LOG_FORMAT", .. })
        ));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = config(&[("LIVELUM_BIND_ADDR", "  "), ("LIVELUM_LOG_FORMAT", "pretty")]).unwrap();
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }
}
