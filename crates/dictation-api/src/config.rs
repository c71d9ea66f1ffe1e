//! Server configuration, resolved once at startup.
//!
//! Environment variables:
//!   DATA_PATH     - data root holding `targets/` and `data.db`
//!                   (default: "~/.dictation-battle/", must exist)
//!   FRONTEND_URL  - origin of the web frontend, required (CORS)
//!   DATABASE_URL  - SQLite URL (default: "sqlite://<DATA_PATH>/data.db")
//!   HOST          - bind address (default: "0.0.0.0")
//!   PORT          - bind port (default: 8041)
//!   DATABASE_MAX_CONNECTIONS      - pool size (default: 5)
//!   DATABASE_CONNECT_TIMEOUT_SECS - acquire and busy timeout (default: 30)
//!   LOG_FORMAT    - "text" or "json" (default: "text")
//!   LOG_FILE      - daily-rotated log file instead of stdout
//!   LOG_ANSI      - force ANSI colors on or off
//!   RUST_LOG      - tracing filter directives

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use dictation_core::{Error, Result};
use dictation_db::pool::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_CONNECTIONS};
use dictation_db::PoolConfig;

/// Default data root when `DATA_PATH` is unset.
pub const DEFAULT_DATA_PATH: &str = "~/.dictation-battle/";

pub const DEFAULT_HOST: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 8041;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str =
    "dictation_api=debug,dictation_core=info,dictation_db=info,tower_http=debug";

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_root: PathBuf,
    pub frontend_url: String,
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub db_connect_timeout: Duration,
    pub log: LogConfig,
}

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(Error::Config(format!(
                "LOG_FORMAT must be \"text\" or \"json\", got {:?}",
                other
            ))),
        }
    }
}

/// Logging settings consumed by the server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Log to this file (rotated daily) instead of stdout.
    pub file: Option<PathBuf>,
    /// Explicit ANSI color choice; `None` means colors on stdout only.
    pub ansi: Option<bool>,
    /// `RUST_LOG`-style directives.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            file: None,
            ansi: None,
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl LogConfig {
    /// Whether to emit ANSI escapes.
    pub fn use_ansi(&self) -> bool {
        self.ansi.unwrap_or(self.file.is_none())
    }
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_path = var("DATA_PATH").unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
        let data_root = expand_home(&raw_path, var("HOME").as_deref());
        if !data_root.is_dir() {
            return Err(Error::Config(format!(
                "data path {} does not exist",
                data_root.display()
            )));
        }

        let frontend_url = var("FRONTEND_URL")
            .ok_or_else(|| Error::Config("FRONTEND_URL is not set".to_string()))?;

        let database_url = var("DATABASE_URL").unwrap_or_else(|| default_database_url(&data_root));

        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(var("PORT"), "PORT", DEFAULT_PORT)?;

        let db_max_connections = parse_or(
            var("DATABASE_MAX_CONNECTIONS"),
            "DATABASE_MAX_CONNECTIONS",
            DEFAULT_MAX_CONNECTIONS,
        )?;
        if db_max_connections == 0 {
            return Err(Error::Config(
                "DATABASE_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }
        let db_connect_timeout = Duration::from_secs(parse_or(
            var("DATABASE_CONNECT_TIMEOUT_SECS"),
            "DATABASE_CONNECT_TIMEOUT_SECS",
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )?);

        let log = LogConfig {
            format: var("LOG_FORMAT")
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or_default(),
            file: var("LOG_FILE").map(PathBuf::from),
            ansi: var("LOG_ANSI").map(|v| v == "true" || v == "1"),
            filter: var("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        };

        Ok(Self {
            data_root,
            frontend_url,
            database_url,
            host,
            port,
            db_max_connections,
            db_connect_timeout,
            log,
        })
    }

    /// Pool settings for [`dictation_db::Database::connect_with_config`].
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new()
            .max_connections(self.db_max_connections)
            .connect_timeout(self.db_connect_timeout)
    }

    /// `host:port` string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} is not valid: {}", key, v))),
        None => Ok(default),
    }
}

fn default_database_url(data_root: &Path) -> String {
    format!("sqlite://{}", data_root.join("data.db").display())
}

/// Replace a leading `~` with the home directory.
fn expand_home(path: &str, home: Option<&str>) -> PathBuf {
    match (path.strip_prefix('~'), home) {
        (Some(rest), Some(home)) => {
            let rest = rest.trim_start_matches('/');
            Path::new(home).join(rest)
        }
        _ => PathBuf::from(path),
    }
}
