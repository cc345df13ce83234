//! Connection properties for the product store.
//!
//! # Responsibility
//! - Load the database URL and credentials from a TOML file.
//! - Fall back to built-in defaults when no file is present.
//! - Translate the URL into something the SQLite driver can open.
//!
//! # Invariants
//! - Passwords never appear in `Debug` output or log lines.
//! - A missing file is not an error; an unreadable or malformed one is.

use log::{debug, info, warn};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Config file name looked up by the CLI when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "application.toml";
/// Database used when no config file exists.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:product_store.sqlite3";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    UnsupportedUrl(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
            Self::UnsupportedUrl(url) => write!(
                f,
                "unsupported database url `{url}`; expected sqlite:<path>, sqlite://<path>, sqlite::memory: or a file path"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::UnsupportedUrl(_) => None,
        }
    }
}

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    Memory,
    File(PathBuf),
}

impl DatabaseUrl {
    /// Parses `sqlite::memory:`, `:memory:`, `sqlite://<path>`, `sqlite:<path>`
    /// or a bare file path.
    pub fn parse(raw: &str) -> ConfigResult<Self> {
        let trimmed = raw.trim();
        let location = trimmed
            .strip_prefix("sqlite://")
            .or_else(|| trimmed.strip_prefix("sqlite:"))
            .unwrap_or(trimmed);

        if location.is_empty() {
            return Err(ConfigError::UnsupportedUrl(raw.to_string()));
        }
        if location == ":memory:" {
            return Ok(Self::Memory);
        }
        // Anything still carrying a scheme (`jdbc:derby://...`, `postgres://...`)
        // belongs to another driver. Windows drive letters are one char long.
        if let Some((scheme, _)) = location.split_once(':') {
            if scheme.len() > 1 {
                return Err(ConfigError::UnsupportedUrl(raw.to_string()));
            }
        }

        Ok(Self::File(PathBuf::from(location)))
    }

    /// Short label used in log events.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File(_) => "file",
        }
    }
}

/// Connection properties: database URL plus optional credentials.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    pub url: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            user: None,
            password: None,
        }
    }
}

impl Debug for ConnectionConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl ConnectionConfig {
    /// Loads connection properties from `path`, or defaults when it is missing.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(
                    "event=config_load module=config status=fallback reason=not_found path={}",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "event=config_load module=config status=ok path={}",
            path.display()
        );
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Parses `url` into an openable location.
    ///
    /// SQLite has no authentication, so credentials are only noted here.
    pub fn database_url(&self) -> ConfigResult<DatabaseUrl> {
        if self.user.is_some() || self.password.is_some() {
            debug!("event=config_credentials module=config status=ignored reason=sqlite_has_no_auth");
        }
        DatabaseUrl::parse(&self.url)
    }
}
