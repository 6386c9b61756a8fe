//! Server and archive configuration.
//!
//! Configuration comes from a TOML file when `EXO_CONFIG` names one, otherwise
//! from environment variables. Every setting has a default so the server starts
//! with no configuration at all.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ARCHIVE_ROOT: &str = "data/lightcurves";
pub const DEFAULT_ARCHIVE_TIMEOUT_SECS: u64 = 120;

/// Origins of the front-end dev servers.
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:3000"];

/// Archive implementation to use for the real-data endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveKind {
    /// Directory tree on local disk
    #[default]
    Local,
    /// Remote HTTP archive service
    Http,
}

impl FromStr for ArchiveKind {
    type Err = String;

    /// Parse archive type from string ("local", "http").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "dir" => Ok(Self::Local),
            "http" | "remote" => Ok(Self::Http),
            _ => Err(format!("Unknown archive type: {}", s)),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub archive: ArchiveSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins; `"*"` allows any origin
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

/// Light-curve archive settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveSettings {
    #[serde(rename = "type", default)]
    pub kind: ArchiveKind,
    /// Base URL of the remote archive (required for `http`)
    #[serde(default)]
    pub url: Option<String>,
    /// Root directory of the local archive
    #[serde(default = "default_archive_root")]
    pub root: PathBuf,
    /// Product cache directory; defaults to the user cache directory
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_cors_origins() -> Vec<String> {
    DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect()
}

fn default_archive_root() -> PathBuf {
    PathBuf::from(DEFAULT_ARCHIVE_ROOT)
}

fn default_timeout_secs() -> u64 {
    DEFAULT_ARCHIVE_TIMEOUT_SECS
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            kind: ArchiveKind::default(),
            url: None,
            root: default_archive_root(),
            cache_dir: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServerSettings {
    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("Invalid bind address {}:{}: {}", self.host, self.port, e))
    }

    /// Whether any origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

impl ArchiveSettings {
    /// Cache directory to use, falling back to `<user cache>/exo-backend/products`.
    pub fn resolved_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("exo-backend")
                .join("products")
        })
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `HOST` (optional, default: 0.0.0.0)
    /// - `PORT` (optional, default: 8000)
    /// - `CORS_ORIGINS` (optional): comma-separated origins, `*` for any
    /// - `ARCHIVE_TYPE` (optional): `local` | `http`; defaults to `http` when
    ///   `ARCHIVE_URL` is set, otherwise `local`
    /// - `ARCHIVE_URL` (required for `http`): base URL of the remote archive
    /// - `ARCHIVE_ROOT` (optional, default: data/lightcurves): local archive root
    /// - `EXO_CACHE_DIR` (optional): product cache directory
    /// - `ARCHIVE_TIMEOUT_SECS` (optional, default: 120)
    ///
    /// # Errors
    /// Returns an error if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match env::var("PORT") {
            Ok(v) => v
                .parse()
                .map_err(|_| "PORT must be a valid port number".to_string())?,
            Err(_) => DEFAULT_PORT,
        };
        let cors_origins = env::var("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| default_cors_origins());

        let url = env::var("ARCHIVE_URL").ok().filter(|s| !s.is_empty());
        let kind = match env::var("ARCHIVE_TYPE") {
            Ok(v) => v.parse()?,
            Err(_) if url.is_some() => ArchiveKind::Http,
            Err(_) => ArchiveKind::Local,
        };
        let root = env::var("ARCHIVE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_archive_root());
        let cache_dir = env::var("EXO_CACHE_DIR").ok().map(PathBuf::from);
        let timeout_secs = match env::var("ARCHIVE_TIMEOUT_SECS") {
            Ok(v) => v
                .parse()
                .map_err(|_| "ARCHIVE_TIMEOUT_SECS must be a whole number of seconds".to_string())?,
            Err(_) => DEFAULT_ARCHIVE_TIMEOUT_SECS,
        };

        let config = Self {
            server: ServerSettings {
                host,
                port,
                cors_origins,
            },
            archive: ArchiveSettings {
                kind,
                url,
                root,
                cache_dir,
                timeout_secs,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file {}: {}", path.as_ref().display(), e))?;
        let config: AppConfig =
            toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `EXO_CONFIG` when set, otherwise from the environment.
    pub fn load() -> Result<Self, String> {
        match env::var("EXO_CONFIG") {
            Ok(path) => Self::from_file(path),
            Err(_) => Self::from_env(),
        }
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), String> {
        if self.archive.kind == ArchiveKind::Http && self.archive.url.is_none() {
            return Err("ARCHIVE_URL must be set when the archive type is http".to_string());
        }
        if self.archive.timeout_secs == 0 {
            return Err("Archive timeout must be at least one second".to_string());
        }
        Ok(())
    }
}
