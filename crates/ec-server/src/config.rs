//! Server configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ec_auth::DEFAULT_SESSION_TTL_SECS;
use ec_commerce::cart::DEFAULT_MAX_QUANTITY_PER_ITEM;
use ec_commerce::PageSettings;
use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;

/// File names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["ec-site.toml", ".ec-site.toml", "ec-site.json"];

/// Server configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listener settings.
    #[serde(default)]
    pub server: ListenConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Catalog listing settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Cart limits.
    #[serde(default)]
    pub cart: CartConfig,

    /// Session settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Optional behaviour switches.
    #[serde(default)]
    pub features: FeaturesConfig,
}

impl ServerConfig {
    /// Load config from a file.
    ///
    /// `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?
        };

        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Find a config file in `start` or any parent directory.
    pub fn find(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_FILE_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Load an explicit config file, or discover one from `cwd`.
    ///
    /// Falls back to defaults when nothing is found. An explicit path that
    /// cannot be loaded is an error.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        match Self::find(cwd) {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.default_page_size == 0 {
            bail!("catalog.default_page_size must be at least 1");
        }
        if self.catalog.max_page_size < self.catalog.default_page_size {
            bail!(
                "catalog.max_page_size ({}) must not be smaller than catalog.default_page_size ({})",
                self.catalog.max_page_size,
                self.catalog.default_page_size
            );
        }
        if self.cart.max_quantity_per_item < 1 {
            bail!("cart.max_quantity_per_item must be at least 1");
        }
        Ok(())
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .with_context(|| format!("Invalid listen address: {}", addr))
    }

    /// Page limits shared by the catalog and order listings.
    pub fn page_settings(&self) -> PageSettings {
        PageSettings {
            default_page_size: self.catalog.default_page_size,
            max_page_size: self.catalog.max_page_size,
        }
    }
}

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenConfig {
    /// Interface to bind (default: 127.0.0.1).
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port (default: 3000).
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `ec_server=debug,info`.
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Catalog listing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

fn default_page_size() -> usize {
    PageSettings::default().default_page_size
}

fn default_max_page_size() -> usize {
    PageSettings::default().max_page_size
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// Cart limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    #[serde(default = "default_max_quantity")]
    pub max_quantity_per_item: i64,
}

fn default_max_quantity() -> i64 {
    DEFAULT_MAX_QUANTITY_PER_ITEM
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            max_quantity_per_item: default_max_quantity(),
        }
    }
}

/// Session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

fn default_session_ttl() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: default_session_ttl(),
        }
    }
}

/// Optional behaviour switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Expose `POST /api/test/reset`.
    #[serde(default)]
    pub test_routes: bool,

    /// Start the catalog with the demo products.
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            test_routes: false,
            seed_demo_data: true,
        }
    }
}
