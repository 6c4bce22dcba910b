//! # Configuration
//!
//! Settings are layered, later layers winning:
//!
//! 1. `wardrobe.toml` (or the file given with `--config`)
//! 2. Environment variables
//! 3. Command-line flags
//!
//! ```toml
//! [catalog]
//! path = "data/figuredata.json"
//!
//! [imager]
//! url = "http://imager:3030/"
//! max_direction = 7
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! rate_limit = 100
//! cors_origins = "http://localhost:3000"
//!
//! [randomizer]
//! favoured_probability = 0.65
//! ```
//!
//! ## Environment Variables
//!
//! - `FIGUREDATA_PATH`: catalog document location
//! - `IMAGER_INTERNAL_URL`: base URL of the imager
//! - `WARDROBE_RATE_LIMIT`: requests per second (0 disables)
//! - `WARDROBE_CORS_ORIGINS`: comma-separated origins, or `*`

use crate::imager::ImagerClient;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wardrobe_core::primitives::DEFAULT_MAX_DIRECTION;
use wardrobe_core::{CatalogStore, FileSource, Randomizer, RandomizerConfig, Wardrobe, WardrobeError};

/// File read when `--config` is not given. Its absence is not an error.
pub const DEFAULT_CONFIG_FILE: &str = "wardrobe.toml";

pub const ENV_CATALOG_PATH: &str = "FIGUREDATA_PATH";
pub const ENV_IMAGER_URL: &str = "IMAGER_INTERNAL_URL";
pub const ENV_RATE_LIMIT: &str = "WARDROBE_RATE_LIMIT";
pub const ENV_CORS_ORIGINS: &str = "WARDROBE_CORS_ORIGINS";

/// Default rate limit: 100 requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

// =============================================================================
// SETTINGS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagerSettings {
    pub url: Option<String>,
    /// Highest rotation index forwarded to the imager.
    pub max_direction: u8,
}

impl Default for ImagerSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_direction: DEFAULT_MAX_DIRECTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Requests per second, 0 disables limiting.
    pub rate_limit: u32,
    /// Comma-separated origins or `*`. Localhost only when unset.
    pub cors_origins: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: None,
        }
    }
}

impl ServerSettings {
    /// Socket address to bind.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Complete application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub imager: ImagerSettings,
    pub server: ServerSettings,
    pub randomizer: RandomizerConfig,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub catalog: Option<PathBuf>,
    pub imager_url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, WardrobeError> {
        toml::from_str(text).map_err(|e| WardrobeError::Config(format!("Invalid config: {}", e)))
    }

    /// Read settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, WardrobeError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            WardrobeError::Config(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Resolve file and environment layers.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, WardrobeError> {
        let mut settings = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Apply environment overrides. Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(path) = get(ENV_CATALOG_PATH) {
            self.catalog.path = Some(PathBuf::from(path));
        }
        if let Some(url) = get(ENV_IMAGER_URL) {
            self.imager.url = Some(url);
        }
        if let Some(raw) = get(ENV_RATE_LIMIT) {
            match raw.parse() {
                Ok(rps) => self.server.rate_limit = rps,
                Err(_) => tracing::warn!("Ignoring invalid {}: '{}'", ENV_RATE_LIMIT, raw),
            }
        }
        if let Some(origins) = get(ENV_CORS_ORIGINS) {
            self.server.cors_origins = Some(origins);
        }
    }

    /// Apply command-line overrides.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(path) = &overrides.catalog {
            self.catalog.path = Some(path.clone());
        }
        if let Some(url) = &overrides.imager_url {
            self.imager.url = Some(url.clone());
        }
        if let Some(host) = &overrides.host {
            self.server.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
    }

    /// Build the query façade over the configured catalog file.
    ///
    /// A missing catalog path surfaces as a configuration error on first query.
    #[must_use]
    pub fn wardrobe(&self) -> Wardrobe {
        let store = CatalogStore::new(FileSource::new(self.catalog.path.clone()));
        Wardrobe::new(store).with_randomizer(Randomizer::new(self.randomizer.clone()))
    }

    /// Imager client, if an imager URL is configured.
    #[must_use]
    pub fn imager(&self) -> Option<ImagerClient> {
        self.imager
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(|u| ImagerClient::new(u).with_max_direction(self.imager.max_direction))
    }
}

// =============================================================================
// TESTS
// =============================================================================
