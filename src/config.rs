//! Application configuration management.
//!
//! Settings are layered with figment, later layers overriding earlier ones:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. TOML file (`--config` path, or the platform config directory)
//! 3. Environment variables prefixed with `DLSORT_` (`__` separates nested keys)
//! 4. CLI flags, applied by the caller
//!
//! A `[categories]` table in the file is merged key by key into the built-in
//! table: listing `Images` replaces the stock `Images` entry and leaves the
//! other categories in place. Category keys from the environment match an
//! existing category regardless of case, so `DLSORT_CATEGORIES__IMAGES`
//! replaces `Images`; an unknown name keeps the spelling of the variable.
//!
//! # Example
//!
//! ```toml
//! base_dir = "/home/me/Downloads"
//! listing_order = "name"
//! algorithm = "blake3"
//! delete_mode = "trash"
//! fallback_category = "Misc"
//!
//! [categories]
//! Images = [".jpg", ".png", ".heic"]
//! Books = [".epub"]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::{ProjectDirs, UserDirs};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::value::{Uncased, UncasedStr};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::actions::DeleteMode;
use crate::organize::{default_categories, CategoryConfig, CategoryError, DEFAULT_FALLBACK};
use crate::scanner::{HashAlgorithm, ListingOrder};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DLSORT_";

/// Errors raised while loading or saving configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A layer could not be parsed or has the wrong shape.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// No platform config directory could be determined.
    #[error("failed to determine the configuration directory")]
    NoConfigDir,

    /// No base directory was configured and no Downloads folder was found.
    #[error("failed to determine the downloads directory; set base_dir or pass a path")]
    NoDownloadsDir,

    /// The category table names folders outside the base directory.
    #[error("invalid category table: {0}")]
    Categories(#[from] CategoryError),

    /// The config file could not be written.
    #[error("cannot write {path}: {source}")]
    Write {
        /// Target file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The config could not be serialized to TOML.
    #[error("cannot serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory to organize; defaults to the user's Downloads folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
    /// Folder for files no category claims.
    pub fallback_category: String,
    /// Order in which entries are fingerprinted.
    pub listing_order: ListingOrder,
    /// Fingerprint hash function.
    pub algorithm: HashAlgorithm,
    /// How duplicates are removed.
    pub delete_mode: DeleteMode,
    /// Category folder name to extensions. Kept last: TOML tables must
    /// follow plain values.
    pub categories: BTreeMap<String, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: None,
            fallback_category: DEFAULT_FALLBACK.to_string(),
            listing_order: ListingOrder::default(),
            algorithm: HashAlgorithm::default(),
            delete_mode: DeleteMode::default(),
            categories: default_categories(),
        }
    }
}

impl Config {
    /// Load configuration from the default file location and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a layer fails to parse.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of the default file if given.
    ///
    /// A missing file is not an error; defaults and the environment still apply.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a layer fails to parse.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(path).extract().map_err(Box::new)?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// The layered figment behind [`Config::load_from`].
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let file = path.map(Path::to_path_buf).or_else(Self::config_path);
        if let Some(file) = file {
            log::debug!("Reading configuration from {}", file.display());
            figment = figment.merge(Toml::file(file));
        }

        // An unparsable file surfaces on the final extract.
        let known: Vec<String> = figment
            .extract_inner::<BTreeMap<String, Vec<String>>>("categories")
            .map(|categories| categories.into_keys().collect())
            .unwrap_or_default();

        figment.merge(Self::env_provider(ENV_PREFIX, known))
    }

    /// Environment layer for `prefix`.
    ///
    /// Top-level keys are lowercased. A `CATEGORIES__<NAME>` key takes the
    /// spelling of the matching entry in `known_categories`, ignoring case.
    #[must_use]
    pub fn env_provider(prefix: &str, known_categories: Vec<String>) -> Env {
        Env::prefixed(prefix)
            .split("__")
            .lowercase(false)
            .map(move |key: &UncasedStr| Uncased::from(env_key(key.as_str(), &known_categories)))
    }

    /// Write this configuration as TOML to `path`, creating parent folders.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default platform-specific configuration file path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dlsort", "dlsort").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Base directory: the override, else `base_dir`, else the Downloads folder.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoDownloadsDir`] when nothing is configured and
    /// no Downloads folder can be found.
    pub fn resolve_base_dir(&self, cli_override: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = cli_override.or(self.base_dir.as_deref()) {
            return Ok(dir.to_path_buf());
        }

        let user_dirs = UserDirs::new().ok_or(ConfigError::NoDownloadsDir)?;
        Ok(user_dirs
            .download_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| user_dirs.home_dir().join("Downloads")))
    }

    /// Category table rooted at the resolved base directory.
    ///
    /// # Errors
    ///
    /// See [`Config::resolve_base_dir`]. Returns [`ConfigError::Categories`]
    /// if a folder name is not a single path component or the fallback is
    /// also a category.
    pub fn category_config(&self, cli_override: Option<&Path>) -> Result<CategoryConfig, ConfigError> {
        let base_dir = self.resolve_base_dir(cli_override)?;
        Ok(CategoryConfig::new(
            base_dir,
            &self.categories,
            self.fallback_category.clone(),
        )?)
    }
}

fn env_key(key: &str, known_categories: &[String]) -> String {
    match key.split_once('.') {
        Some((head, name)) if head.eq_ignore_ascii_case("categories") => {
            let name = known_categories
                .iter()
                .find(|known| known.eq_ignore_ascii_case(name))
                .map_or(name, String::as_str);
            format!("categories.{name}")
        }
        _ => key.to_ascii_lowercase(),
    }
}
