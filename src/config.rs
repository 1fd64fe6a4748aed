//! Configuration file handling for pocket.
//!
//! The configuration file is stored at `$POCKET_HOME/config.json`. It holds the settings that are
//! not part of the ledger itself: the currency label used in reports and how to reach the
//! Telegram Bot API.

use crate::error::{ErrorType, IntoResult, Res};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "pocket";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const STORE: &str = "store";
const DEFAULT_CURRENCY: &str = "UAH";
const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$POCKET_HOME` and from there it loads `$POCKET_HOME/config.json`. It also knows
/// where the key-value store lives inside the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    store: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory, the store directory and an initial `config.json` with default
    /// settings.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/pocket`
    ///
    /// # Errors
    /// - Returns an error if any file operations fail or if a config file already exists.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::create_home(dir.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn create_home(maybe_relative: PathBuf) -> Res<Self> {
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the pocket home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            )
        }

        let store = root.join(STORE);
        utils::make_dir(&store).await?;

        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            store,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `pocket_home` and its config file exist
    /// - load and validate the config file
    /// - validate that the store directory exists
    pub async fn load(pocket_home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_home(pocket_home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_home(maybe_relative: PathBuf) -> Res<Self> {
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Pocket home is missing, run `pocket init` first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let store = root.join(STORE);
        if !store.is_dir() {
            bail!("The store directory is missing '{}'", store.display())
        }

        Ok(Self {
            root,
            store,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The directory holding one `<key>.json` file per store key.
    pub fn store_dir(&self) -> &Path {
        &self.store
    }

    /// The label printed after amounts, e.g. `UAH`.
    pub fn currency(&self) -> &str {
        &self.config_file.currency
    }

    pub fn telegram_api_url(&self) -> &str {
        &self.config_file.telegram_api_url
    }

    /// The HTTP timeout for notifications, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.config_file
            .request_timeout_secs
            .map(Duration::from_secs)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "pocket",
///   "config_version": 1,
///   "currency": "UAH",
///   "telegram_api_url": "https://api.telegram.org",
///   "request_timeout_secs": 10
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "pocket"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Currency label printed after amounts
    #[serde(default = "default_currency")]
    currency: String,

    /// Base URL of the Telegram Bot API
    #[serde(default = "default_telegram_api_url")]
    telegram_api_url: String,

    /// Timeout for a single notification request. The HTTP client default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_timeout_secs: Option<u64>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_telegram_api_url() -> String {
    DEFAULT_TELEGRAM_API_URL.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            currency: default_currency(),
            telegram_api_url: default_telegram_api_url(),
            request_timeout_secs: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path and checks its `app_name`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let content = utils::read(path)
            .await
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path.as_ref(), data)
            .await
            .context("Unable to write config file")
    }
}
