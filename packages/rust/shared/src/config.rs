//! Application configuration.
//!
//! User config lives at `~/.occupancy/occupancy.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{OccupancyError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "occupancy.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".occupancy";

// ---------------------------------------------------------------------------
// Config structs (matching occupancy.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// VPIS endpoint settings.
    #[serde(default)]
    pub vpis: VpisSection,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Location alias used when a command is given none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// `[vpis]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VpisSection {
    /// Scheme and host of the VPIS installation.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the XML control document.
    #[serde(default = "default_control_path")]
    pub control_path: String,

    /// Path of the HTML course listing; `;SEMESTER;` is replaced by the term token.
    #[serde(default = "default_courses_path")]
    pub courses_path: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum redirects followed per request.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for VpisSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            control_path: default_control_path(),
            courses_path: default_courses_path(),
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_base_url() -> String {
    "https://vpis.fh-swf.de".into()
}
fn default_control_path() -> String {
    "/vpisapp.php".into()
}
fn default_courses_path() -> String {
    "/;SEMESTER;/faecherangebotplanung.php3".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_max_redirects() -> usize {
    5
}

// ---------------------------------------------------------------------------
// VPIS config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime VPIS configuration.
#[derive(Debug, Clone)]
pub struct VpisConfig {
    /// Scheme and host, without trailing slash.
    pub base_url: String,
    pub control_path: String,
    pub courses_path: String,
    pub timeout_secs: u64,
    pub max_redirects: usize,
}

impl VpisConfig {
    /// Full URL of the control document.
    pub fn control_url(&self) -> String {
        format!("{}{}", self.base_url, self.control_path)
    }

    /// Runtime config pointing at another host (mock servers, staging).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Default for VpisConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for VpisConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.vpis.base_url.trim_end_matches('/').to_string(),
            control_path: config.vpis.control_path.clone(),
            courses_path: config.vpis.courses_path.clone(),
            timeout_secs: config.vpis.timeout_secs,
            max_redirects: config.vpis.max_redirects,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.occupancy/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| OccupancyError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.occupancy/occupancy.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| OccupancyError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| OccupancyError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| OccupancyError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| OccupancyError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| OccupancyError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
