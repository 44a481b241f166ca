//! Application configuration for the Handelsregister toolkit.
//!
//! User config lives at `~/.handelsregister/handelsregister.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RegisterError, Result};
use crate::types::SearchOption;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "handelsregister.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".handelsregister";

// ---------------------------------------------------------------------------
// Config structs (matching handelsregister.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Search defaults.
    #[serde(default)]
    pub search: SearchDefaults,

    /// Raw result-page cache.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Where saved result pages are read from.
    #[serde(default)]
    pub source: SourceConfig,

    /// Disclosure document handling.
    #[serde(default)]
    pub documents: DocumentsConfig,
}

/// `[search]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchDefaults {
    /// Keyword matching option.
    #[serde(default)]
    pub option: SearchOption,
}

/// `[cache]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding cached result markup.
    #[serde(default = "default_cache_dir")]
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> String {
    "cache".into()
}

/// `[source]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory of result pages saved by the browser driver.
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            pages_dir: default_pages_dir(),
        }
    }
}

fn default_pages_dir() -> String {
    "pages".into()
}

/// `[documents]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// Directory holding downloaded disclosure documents.
    #[serde(default = "default_documents_dir")]
    pub dir: String,

    /// Document type retrieved per company.
    #[serde(default = "default_preferred_type")]
    pub preferred_type: String,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            dir: default_documents_dir(),
            preferred_type: default_preferred_type(),
        }
    }
}

fn default_documents_dir() -> String {
    "documents".into()
}
fn default_preferred_type() -> String {
    "AD".into()
}

// ---------------------------------------------------------------------------
// Search config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime search configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Keyword matching option.
    pub option: SearchOption,
    /// Skip the cache and fetch a fresh result page.
    pub force: bool,
    /// Retrieve and extract one disclosure document per company.
    pub fetch_documents: bool,
    /// Document type code to retrieve (e.g. `AD`).
    pub document_type: String,
    /// Cache directory.
    pub cache_dir: PathBuf,
    /// Saved result pages directory.
    pub pages_dir: PathBuf,
    /// Downloaded documents directory.
    pub documents_dir: PathBuf,
}

impl From<&AppConfig> for SearchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            option: config.search.option,
            force: false,
            fetch_documents: false,
            document_type: config.documents.preferred_type.clone(),
            cache_dir: PathBuf::from(&config.cache.dir),
            pages_dir: PathBuf::from(&config.source.pages_dir),
            documents_dir: PathBuf::from(&config.documents.dir),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.handelsregister/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| RegisterError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.handelsregister/handelsregister.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| RegisterError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        RegisterError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| RegisterError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| RegisterError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| RegisterError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("preferred_type"));
        assert!(toml_str.contains("option = \"all\""));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.documents.preferred_type, "AD");
        assert_eq!(parsed.cache.dir, "cache");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[search]
option = "exact"

[documents]
dir = "/tmp/register-docs"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.search.option, SearchOption::Exact);
        assert_eq!(config.documents.dir, "/tmp/register-docs");
        assert_eq!(config.documents.preferred_type, "AD");
        assert_eq!(config.source.pages_dir, "pages");
    }

    #[test]
    fn unknown_option_is_rejected() {
        let result: std::result::Result<AppConfig, _> =
            toml::from_str("[search]\noption = \"fuzzy\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn search_config_from_app_config() {
        let app = AppConfig::default();
        let search = SearchConfig::from(&app);
        assert_eq!(search.option, SearchOption::All);
        assert!(!search.force);
        assert!(!search.fetch_documents);
        assert_eq!(search.document_type, "AD");
        assert_eq!(search.documents_dir, PathBuf::from("documents"));
    }
}
