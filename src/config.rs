//! Site configuration stored in the per-user config directory

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::runnable::RunnablePolicy;
use crate::symbol_index::{SearchOptions, DEFAULT_MAX_LEN, DEFAULT_RESULT_CAP};

/// Settings an embedding page would otherwise hard-code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_result_cap")]
    pub result_cap: usize,
    #[serde(default = "default_abbreviation_max_len")]
    pub abbreviation_max_len: usize,
    /// Prefix joined to each symbol's path to build result links
    #[serde(default)]
    pub search_root_dir: String,
    #[serde(default = "default_run_endpoint")]
    pub run_endpoint: String,
    /// Modules whose examples are never made runnable
    #[serde(default)]
    pub ignored_modules: Vec<String>,
    /// Replaces the "no output" marker for wrapped unittest examples
    #[serde(default)]
    pub default_output: Option<String>,
    #[serde(default)]
    pub inhibit_quick_index: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            result_cap: default_result_cap(),
            abbreviation_max_len: default_abbreviation_max_len(),
            search_root_dir: String::new(),
            run_endpoint: default_run_endpoint(),
            ignored_modules: Vec::new(),
            default_output: None,
            inhibit_quick_index: false,
        }
    }
}

impl SiteConfig {
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            result_cap: self.result_cap,
            abbreviation_max_len: self.abbreviation_max_len,
        }
    }

    pub fn runnable_policy(&self) -> RunnablePolicy {
        RunnablePolicy::new(self.ignored_modules.clone())
    }
}

fn default_result_cap() -> usize {
    DEFAULT_RESULT_CAP
}

fn default_abbreviation_max_len() -> usize {
    DEFAULT_MAX_LEN
}

fn default_run_endpoint() -> String {
    // Environment (or .env) first, then the site's own relay
    std::env::var("DOCSITE_RUN_ENDPOINT").unwrap_or_else(|_| "http://localhost:8080/process.php".to_string())
}

pub fn default_site_config_path() -> PathBuf {
    let Some(dirs) = ProjectDirs::from("org", "docsite", "docsite") else {
        return Path::new("docsite.json").to_path_buf();
    };
    dirs.config_dir().join("site.json")
}

/// Load the configuration, falling back to defaults when the file is missing
/// or unreadable
pub fn load_site_config(path: &Path) -> SiteConfig {
    let Ok(bytes) = fs::read(path) else {
        return SiteConfig::default();
    };
    match serde_json::from_slice::<SiteConfig>(&bytes) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
            SiteConfig::default()
        }
    }
}

pub fn save_site_config(path: &Path, cfg: &SiteConfig) -> Result<(), ConfigError> {
    let json = serde_json::to_vec_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "saved config");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
