//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgmap/orgmap.toml`
//! 3. Local config: `<data_dir>/.orgmap.toml`
//! 4. Environment variables: `ORGMAP_*` prefix (`__` separates sections)
//!
//! The data directory itself is resolved before the local config is read:
//! command line, then `ORGMAP_DATA_DIR`, then global config, then default.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::viewport::CanvasConfig;
use crate::application::ApplicationError;
use crate::domain::{LayoutConfig, OrphanPolicy, Position};

/// File name of the per-data-directory config.
pub const LOCAL_CONFIG_FILE: &str = ".orgmap.toml";

/// Company search endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    /// URL receiving `POST {query, max_results}`
    pub endpoint: String,
    pub max_results: usize,
    /// Topic words appended to every company name
    pub query_suffix: String,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/perplexity/search".into(),
            max_results: 5,
            query_suffix: "医疗行业 组织架构 岗位体系".into(),
            timeout_secs: 30,
        }
    }
}

/// Raw layout config for intermediate parsing (all fields optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutConfig {
    pub center: Option<Position>,
    pub radii: Option<Vec<f64>>,
    pub angular_offset: Option<f64>,
    pub orphan_policy: Option<OrphanPolicy>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSearchConfig {
    pub endpoint: Option<String>,
    pub max_results: Option<usize>,
    pub query_suffix: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawCanvasConfig {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub padding: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub layout: RawLayoutConfig,
    pub search: RawSearchConfig,
    pub viewport: RawCanvasConfig,
}

/// Unified configuration for orgmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding company files (default: ~/.orgmap/companies)
    pub data_dir: PathBuf,
    pub layout: LayoutConfig,
    pub search: SearchConfig,
    pub viewport: CanvasConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            layout: LayoutConfig::default(),
            search: SearchConfig::default(),
            viewport: CanvasConfig::default(),
        }
    }
}

/// Get the default data directory (~/.orgmap/companies).
fn default_data_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".orgmap").join("companies"))
        .unwrap_or_else(|| PathBuf::from("~/.orgmap/companies"))
}

/// Get the XDG config directory for orgmap.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgmap").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgmap.toml"))
}

/// Get the path to the local config file in a data directory.
pub fn local_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOCAL_CONFIG_FILE)
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base).
    ///
    /// Scalars and arrays alike: overlay wins if specified, otherwise keep base.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let layout = &overlay.layout;
        let search = &overlay.search;
        let viewport = &overlay.viewport;
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            layout: LayoutConfig {
                center: layout.center.unwrap_or(self.layout.center),
                radii: layout
                    .radii
                    .clone()
                    .unwrap_or_else(|| self.layout.radii.clone()),
                angular_offset: layout.angular_offset.unwrap_or(self.layout.angular_offset),
                orphan_policy: layout.orphan_policy.unwrap_or(self.layout.orphan_policy),
            },
            search: SearchConfig {
                endpoint: search
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| self.search.endpoint.clone()),
                max_results: search.max_results.unwrap_or(self.search.max_results),
                query_suffix: search
                    .query_suffix
                    .clone()
                    .unwrap_or_else(|| self.search.query_suffix.clone()),
                timeout_secs: search.timeout_secs.unwrap_or(self.search.timeout_secs),
            },
            viewport: CanvasConfig {
                width: viewport.width.unwrap_or(self.viewport.width),
                height: viewport.height.unwrap_or(self.viewport.height),
                padding: viewport.padding.unwrap_or(self.viewport.padding),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `data_dir` - Optional data directory from the command line
    pub fn load(data_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        let env = Self::env_config()?;

        // Resolve data_dir before looking for the local config
        if let Ok(val) = env.get_string("data_dir") {
            current.data_dir = PathBuf::from(val);
        }
        if let Some(dir) = data_dir {
            current.data_dir = dir.to_path_buf();
        }
        current.data_dir = expand_path(&current.data_dir);

        // 3. Local config (cannot move the data directory it lives in)
        let local_path = local_config_path(&current.data_dir);
        if local_path.exists() {
            let mut raw = load_raw_settings(&local_path)?;
            raw.data_dir = None;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current, &env)?;

        current.layout.validate()?;
        current.viewport.validate()?;
        Ok(current)
    }

    /// `ORGMAP_LAYOUT__ORPHAN_POLICY=drop` maps to `layout.orphan_policy`.
    fn environment() -> Environment {
        Environment::with_prefix("ORGMAP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("layout.radii")
    }

    fn env_config() -> Result<Config, ApplicationError> {
        Config::builder()
            .add_source(Self::environment())
            .build()
            .map_err(config_err)
    }

    /// Apply ORGMAP_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, env: &Config) -> Result<Self, ApplicationError> {
        if let Ok(val) = env.get::<Vec<f64>>("layout.radii") {
            settings.layout.radii = val;
        }
        if let Ok(val) = env.get_float("layout.angular_offset") {
            settings.layout.angular_offset = val;
        }
        if let Ok(val) = env.get_string("layout.orphan_policy") {
            settings.layout.orphan_policy = val.parse()?;
        }
        if let Ok(val) = env.get_float("layout.center.x") {
            settings.layout.center.x = val;
        }
        if let Ok(val) = env.get_float("layout.center.y") {
            settings.layout.center.y = val;
        }
        if let Ok(val) = env.get_string("search.endpoint") {
            settings.search.endpoint = val;
        }
        if let Ok(val) = env.get::<usize>("search.max_results") {
            settings.search.max_results = val;
        }
        if let Ok(val) = env.get_string("search.query_suffix") {
            settings.search.query_suffix = val;
        }
        if let Ok(val) = env.get::<u64>("search.timeout_secs") {
            settings.search.timeout_secs = val;
        }
        if let Ok(val) = env.get_float("viewport.width") {
            settings.viewport.width = val;
        }
        if let Ok(val) = env.get_float("viewport.height") {
            settings.viewport.height = val;
        }
        if let Ok(val) = env.get_float("viewport.padding") {
            settings.viewport.padding = val;
        }
        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# orgmap configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/orgmap/orgmap.toml
#   Local:  <data_dir>/.orgmap.toml
#   Env:    ORGMAP_* environment variables, e.g. ORGMAP_LAYOUT__ORPHAN_POLICY=drop

# Directory with <company>.json / <company>.toml files
# data_dir = "~/.orgmap/companies"

[layout]
# Position of the root node
# center = { x = 400.0, y = 300.0 }

# Ring radius per depth (governance, subunit, role, ...)
# radii = [250.0, 200.0, 150.0, 100.0]

# Angular shift in radians applied per depth
# angular_offset = 0.25

# Retained node whose parent is filtered out: "reparent" or "drop"
# orphan_policy = "reparent"

[search]
# endpoint = "http://localhost:3000/api/perplexity/search"
# max_results = 5
# query_suffix = "..."
# timeout_secs = 30

[viewport]
# width = 1200.0
# height = 800.0
# padding = 50.0
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
