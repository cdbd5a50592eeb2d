//! Configuration primitives for an AbroadPath install.
//!
//! Stored in a machine-readable TOML file located at:
//!   %APPDATA%/AbroadPath/config/config.toml on Windows
//!   $XDG_DATA_HOME/AbroadPath/config/config.toml on Linux
//!   ~/Library/Application Support/AbroadPath/config/config.toml on macOS
//!
//! The config tracks onboarding handoff routes, outbound cooldowns and the
//! gamification scale. `ABROADPATH_HOME` overrides the root for tests and
//! portable installs.

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Root configuration persisted per installation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Onboarding wizard persistence and handoff routes.
    #[serde(default)]
    pub onboarding: OnboardingSettings,
    /// Cooldowns applied to outbound calls (chat, webhooks, profile sync).
    #[serde(default)]
    pub rate_limits: RateLimitSettings,
    /// Points scale for the achievement tracker.
    #[serde(default)]
    pub gamification: GamificationSettings,
    /// University catalog location.
    #[serde(default)]
    pub universities: UniversitySettings,
}

/// Onboarding-related preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingSettings {
    /// Whether in-progress answers are mirrored to local storage.
    #[serde(default = "default_persist_progress")]
    pub persist_progress: bool,
    /// Key used for the progress mirror in the key-value store.
    #[serde(default = "default_progress_key")]
    pub progress_key: String,
    /// Route used when the user has no identity yet.
    #[serde(default = "default_signup_path")]
    pub signup_path: String,
    /// Route opened after answers are synced to an existing identity.
    #[serde(default = "default_dashboard_path")]
    pub dashboard_path: String,
}

impl Default for OnboardingSettings {
    fn default() -> Self {
        Self {
            persist_progress: default_persist_progress(),
            progress_key: default_progress_key(),
            signup_path: default_signup_path(),
            dashboard_path: default_dashboard_path(),
        }
    }
}

const fn default_persist_progress() -> bool {
    true
}

fn default_progress_key() -> String {
    "onboarding-progress".into()
}

fn default_signup_path() -> String {
    "/signup".into()
}

fn default_dashboard_path() -> String {
    "/dashboard".into()
}

/// Per-action cooldowns for outbound calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Cooldown applied to actions without an explicit override.
    #[serde(default = "default_cooldown_secs")]
    pub default_cooldown_secs: u64,
    /// Overrides keyed by action name.
    #[serde(default = "default_cooldowns")]
    pub cooldowns: BTreeMap<String, u64>,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            default_cooldown_secs: default_cooldown_secs(),
            cooldowns: default_cooldowns(),
        }
    }
}

impl RateLimitSettings {
    pub fn cooldown_for(&self, action: &str) -> u64 {
        self.cooldowns
            .get(action)
            .copied()
            .unwrap_or(self.default_cooldown_secs)
    }
}

const fn default_cooldown_secs() -> u64 {
    30
}

fn default_cooldowns() -> BTreeMap<String, u64> {
    let mut map = BTreeMap::new();
    map.insert("chat".to_string(), 5);
    map.insert("workflow-webhook".to_string(), 60);
    map.insert("profile-sync".to_string(), 10);
    map
}

/// Gamification tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamificationSettings {
    #[serde(default = "default_points_per_level")]
    pub points_per_level: u32,
}

impl Default for GamificationSettings {
    fn default() -> Self {
        Self {
            points_per_level: default_points_per_level(),
        }
    }
}

const fn default_points_per_level() -> u32 {
    100
}

/// Where university catalog YAML files live. `None` uses the built-in list.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UniversitySettings {
    #[serde(default)]
    pub catalog_dir: Option<PathBuf>,
}

/// Standard relative path to the config file (resolved per OS at runtime).
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Workspace root: `ABROADPATH_HOME` when set and non-empty, otherwise
/// `AbroadPath` under the OS data directory.
pub fn workspace_root() -> Result<PathBuf> {
    match env::var_os("ABROADPATH_HOME").filter(|home| !home.is_empty()) {
        Some(home) => Ok(PathBuf::from(home)),
        None => BaseDirs::new()
            .map(|dirs| dirs.data_dir().join("AbroadPath"))
            .context("No OS data directory for the AbroadPath workspace"),
    }
}

pub fn config_dir() -> Result<PathBuf> {
    workspace_root().map(|root| root.join("config"))
}

pub fn config_file_path() -> Result<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

pub fn load_or_default() -> Result<AppConfig> {
    load_from(&config_file_path()?)
}

pub fn save(config: &AppConfig) -> Result<()> {
    save_to(config, &config_file_path()?)
}

/// A missing file yields the defaults.
pub fn load_from(path: &Path) -> Result<AppConfig> {
    let Some(raw) = read_optional(path)? else {
        return Ok(AppConfig::default());
    };
    toml::from_str(&raw).with_context(|| format!("Config file {:?} is not valid TOML", path))
}

pub fn save_to(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create config directory {:?}", parent))?;
    }
    let rendered = toml::to_string_pretty(config).context("Cannot render config as TOML")?;
    fs::write(path, rendered).with_context(|| format!("Cannot write config file {:?}", path))
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("Cannot read config file {:?}", path)),
    }
}

/// Ensures the workspace structure exists (storage/ and logs/ directories).
pub fn ensure_workspace_structure() -> Result<WorkspacePaths> {
    let root = workspace_root()?;
    let paths = WorkspacePaths::at(root);
    fs::create_dir_all(&paths.storage_dir)?;
    fs::create_dir_all(&paths.logs_dir)?;
    Ok(paths)
}

/// Convenience struct exposing important workspace paths.
#[derive(Debug, Clone)]
pub struct WorkspacePaths {
    pub root: PathBuf,
    pub storage_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl WorkspacePaths {
    pub fn at(root: PathBuf) -> Self {
        Self {
            storage_dir: root.join("storage"),
            logs_dir: root.join("logs"),
            root,
        }
    }

    pub fn events_log(&self) -> PathBuf {
        self.logs_dir.join("events.jsonl")
    }
}
