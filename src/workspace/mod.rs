mod config;
pub mod kv;

pub use config::{
    config_file_path, ensure_workspace_structure, load_from, load_or_default, save, save_to,
    workspace_root, AppConfig, GamificationSettings, OnboardingSettings, RateLimitSettings,
    UniversitySettings, WorkspacePaths, CONFIG_FILE_NAME,
};
pub use kv::{read_json, write_json, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
