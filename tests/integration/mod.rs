use abroadpath::workspace::{AppConfig, WorkspacePaths};
use abroadpath::StudyApp;
use std::path::Path;
use tempfile::TempDir;

pub struct IntegrationHarness {
    workspace: TempDir,
}

impl IntegrationHarness {
    pub fn new() -> Self {
        let workspace = TempDir::new().expect("failed to create temp workspace");
        Self { workspace }
    }

    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }

    pub fn paths(&self) -> WorkspacePaths {
        WorkspacePaths::at(self.workspace.path().to_path_buf())
    }

    pub fn app(&self) -> StudyApp {
        self.app_with(AppConfig::default())
    }

    pub fn app_with(&self, config: AppConfig) -> StudyApp {
        StudyApp::with_config(self.paths(), config)
            .expect("failed to initialize StudyApp for tests")
    }
}

mod dashboard_bookmarks;
mod onboarding_bachelor;
mod onboarding_handoff;
mod onboarding_master;
mod onboarding_resume;
mod rate_limits;
pub mod support;
