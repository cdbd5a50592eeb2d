//! Mirrors wizard progress to the local key-value store so a reload resumes
//! mid-wizard.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workspace::{read_json, write_json, KeyValueStore};

use super::answers::AnswerSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub answers: AnswerSet,
    pub step_index: usize,
    #[serde(default)]
    pub is_completed: bool,
    /// Identity that owned the wizard when the snapshot was written.
    #[serde(default)]
    pub owner: Option<String>,
    pub saved_at: DateTime<Utc>,
}

impl ProgressSnapshot {
    pub fn new(answers: AnswerSet, step_index: usize, owner: Option<String>) -> Self {
        Self {
            answers,
            step_index,
            is_completed: false,
            owner,
            saved_at: Utc::now(),
        }
    }

    pub fn belongs_to(&self, owner: Option<&str>) -> bool {
        self.owner.as_deref() == owner
    }
}

/// Reads and writes the snapshot under a single key.
#[derive(Debug, Clone)]
pub struct ProgressMirror {
    key: String,
}

impl ProgressMirror {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn load(&self, store: &dyn KeyValueStore) -> Result<Option<ProgressSnapshot>> {
        read_json(store, &self.key)
    }

    pub fn save(&self, store: &mut dyn KeyValueStore, snapshot: &ProgressSnapshot) -> Result<()> {
        write_json(store, &self.key, snapshot)
    }

    pub fn clear(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        store.remove(&self.key)
    }
}
