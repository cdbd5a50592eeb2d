use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Type of application events that can be logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    OnboardingStarted,
    OnboardingResumed,
    OnboardingStepChanged,
    OnboardingSkipped,
    SegmentInferred,
    HandoffRedirected,
    HandoffPersisted,
    HandoffFailed,
    OnboardingReset,
    RateLimited,
    AchievementUnlocked,
    BookmarkAdded,
    BookmarkRemoved,
}

/// General-purpose event stored as JSONL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppEvent {
    pub event_id: Uuid,
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub details: serde_json::Value,
}

impl AppEvent {
    pub fn new(event_type: EventType, details: serde_json::Value) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            session_id: None,
            event_type,
            timestamp: Utc::now(),
            details,
        }
    }

    pub fn in_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }
}

/// Append-only JSONL event log.
#[derive(Debug, Clone)]
pub struct EventLog {
    events_path: PathBuf,
}

impl EventLog {
    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            events_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.events_path
    }

    pub fn append(&self, event: &AppEvent) -> Result<()> {
        if let Some(parent) = self.events_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.events_path)
            .with_context(|| format!("Failed to open event log {:?}", self.events_path))?;
        file.write_all(serde_json::to_string(event)?.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }

    /// Appends a new event and returns its id.
    pub fn record(
        &self,
        session_id: Option<Uuid>,
        event_type: EventType,
        details: serde_json::Value,
    ) -> Result<Uuid> {
        let mut event = AppEvent::new(event_type, details);
        event.session_id = session_id;
        self.append(&event)?;
        Ok(event.event_id)
    }

    pub fn load_events(&self) -> Result<Vec<AppEvent>> {
        if !self.events_path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.events_path)?;
        let mut events = Vec::new();
        for line in data.lines().filter(|l| !l.trim().is_empty()) {
            let event: AppEvent = serde_json::from_str(line)
                .with_context(|| format!("Corrupt event line in {:?}", self.events_path))?;
            events.push(event);
        }
        Ok(events)
    }

    pub fn load_events_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<AppEvent>> {
        Ok(self
            .load_events()?
            .into_iter()
            .filter(|event| event.timestamp >= cutoff)
            .collect())
    }

    pub fn events_of(&self, event_type: EventType) -> Result<Vec<AppEvent>> {
        Ok(self
            .load_events()?
            .into_iter()
            .filter(|event| event.event_type == event_type)
            .collect())
    }
}

/// Computes a lowercase hex SHA-256 hash of the provided bytes.
pub fn compute_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{:x}", digest)
}

/// Hash of a value's canonical JSON form.
pub fn fingerprint<T: Serialize>(value: &T) -> Result<String> {
    let payload = serde_json::to_vec(value)?;
    Ok(compute_hash(&payload))
}
