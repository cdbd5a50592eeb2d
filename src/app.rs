use crate::events::{EventLog, EventType};
use crate::gamification::{AchievementDef, AchievementTracker, Activity};
use crate::onboarding::{
    HandoffOutcome, Identity, IdentityProvider, Navigator, OnboardingSession,
};
use crate::ratelimit::{RateLimitDecision, RateLimiter};
use crate::universities::{search, BookmarkStore, University, UniversityCatalog, UniversityQuery};
use crate::workspace::{
    ensure_workspace_structure, load_or_default, AppConfig, FileKeyValueStore, WorkspacePaths,
};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde_json::json;

/// Outbound action name guarded before syncing answers to an identity.
pub const PROFILE_SYNC_ACTION: &str = "profile-sync";

/// Lightweight facade wiring config, local storage, the event log and the
/// university catalog.
pub struct StudyApp {
    config: AppConfig,
    paths: WorkspacePaths,
    storage: FileKeyValueStore,
    log: EventLog,
    catalog: UniversityCatalog,
}

impl StudyApp {
    pub fn new() -> Result<Self> {
        let paths = ensure_workspace_structure()?;
        let config = load_or_default()?;
        Self::with_config(paths, config)
    }

    pub fn with_config(paths: WorkspacePaths, config: AppConfig) -> Result<Self> {
        let catalog = UniversityCatalog::from_settings(&config.universities)
            .context("Failed to load university catalog")?;
        Ok(Self {
            storage: FileKeyValueStore::new(&paths.storage_dir),
            log: EventLog::at(paths.events_log()),
            config,
            paths,
            catalog,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn paths(&self) -> &WorkspacePaths {
        &self.paths
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn catalog(&self) -> &UniversityCatalog {
        &self.catalog
    }

    /// Opens (or resumes) the onboarding wizard for `identity`.
    pub fn onboarding(&mut self, identity: Option<&Identity>) -> Result<OnboardingSession<'_>> {
        OnboardingSession::open(
            &mut self.storage,
            self.config.onboarding.clone(),
            identity,
            Some(self.log.clone()),
        )
    }

    /// Finishes the mirrored wizard run, which must be on `ready`. Signed-in
    /// users are then subject to the profile-sync cooldown. Completion feeds
    /// the achievement tracker.
    pub fn complete_onboarding(
        &mut self,
        provider: &mut dyn IdentityProvider,
        navigator: &mut dyn Navigator,
        now: DateTime<Utc>,
    ) -> Result<HandoffOutcome> {
        let identity = provider.current_identity();
        let on_ready = OnboardingSession::saved_progress(
            &self.storage,
            &self.config.onboarding,
            identity.as_ref(),
        )
        .map(|store| store.is_on_ready())
        .unwrap_or(false);
        if !on_ready {
            bail!("Onboarding can only be completed from the ready step");
        }
        if identity.is_some() {
            let decision = self.guard_outbound(PROFILE_SYNC_ACTION, now)?;
            if let RateLimitDecision::CoolingDown { .. } = decision {
                bail!(
                    "Please wait {} seconds before saving your answers again",
                    decision.remaining_secs()
                );
            }
        }
        let outcome = {
            let mut session = self.onboarding(identity.as_ref())?;
            session.complete(provider, navigator)?
        };
        self.record_activity(Activity::OnboardingCompleted, now)?;
        Ok(outcome)
    }

    /// Applies the cooldown for `action` and persists the limiter.
    pub fn guard_outbound(
        &mut self,
        action: &str,
        now: DateTime<Utc>,
    ) -> Result<RateLimitDecision> {
        let mut limiter = RateLimiter::load(self.config.rate_limits.clone(), &self.storage)?;
        let decision = limiter.try_acquire(action, now);
        limiter.save(&mut self.storage)?;
        if !decision.is_allowed() {
            self.log.record(
                None,
                EventType::RateLimited,
                json!({ "action": action, "remaining_secs": decision.remaining_secs() }),
            )?;
        }
        Ok(decision)
    }

    pub fn achievements(&self) -> Result<AchievementTracker> {
        AchievementTracker::load(&self.config.gamification, &self.storage)
    }

    pub fn record_activity(
        &mut self,
        activity: Activity,
        now: DateTime<Utc>,
    ) -> Result<Vec<&'static AchievementDef>> {
        let mut tracker = self.achievements()?;
        let unlocked = tracker.record(activity, now);
        tracker.save(&mut self.storage)?;
        for achievement in &unlocked {
            self.log.record(
                None,
                EventType::AchievementUnlocked,
                json!({ "achievement": achievement.id, "activity": activity.as_str() }),
            )?;
        }
        Ok(unlocked)
    }

    pub fn search_universities(
        &mut self,
        query: &UniversityQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<University>> {
        let hits: Vec<University> = search(&self.catalog, query).into_iter().cloned().collect();
        self.record_activity(Activity::UniversitySearch, now)?;
        Ok(hits)
    }

    /// Returns whether the university is bookmarked afterwards.
    pub fn toggle_bookmark(
        &mut self,
        identity: Option<&Identity>,
        university_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        if self.catalog.get(university_id).is_none() {
            bail!("Unknown university '{university_id}'");
        }
        let owner = identity.map(|i| i.id.as_str());
        let mut bookmarks = BookmarkStore::load(&self.storage, owner)?;
        let bookmarked = bookmarks.toggle(university_id);
        bookmarks.save(&mut self.storage)?;
        let event = if bookmarked {
            EventType::BookmarkAdded
        } else {
            EventType::BookmarkRemoved
        };
        self.log.record(
            None,
            event,
            json!({ "university": university_id, "owner": owner }),
        )?;
        if bookmarked {
            self.record_activity(Activity::UniversityBookmarked, now)?;
        }
        Ok(bookmarked)
    }

    /// Bookmarked universities in the order they were added. Entries no
    /// longer in the catalog are skipped.
    pub fn bookmarks(&self, identity: Option<&Identity>) -> Result<Vec<University>> {
        let owner = identity.map(|i| i.id.as_str());
        let bookmarks = BookmarkStore::load(&self.storage, owner)?;
        Ok(bookmarks
            .list()
            .iter()
            .filter_map(|id| self.catalog.get(id).cloned())
            .collect())
    }
}
