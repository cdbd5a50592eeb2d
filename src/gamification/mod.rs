//! Local counters, points and achievements shown on the dashboard.

pub mod achievements;

pub use achievements::{
    achievement_catalog, find_achievement, AchievementDef, Activity, Requirement,
};

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workspace::{read_json, write_json, GamificationSettings, KeyValueStore};

pub const GAMIFICATION_KEY: &str = "gamification";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamificationState {
    #[serde(default)]
    pub counters: BTreeMap<String, u32>,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub unlocked: BTreeSet<String>,
    #[serde(default)]
    pub streak_days: u32,
    #[serde(default)]
    pub last_visit: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct AchievementTracker {
    state: GamificationState,
    points_per_level: u32,
}

impl AchievementTracker {
    pub fn new(settings: &GamificationSettings) -> Self {
        Self {
            state: GamificationState::default(),
            points_per_level: settings.points_per_level.max(1),
        }
    }

    pub fn load(settings: &GamificationSettings, store: &dyn KeyValueStore) -> Result<Self> {
        let mut tracker = Self::new(settings);
        tracker.state = read_json(store, GAMIFICATION_KEY)?.unwrap_or_default();
        Ok(tracker)
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        write_json(store, GAMIFICATION_KEY, &self.state)
    }

    pub fn state(&self) -> &GamificationState {
        &self.state
    }

    pub fn count(&self, activity: Activity) -> u32 {
        self.state
            .counters
            .get(activity.as_str())
            .copied()
            .unwrap_or(0)
    }

    pub fn points(&self) -> u32 {
        self.state.points
    }

    pub fn level(&self) -> u32 {
        self.state.points / self.points_per_level + 1
    }

    pub fn streak_days(&self) -> u32 {
        self.state.streak_days
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.state.unlocked.contains(id)
    }

    pub fn unlocked(&self) -> Vec<&'static AchievementDef> {
        achievement_catalog()
            .iter()
            .filter(|a| self.state.unlocked.contains(a.id))
            .collect()
    }

    /// Counts one occurrence and returns achievements unlocked by it. A
    /// second daily visit on the same day is ignored.
    pub fn record(
        &mut self,
        activity: Activity,
        now: DateTime<Utc>,
    ) -> Vec<&'static AchievementDef> {
        if activity == Activity::DailyVisit && !self.register_visit(now.date_naive()) {
            return Vec::new();
        }
        *self
            .state
            .counters
            .entry(activity.as_str().to_string())
            .or_insert(0) += 1;
        self.state.points = self.state.points.saturating_add(activity.points());

        let mut newly = Vec::new();
        for achievement in achievement_catalog() {
            if self.state.unlocked.contains(achievement.id) {
                continue;
            }
            if self.satisfies(&achievement.requirement) {
                self.state.unlocked.insert(achievement.id.to_string());
                newly.push(achievement);
            }
        }
        newly
    }

    fn register_visit(&mut self, today: NaiveDate) -> bool {
        match self.state.last_visit {
            Some(last) if last == today => return false,
            Some(last) if last.succ_opt() == Some(today) => self.state.streak_days += 1,
            _ => self.state.streak_days = 1,
        }
        self.state.last_visit = Some(today);
        true
    }

    fn satisfies(&self, requirement: &Requirement) -> bool {
        match requirement {
            Requirement::Count { activity, at_least } => self.count(*activity) >= *at_least,
            Requirement::Streak { days } => self.state.streak_days >= *days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::MemoryKeyValueStore;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, 9, 0, 0).unwrap()
    }

    #[test]
    fn unlocks_fire_once() {
        let mut tracker = AchievementTracker::new(&GamificationSettings::default());
        let first = tracker.record(Activity::OnboardingCompleted, day(1));
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, "first-steps");
        assert!(tracker
            .record(Activity::OnboardingCompleted, day(1))
            .is_empty());
        assert_eq!(tracker.count(Activity::OnboardingCompleted), 2);
        assert_eq!(tracker.points(), 100);
        assert_eq!(tracker.level(), 2);
    }

    #[test]
    fn shortlist_needs_five_bookmarks() {
        let mut tracker = AchievementTracker::new(&GamificationSettings::default());
        let mut unlocked = Vec::new();
        for _ in 0..5 {
            unlocked.extend(
                tracker
                    .record(Activity::UniversityBookmarked, day(2))
                    .into_iter()
                    .map(|a| a.id),
            );
        }
        assert_eq!(unlocked, vec!["first-pick", "shortlister"]);
    }

    #[test]
    fn streak_counts_consecutive_days_only() {
        let mut tracker = AchievementTracker::new(&GamificationSettings::default());
        tracker.record(Activity::DailyVisit, day(1));
        assert!(tracker.record(Activity::DailyVisit, day(1)).is_empty());
        assert_eq!(tracker.count(Activity::DailyVisit), 1);
        tracker.record(Activity::DailyVisit, day(2));
        let unlocked = tracker.record(Activity::DailyVisit, day(3));
        assert_eq!(tracker.streak_days(), 3);
        assert!(unlocked.iter().any(|a| a.id == "regular"));

        tracker.record(Activity::DailyVisit, day(6));
        assert_eq!(tracker.streak_days(), 1);
        assert!(tracker.is_unlocked("regular"));
    }

    #[test]
    fn progress_persists() {
        let mut kv = MemoryKeyValueStore::new();
        let settings = GamificationSettings::default();
        let mut tracker = AchievementTracker::new(&settings);
        tracker.record(Activity::ChatMessage, day(4));
        tracker.save(&mut kv).unwrap();

        let reloaded = AchievementTracker::load(&settings, &kv).unwrap();
        assert_eq!(reloaded.count(Activity::ChatMessage), 1);
        assert_eq!(reloaded.unlocked().len(), 1);
        assert_eq!(reloaded.unlocked()[0].id, "conversation-starter");
    }
}
