use serde::{Deserialize, Serialize};

/// Things the dashboard rewards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Activity {
    OnboardingCompleted,
    ChatMessage,
    UniversitySearch,
    UniversityBookmarked,
    DailyVisit,
}

impl Activity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::OnboardingCompleted => "onboarding-completed",
            Activity::ChatMessage => "chat-message",
            Activity::UniversitySearch => "university-search",
            Activity::UniversityBookmarked => "university-bookmarked",
            Activity::DailyVisit => "daily-visit",
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            Activity::OnboardingCompleted => 50,
            Activity::ChatMessage => 2,
            Activity::UniversitySearch => 1,
            Activity::UniversityBookmarked => 5,
            Activity::DailyVisit => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Count { activity: Activity, at_least: u32 },
    Streak { days: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub requirement: Requirement,
}

const ACHIEVEMENTS: [AchievementDef; 7] = [
    AchievementDef {
        id: "first-steps",
        title: "First Steps",
        description: "Finish the onboarding questionnaire.",
        requirement: Requirement::Count {
            activity: Activity::OnboardingCompleted,
            at_least: 1,
        },
    },
    AchievementDef {
        id: "conversation-starter",
        title: "Conversation Starter",
        description: "Ask the counselor your first question.",
        requirement: Requirement::Count {
            activity: Activity::ChatMessage,
            at_least: 1,
        },
    },
    AchievementDef {
        id: "curious-mind",
        title: "Curious Mind",
        description: "Send 25 messages to the counselor.",
        requirement: Requirement::Count {
            activity: Activity::ChatMessage,
            at_least: 25,
        },
    },
    AchievementDef {
        id: "explorer",
        title: "Explorer",
        description: "Run 10 university searches.",
        requirement: Requirement::Count {
            activity: Activity::UniversitySearch,
            at_least: 10,
        },
    },
    AchievementDef {
        id: "first-pick",
        title: "First Pick",
        description: "Bookmark a university.",
        requirement: Requirement::Count {
            activity: Activity::UniversityBookmarked,
            at_least: 1,
        },
    },
    AchievementDef {
        id: "shortlister",
        title: "Shortlister",
        description: "Bookmark five universities.",
        requirement: Requirement::Count {
            activity: Activity::UniversityBookmarked,
            at_least: 5,
        },
    },
    AchievementDef {
        id: "regular",
        title: "Regular",
        description: "Visit three days in a row.",
        requirement: Requirement::Streak { days: 3 },
    },
];

pub fn achievement_catalog() -> &'static [AchievementDef] {
    &ACHIEVEMENTS
}

pub fn find_achievement(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}
