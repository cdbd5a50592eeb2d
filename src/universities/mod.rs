//! University search and bookmarking.

pub mod bookmarks;
pub mod catalog;

pub use bookmarks::BookmarkStore;
pub use catalog::UniversityCatalog;

use serde::{Deserialize, Serialize};

use crate::onboarding::{AnswerSet, Destination};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct University {
    pub id: String,
    pub name: String,
    pub country: Destination,
    pub city: String,
    /// Field-of-study codes offered, matching onboarding answers.
    #[serde(default)]
    pub programs: Vec<String>,
    pub annual_tuition_usd: u32,
    #[serde(default)]
    pub ranking: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversityQuery {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub destination: Option<Destination>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub max_tuition: Option<u32>,
}

impl UniversityQuery {
    /// Pre-fills filters from onboarding answers; budget caps tuition.
    pub fn from_answers(answers: &AnswerSet) -> Self {
        Self {
            text: None,
            destination: answers.destination,
            field: answers.field_of_study.clone(),
            max_tuition: answers.budget.map(|b| b.amount()),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn matches(&self, university: &University) -> bool {
        if let Some(text) = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let needle = text.to_lowercase();
            let hit = university.name.to_lowercase().contains(&needle)
                || university.city.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        if let Some(destination) = self.destination {
            if university.country != destination {
                return false;
            }
        }
        if let Some(field) = &self.field {
            if !university.programs.iter().any(|p| p.eq_ignore_ascii_case(field)) {
                return false;
            }
        }
        if let Some(max) = self.max_tuition {
            if university.annual_tuition_usd > max {
                return false;
            }
        }
        true
    }
}

/// Filters the catalog and orders by ranking (unranked last), then name.
pub fn search<'a>(catalog: &'a UniversityCatalog, query: &UniversityQuery) -> Vec<&'a University> {
    let mut hits: Vec<&University> = catalog.all().iter().filter(|u| query.matches(u)).collect();
    hits.sort_by(|a, b| {
        let rank_a = a.ranking.unwrap_or(u32::MAX);
        let rank_b = b.ranking.unwrap_or(u32::MAX);
        rank_a.cmp(&rank_b).then_with(|| a.name.cmp(&b.name))
    });
    hits
}
