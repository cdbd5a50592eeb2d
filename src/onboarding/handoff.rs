//! Completion handoff: turns finished answers into either a signup redirect
//! or a profile sync against an existing identity.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::workspace::OnboardingSettings;

use super::answers::AnswerSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }
}

/// Auth/database backend. Retries, if any, live behind this trait.
pub trait IdentityProvider {
    fn current_identity(&self) -> Option<Identity>;
    fn create_identity(&mut self, fields: &BTreeMap<String, String>) -> Result<Identity>;
    fn persist_onboarding_answers(&mut self, identity_id: &str, answers: &AnswerSet) -> Result<()>;
}

pub trait Navigator {
    fn navigate_to(&mut self, path: &str, query: &[(String, String)]) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HandoffOutcome {
    RedirectedToSignup {
        path: String,
        query: Vec<(String, String)>,
    },
    Persisted {
        identity_id: String,
        redirect: String,
    },
}

/// Query parameters carried to the signup page.
pub fn signup_query(answers: &AnswerSet) -> Vec<(String, String)> {
    let mut query = Vec::new();
    if let Some(country) = &answers.country {
        query.push(("country".to_string(), country.clone()));
    }
    if let Some(field) = &answers.field_of_study {
        query.push(("field".to_string(), field.clone()));
    }
    if let Some(budget) = answers.budget_label() {
        query.push(("budget".to_string(), budget));
    }
    query
}

/// Performs the single terminal transition. `answers` must already carry
/// its segment.
pub fn hand_off(
    answers: &AnswerSet,
    provider: &mut dyn IdentityProvider,
    navigator: &mut dyn Navigator,
    routes: &OnboardingSettings,
) -> Result<HandoffOutcome> {
    let payload = answers.normalized();
    match provider.current_identity() {
        None => {
            let query = signup_query(&payload);
            navigator
                .navigate_to(&routes.signup_path, &query)
                .context("Failed to open signup")?;
            Ok(HandoffOutcome::RedirectedToSignup {
                path: routes.signup_path.clone(),
                query,
            })
        }
        Some(identity) => {
            provider
                .persist_onboarding_answers(&identity.id, &payload)
                .with_context(|| format!("Failed to save onboarding answers for {}", identity.id))?;
            navigator
                .navigate_to(&routes.dashboard_path, &[])
                .context("Failed to open dashboard")?;
            Ok(HandoffOutcome::Persisted {
                identity_id: identity.id,
                redirect: routes.dashboard_path.clone(),
            })
        }
    }
}

/// Signup landing: creates the identity from the parameters the redirect
/// carried (plus whatever the signup form adds, e.g. email).
pub fn create_identity_from_signup(
    provider: &mut dyn IdentityProvider,
    query: &[(String, String)],
    extra: &[(String, String)],
) -> Result<Identity> {
    let fields: BTreeMap<String, String> = query
        .iter()
        .chain(extra.iter())
        .filter(|(_, value)| !value.trim().is_empty())
        .cloned()
        .collect();
    provider
        .create_identity(&fields)
        .context("Failed to create account")
}
