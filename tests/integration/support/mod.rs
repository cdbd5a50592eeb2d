use abroadpath::onboarding::{AnswerSet, Identity, IdentityProvider, Navigator};
use anyhow::{bail, Result};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;

/// Auth backend double: optionally signed in, optionally failing.
#[derive(Debug, Default)]
pub struct StubBackend {
    pub identity: Option<Identity>,
    pub fail_next_persist: bool,
    pub persisted: Vec<(String, AnswerSet)>,
    pub created: Vec<BTreeMap<String, String>>,
}

impl StubBackend {
    pub fn signed_in(id: &str) -> Self {
        Self {
            identity: Some(Identity::new(id)),
            ..Default::default()
        }
    }
}

impl IdentityProvider for StubBackend {
    fn current_identity(&self) -> Option<Identity> {
        self.identity.clone()
    }

    fn create_identity(&mut self, fields: &BTreeMap<String, String>) -> Result<Identity> {
        self.created.push(fields.clone());
        let identity = Identity::new(format!("new-user-{}", self.created.len()));
        self.identity = Some(identity.clone());
        Ok(identity)
    }

    fn persist_onboarding_answers(&mut self, identity_id: &str, answers: &AnswerSet) -> Result<()> {
        if self.fail_next_persist {
            self.fail_next_persist = false;
            bail!("503 from profile service");
        }
        self.persisted.push((identity_id.to_string(), answers.clone()));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Router {
    pub visits: Vec<(String, Vec<(String, String)>)>,
}

impl Navigator for Router {
    fn navigate_to(&mut self, path: &str, query: &[(String, String)]) -> Result<()> {
        self.visits.push((path.to_string(), query.to_vec()));
        Ok(())
    }
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_790_000_000 + secs, 0).unwrap()
}
