//! One wizard run: answer store, progress mirror, event log and handoff.

use anyhow::{bail, Result};
use serde_json::json;
use uuid::Uuid;

use crate::events::{fingerprint, EventLog, EventType};
use crate::workspace::{KeyValueStore, OnboardingSettings};

use super::answers::{AnswerPatch, AnswerSet};
use super::handoff::{hand_off, HandoffOutcome, Identity, IdentityProvider, Navigator};
use super::progress::{ProgressMirror, ProgressSnapshot};
use super::segment::infer_segment;
use super::steps::{Step, StepId};
use super::store::{AnswerStore, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active,
    /// Handoff call in flight; input is disabled.
    Submitting,
    Completed,
}

pub struct OnboardingSession<'a> {
    session_id: Uuid,
    store: AnswerStore,
    storage: &'a mut dyn KeyValueStore,
    mirror: ProgressMirror,
    settings: OnboardingSettings,
    log: Option<EventLog>,
    owner: Option<String>,
    phase: SessionPhase,
    resumed: bool,
}

impl<'a> OnboardingSession<'a> {
    /// Opens the wizard, resuming a mirrored run owned by the same identity.
    /// A mirror left by a different identity is discarded.
    pub fn open(
        storage: &'a mut dyn KeyValueStore,
        settings: OnboardingSettings,
        identity: Option<&Identity>,
        log: Option<EventLog>,
    ) -> Result<Self> {
        let mirror = ProgressMirror::new(settings.progress_key.clone());
        let owner = identity.map(|i| i.id.clone());
        let mut store = AnswerStore::new();
        let mut resumed = false;
        let mut corrupt = None;

        if settings.persist_progress {
            match mirror.load(storage) {
                Ok(Some(snapshot))
                    if !snapshot.is_completed && snapshot.belongs_to(owner.as_deref()) =>
                {
                    store = AnswerStore::from_parts(snapshot.answers, snapshot.step_index);
                    resumed = true;
                }
                Ok(Some(_)) => mirror.clear(storage)?,
                Ok(None) => {}
                Err(err) => {
                    // Unreadable progress starts the wizard over.
                    mirror.clear(storage)?;
                    corrupt = Some(format!("{err:#}"));
                }
            }
        }

        let session = Self {
            session_id: Uuid::new_v4(),
            store,
            storage,
            mirror,
            settings,
            log,
            owner,
            phase: SessionPhase::Active,
            resumed,
        };
        if let Some(error) = corrupt {
            session.log_event(
                EventType::OnboardingReset,
                json!({ "reason": "corrupt_mirror", "error": error }),
            );
        }
        let event = if resumed {
            EventType::OnboardingResumed
        } else {
            EventType::OnboardingStarted
        };
        session.log_event(
            event,
            json!({ "step_index": session.store.step_index(), "owner": session.owner }),
        );
        Ok(session)
    }

    /// Read-only view of the progress `open` would resume for `identity`.
    pub fn saved_progress(
        storage: &dyn KeyValueStore,
        settings: &OnboardingSettings,
        identity: Option<&Identity>,
    ) -> Option<AnswerStore> {
        if !settings.persist_progress {
            return None;
        }
        let owner = identity.map(|i| i.id.as_str());
        ProgressMirror::new(settings.progress_key.clone())
            .load(storage)
            .ok()
            .flatten()
            .filter(|snapshot| !snapshot.is_completed && snapshot.belongs_to(owner))
            .map(|snapshot| AnswerStore::from_parts(snapshot.answers, snapshot.step_index))
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn answers(&self) -> &AnswerSet {
        self.store.answers()
    }

    pub fn step_index(&self) -> usize {
        self.store.step_index()
    }

    pub fn steps(&self) -> Vec<Step> {
        self.store.steps()
    }

    pub fn current_step(&self) -> Step {
        self.store.current_step()
    }

    pub fn can_continue(&self) -> bool {
        self.phase == SessionPhase::Active && self.store.can_continue()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase == SessionPhase::Submitting
    }

    pub fn was_resumed(&self) -> bool {
        self.resumed
    }

    pub fn set(&mut self, patch: AnswerPatch) -> Result<bool> {
        self.ensure_editable()?;
        let changed = self.store.set(patch);
        if changed {
            self.persist()?;
        }
        Ok(changed)
    }

    pub fn update<F>(&mut self, f: F) -> Result<bool>
    where
        F: FnOnce(AnswerSet) -> AnswerSet,
    {
        self.ensure_editable()?;
        let changed = self.store.update(f);
        if changed {
            self.persist()?;
        }
        Ok(changed)
    }

    pub fn next(&mut self) -> Result<Transition> {
        self.ensure_editable()?;
        let transition = self.store.next();
        self.after_move(transition)
    }

    pub fn back(&mut self) -> Result<Transition> {
        self.ensure_editable()?;
        let transition = self.store.back();
        self.after_move(transition)
    }

    pub fn set_step(&mut self, index: i64) -> Result<Transition> {
        self.ensure_editable()?;
        let transition = self.store.set_step(index);
        self.after_move(transition)
    }

    /// Skips the current step. Only `field`, `gpa`, `intake` and `budget`
    /// can be skipped.
    pub fn skip(&mut self) -> Result<Transition> {
        self.ensure_editable()?;
        let current = self.store.current_step().id();
        let Some(field) = current.optional_field() else {
            bail!("The '{}' step cannot be skipped", current.as_str());
        };
        let transition = self.store.skip();
        self.log_event(
            EventType::OnboardingSkipped,
            json!({ "field": field, "from": transition.from.as_str() }),
        );
        self.after_move(transition)
    }

    /// Terminal action on the `ready` step. On failure the answers stay in
    /// place so the same action can be retried.
    pub fn complete(
        &mut self,
        provider: &mut dyn IdentityProvider,
        navigator: &mut dyn Navigator,
    ) -> Result<HandoffOutcome> {
        match self.phase {
            SessionPhase::Submitting => bail!("Onboarding submission already in progress"),
            SessionPhase::Completed => bail!("Onboarding already completed"),
            SessionPhase::Active => {}
        }
        if self.store.current_step().id() != StepId::Ready {
            bail!(
                "Onboarding can only be completed from the ready step (current: {})",
                self.store.current_step().id().as_str()
            );
        }
        if self.store.answers().segment.is_none() {
            // Reached only when the catalog shrank onto `ready`.
            let segment = infer_segment(self.store.answers());
            self.store.update(|mut answers| {
                answers.segment = Some(segment);
                answers
            });
            self.log_event(
                EventType::SegmentInferred,
                json!({ "segment": segment.as_str() }),
            );
        }

        self.phase = SessionPhase::Submitting;
        let answers = self.store.answers().clone();
        let result = hand_off(&answers, provider, navigator, &self.settings);
        match result {
            Ok(outcome) => {
                self.phase = SessionPhase::Completed;
                if self.settings.persist_progress {
                    self.mirror.clear(self.storage)?;
                }
                let event = match outcome {
                    HandoffOutcome::RedirectedToSignup { .. } => EventType::HandoffRedirected,
                    HandoffOutcome::Persisted { .. } => EventType::HandoffPersisted,
                };
                self.log_event(
                    event,
                    json!({
                        "segment": answers.segment.map(|s| s.as_str()),
                        "answers_hash": fingerprint(&answers.normalized()).ok(),
                    }),
                );
                Ok(outcome)
            }
            Err(err) => {
                self.phase = SessionPhase::Active;
                self.log_event(
                    EventType::HandoffFailed,
                    json!({ "reason": format!("{err:#}") }),
                );
                Err(err)
            }
        }
    }

    /// Explicit reset: drops answers and the persisted mirror.
    pub fn reset(&mut self) -> Result<()> {
        self.store.reset();
        self.phase = SessionPhase::Active;
        if self.settings.persist_progress {
            self.mirror.clear(self.storage)?;
        }
        self.log_event(EventType::OnboardingReset, json!({ "reason": "user" }));
        Ok(())
    }

    /// The owning identity changed (login/logout): progress is discarded.
    pub fn change_identity(&mut self, identity: Option<&Identity>) -> Result<()> {
        let owner = identity.map(|i| i.id.clone());
        if owner == self.owner {
            return Ok(());
        }
        self.owner = owner;
        self.store.reset();
        self.phase = SessionPhase::Active;
        if self.settings.persist_progress {
            self.mirror.clear(self.storage)?;
        }
        self.log_event(
            EventType::OnboardingReset,
            json!({ "reason": "identity_changed" }),
        );
        Ok(())
    }

    /// Closing keeps the mirror so the wizard can be resumed later.
    pub fn close(self) {}

    fn ensure_editable(&self) -> Result<()> {
        match self.phase {
            SessionPhase::Active => Ok(()),
            SessionPhase::Submitting => bail!("Onboarding is submitting; input is disabled"),
            SessionPhase::Completed => bail!("Onboarding already completed"),
        }
    }

    fn after_move(&mut self, transition: Transition) -> Result<Transition> {
        if transition.moved() {
            self.log_event(
                EventType::OnboardingStepChanged,
                json!({
                    "from": transition.from.as_str(),
                    "to": transition.to.as_str(),
                    "step_index": transition.step_index,
                }),
            );
        }
        if let Some(segment) = transition.inferred {
            self.log_event(
                EventType::SegmentInferred,
                json!({ "segment": segment.as_str() }),
            );
        }
        self.persist()?;
        Ok(transition)
    }

    fn persist(&mut self) -> Result<()> {
        if !self.settings.persist_progress {
            return Ok(());
        }
        let snapshot = ProgressSnapshot::new(
            self.store.answers().clone(),
            self.store.step_index(),
            self.owner.clone(),
        );
        self.mirror.save(self.storage, &snapshot)
    }

    fn log_event(&self, event_type: EventType, details: serde_json::Value) {
        if let Some(log) = &self.log {
            let _ = log.record(Some(self.session_id), event_type, details);
        }
    }
}
