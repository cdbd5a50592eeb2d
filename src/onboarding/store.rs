//! In-progress answers plus the wizard's position in the step catalog.

use serde::{Deserialize, Serialize};

use super::answers::{AnswerField, AnswerPatch, AnswerSet};
use super::segment::{infer_segment, Segment};
use super::steps::{build_steps, step_ids, Step, StepId};

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: StepId,
    pub to: StepId,
    pub step_index: usize,
    /// Set when entering `ready` produced a fresh segment.
    #[serde(default)]
    pub inferred: Option<Segment>,
}

impl Transition {
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

/// Owned by one wizard session. The catalog is never stored; it is rebuilt
/// from the answers whenever it is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerStore {
    answers: AnswerSet,
    step_index: usize,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a store, clamping the index to the catalog of `answers`.
    pub fn from_parts(answers: AnswerSet, step_index: usize) -> Self {
        let mut store = Self {
            answers,
            step_index,
        };
        store.clamp_index();
        store
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn steps(&self) -> Vec<Step> {
        build_steps(&self.answers)
    }

    pub fn step_count(&self) -> usize {
        step_ids(&self.answers).len()
    }

    pub fn current_step(&self) -> Step {
        let id = step_ids(&self.answers)[self.step_index];
        Step::bind(id, &self.answers)
    }

    pub fn can_continue(&self) -> bool {
        self.current_step().can_continue()
    }

    pub fn is_on_ready(&self) -> bool {
        self.current_step().is_terminal()
    }

    /// Shallow merge. Returns whether any answer changed.
    pub fn set(&mut self, patch: AnswerPatch) -> bool {
        let mut next = self.answers.clone();
        patch.apply_to(&mut next);
        self.replace(next)
    }

    /// Functional update over the whole answer set.
    pub fn update<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(AnswerSet) -> AnswerSet,
    {
        let next = f(self.answers.clone());
        self.replace(next)
    }

    fn replace(&mut self, mut next: AnswerSet) -> bool {
        let answers_changed = next.answers_differ(&self.answers);
        if answers_changed {
            // A changed answer invalidates the previous segment.
            next.segment = None;
        }
        let changed = next != self.answers;
        self.answers = next;
        self.clamp_index();
        changed
    }

    /// Moves to `index`, clamped to `[0, step_count - 1]`.
    pub fn set_step(&mut self, index: i64) -> Transition {
        let last = self.step_count() as i64 - 1;
        let target = index.clamp(0, last) as usize;
        self.enter(target)
    }

    /// Advances by one when the current gate allows it.
    pub fn next(&mut self) -> Transition {
        if !self.can_continue() || self.step_index + 1 >= self.step_count() {
            return self.enter(self.step_index);
        }
        self.enter(self.step_index + 1)
    }

    /// Steps back by one, floored at 0. Never touches answers.
    pub fn back(&mut self) -> Transition {
        let from = self.current_step().id();
        self.step_index = self.step_index.saturating_sub(1);
        Transition {
            from,
            to: self.current_step().id(),
            step_index: self.step_index,
            inferred: None,
        }
    }

    /// Clears the current step's optional answer and advances exactly one
    /// step, regardless of the gate. A no-op on steps that cannot be skipped.
    pub fn skip(&mut self) -> Transition {
        let current = self.current_step().id();
        let Some(field) = current.optional_field() else {
            return Transition {
                from: current,
                to: current,
                step_index: self.step_index,
                inferred: None,
            };
        };
        let mut next = self.answers.clone();
        next.clear(AnswerField::from(field));
        self.replace(next);
        let target = (self.step_index + 1).min(self.step_count() - 1);
        self.enter(target)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn enter(&mut self, target: usize) -> Transition {
        let from = self.current_step().id();
        self.step_index = target;
        let to = self.current_step().id();
        let mut inferred = None;
        if to == StepId::Ready && self.answers.segment.is_none() {
            let segment = infer_segment(&self.answers);
            self.answers.segment = Some(segment);
            inferred = Some(segment);
        }
        Transition {
            from,
            to,
            step_index: self.step_index,
            inferred,
        }
    }

    fn clamp_index(&mut self) {
        let last = self.step_count() - 1;
        if self.step_index > last {
            self.step_index = last;
        }
    }
}
