//! Multi-step onboarding wizard.
//!
//! UI events update the [`AnswerStore`], the step catalog is rebuilt from the
//! answers, the current step's gate decides whether "Next" is enabled, and on
//! reaching `ready` the answers are segmented and handed off.

pub mod answers;
pub mod handoff;
pub mod progress;
pub mod segment;
pub mod session;
pub mod steps;
pub mod store;

pub use answers::{
    AnswerField, AnswerPatch, AnswerSet, Budget, Destination, OptionalField, StudyGoal, YesNo,
};
pub use handoff::{
    create_identity_from_signup, hand_off, signup_query, HandoffOutcome, Identity,
    IdentityProvider, Navigator,
};
pub use progress::{ProgressMirror, ProgressSnapshot};
pub use segment::{infer_segment, Segment};
pub use session::{OnboardingSession, SessionPhase};
pub use steps::{build_steps, insertion_rules, step_ids, InsertionRule, Step, StepId};
pub use store::{AnswerStore, Transition};
