//! Step catalog for the onboarding wizard.
//!
//! The catalog is a pure function of the current answers: a fixed spine of
//! steps, a declarative list of insertion rules and a terminal `ready` step.
//! Each [`Step`] captures the data its continuation gate needs at build time,
//! so a catalog can never be evaluated against stale answers.

use serde::{Deserialize, Serialize};

use super::answers::{AnswerSet, Destination, OptionalField, StudyGoal, YesNo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
    Goal,
    Field,
    Destination,
    KnowsUniversities,
    Country,
    Gpa,
    Intake,
    Budget,
    Funding,
    StudyBreak,
    VisaRefusal,
    Ready,
}

impl StepId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::Goal => "goal",
            StepId::Field => "field",
            StepId::Destination => "destination",
            StepId::KnowsUniversities => "knows-universities",
            StepId::Country => "country",
            StepId::Gpa => "gpa",
            StepId::Intake => "intake",
            StepId::Budget => "budget",
            StepId::Funding => "funding",
            StepId::StudyBreak => "study-break",
            StepId::VisaRefusal => "visa-refusal",
            StepId::Ready => "ready",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            StepId::Goal => "What do you want to study abroad?",
            StepId::Field => "Which field do you want to study?",
            StepId::Destination => "Where do you want to study?",
            StepId::KnowsUniversities => "Do you already know which universities you want?",
            StepId::Country => "Which country are you applying from?",
            StepId::Gpa => "What is your current GPA?",
            StepId::Intake => "Which intake are you aiming for?",
            StepId::Budget => "What is your annual budget?",
            StepId::Funding => "How will you fund your studies?",
            StepId::StudyBreak => "Have you had a break in your studies?",
            StepId::VisaRefusal => "Have you ever been refused a visa?",
            StepId::Ready => "You're ready. Review your answers.",
        }
    }

    /// The answer a "skip" on this step clears, if the step is skippable.
    pub fn optional_field(&self) -> Option<OptionalField> {
        match self {
            StepId::Field => Some(OptionalField::FieldOfStudy),
            StepId::Gpa => Some(OptionalField::Gpa),
            StepId::Intake => Some(OptionalField::Intake),
            StepId::Budget => Some(OptionalField::Budget),
            _ => None,
        }
    }
}

/// A catalog entry bound to the answers it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Goal { study_goal: Option<StudyGoal> },
    Field,
    Destination { destination: Option<Destination> },
    KnowsUniversities { answer: Option<YesNo> },
    Country { answered: bool },
    Gpa,
    Intake,
    Budget,
    Funding { answered: bool },
    StudyBreak { answer: Option<YesNo> },
    VisaRefusal { answer: Option<YesNo> },
    Ready,
}

impl Step {
    pub fn bind(id: StepId, answers: &AnswerSet) -> Self {
        match id {
            StepId::Goal => Step::Goal {
                study_goal: answers.study_goal,
            },
            StepId::Field => Step::Field,
            StepId::Destination => Step::Destination {
                destination: answers.destination,
            },
            StepId::KnowsUniversities => Step::KnowsUniversities {
                answer: answers.knows_universities,
            },
            StepId::Country => Step::Country {
                answered: answers.country.is_some(),
            },
            StepId::Gpa => Step::Gpa,
            StepId::Intake => Step::Intake,
            StepId::Budget => Step::Budget,
            StepId::Funding => Step::Funding {
                answered: answers.funding().is_some(),
            },
            StepId::StudyBreak => Step::StudyBreak {
                answer: answers.study_break(),
            },
            StepId::VisaRefusal => Step::VisaRefusal {
                answer: answers.visa_refusal(),
            },
            StepId::Ready => Step::Ready,
        }
    }

    pub fn id(&self) -> StepId {
        match self {
            Step::Goal { .. } => StepId::Goal,
            Step::Field => StepId::Field,
            Step::Destination { .. } => StepId::Destination,
            Step::KnowsUniversities { .. } => StepId::KnowsUniversities,
            Step::Country { .. } => StepId::Country,
            Step::Gpa => StepId::Gpa,
            Step::Intake => StepId::Intake,
            Step::Budget => StepId::Budget,
            Step::Funding { .. } => StepId::Funding,
            Step::StudyBreak { .. } => StepId::StudyBreak,
            Step::VisaRefusal { .. } => StepId::VisaRefusal,
            Step::Ready => StepId::Ready,
        }
    }

    /// Continuation gate. Optional steps always pass; "skip" exists for them.
    pub fn can_continue(&self) -> bool {
        match self {
            Step::Goal { study_goal } => study_goal.is_some(),
            Step::Destination { destination } => destination.is_some(),
            Step::KnowsUniversities { answer } => answer.is_some(),
            Step::Country { answered } => *answered,
            Step::Funding { answered } => *answered,
            Step::StudyBreak { answer } => answer.is_some(),
            Step::VisaRefusal { answer } => answer.is_some(),
            Step::Field | Step::Gpa | Step::Intake | Step::Budget | Step::Ready => true,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::Ready)
    }
}

/// Steps every applicant sees, in order, before any insertions.
pub const FIXED_STEPS: [StepId; 8] = [
    StepId::Goal,
    StepId::Field,
    StepId::Destination,
    StepId::KnowsUniversities,
    StepId::Country,
    StepId::Gpa,
    StepId::Intake,
    StepId::Budget,
];

/// Inserts `steps` right after `anchor` when `applies` holds.
#[derive(Clone, Copy)]
pub struct InsertionRule {
    pub name: &'static str,
    pub applies: fn(&AnswerSet) -> bool,
    pub steps: &'static [StepId],
    pub anchor: StepId,
}

const INSERTION_RULES: [InsertionRule; 1] = [InsertionRule {
    name: "graduate-details",
    applies: AnswerSet::is_graduate_track,
    steps: &[StepId::Funding, StepId::StudyBreak, StepId::VisaRefusal],
    anchor: StepId::Budget,
}];

pub fn insertion_rules() -> &'static [InsertionRule] {
    &INSERTION_RULES
}

/// Ordered step ids for `answers`. Deterministic: no clock, no randomness.
pub fn step_ids(answers: &AnswerSet) -> Vec<StepId> {
    let mut ids = Vec::with_capacity(FIXED_STEPS.len() + 4);
    for id in FIXED_STEPS {
        push_with_insertions(id, answers, &mut ids);
    }
    ids.push(StepId::Ready);
    ids
}

fn push_with_insertions(id: StepId, answers: &AnswerSet, ids: &mut Vec<StepId>) {
    ids.push(id);
    for rule in insertion_rules() {
        if rule.anchor == id && (rule.applies)(answers) {
            for inserted in rule.steps {
                push_with_insertions(*inserted, answers, ids);
            }
        }
    }
}

/// Builds the full catalog bound to the current answers.
pub fn build_steps(answers: &AnswerSet) -> Vec<Step> {
    step_ids(answers)
        .into_iter()
        .map(|id| Step::bind(id, answers))
        .collect()
}
