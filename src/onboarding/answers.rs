//! Answer set collected across the onboarding wizard and its partial updates.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;

use super::segment::Segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StudyGoal {
    Bachelor,
    Master,
    SecondMaster,
}

impl StudyGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyGoal::Bachelor => "bachelor",
            StudyGoal::Master => "master",
            StudyGoal::SecondMaster => "second-master",
        }
    }

    /// Master and second-master applicants get the graduate detail steps.
    pub fn is_graduate(&self) -> bool {
        matches!(self, StudyGoal::Master | StudyGoal::SecondMaster)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Usa,
    Uk,
}

impl Destination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Destination::Usa => "usa",
            Destination::Uk => "uk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn is_yes(&self) -> bool {
        matches!(self, YesNo::Yes)
    }
}

/// Annual budget in whole dollars. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Budget(u32);

impl Budget {
    pub fn new(amount: u32) -> Option<Self> {
        (amount > 0).then_some(Self(amount))
    }

    pub fn amount(&self) -> u32 {
        self.0
    }

    /// Accepts slider values and display strings such as `"$45,000"`.
    pub fn parse(input: &str) -> Option<Self> {
        let digits: String = input
            .trim()
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',' && *c != '_')
            .collect();
        digits.parse::<u32>().ok().and_then(Self::new)
    }
}

impl TryFrom<u32> for Budget {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Budget::new(value).ok_or_else(|| "budget must be a positive whole-dollar amount".into())
    }
}

impl From<Budget> for u32 {
    fn from(value: Budget) -> Self {
        value.0
    }
}

/// Renders exactly the numeric slider value.
impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The single record collected across the wizard. Every field stays `None`
/// until answered; text answers are never stored as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_goal: Option<StudyGoal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Destination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knows_universities: Option<YesNo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intake: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_break: Option<YesNo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visa_refusal: Option<YesNo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<Segment>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_graduate_track(&self) -> bool {
        self.study_goal.map(|g| g.is_graduate()).unwrap_or(false)
    }

    pub fn funding(&self) -> Option<&str> {
        if self.is_graduate_track() {
            self.funding.as_deref()
        } else {
            None
        }
    }

    pub fn study_break(&self) -> Option<YesNo> {
        self.study_break.filter(|_| self.is_graduate_track())
    }

    pub fn visa_refusal(&self) -> Option<YesNo> {
        self.visa_refusal.filter(|_| self.is_graduate_track())
    }

    pub fn budget_label(&self) -> Option<String> {
        self.budget.map(|b| b.to_string())
    }

    /// Copy suitable for handoff: graduate-only answers are dropped unless
    /// the goal is master or second-master.
    pub fn normalized(&self) -> AnswerSet {
        let mut out = self.clone();
        if !self.is_graduate_track() {
            out.funding = None;
            out.study_break = None;
            out.visa_refusal = None;
        }
        out
    }

    /// True when the two sets differ in anything other than the segment.
    pub(crate) fn answers_differ(&self, other: &AnswerSet) -> bool {
        let mut a = self.clone();
        let mut b = other.clone();
        a.segment = None;
        b.segment = None;
        a != b
    }

    pub fn clear(&mut self, field: AnswerField) {
        match field {
            AnswerField::StudyGoal => self.study_goal = None,
            AnswerField::FieldOfStudy => self.field_of_study = None,
            AnswerField::Destination => self.destination = None,
            AnswerField::KnowsUniversities => self.knows_universities = None,
            AnswerField::Country => self.country = None,
            AnswerField::Gpa => self.gpa = None,
            AnswerField::Intake => self.intake = None,
            AnswerField::Budget => self.budget = None,
            AnswerField::Funding => self.funding = None,
            AnswerField::StudyBreak => self.study_break = None,
            AnswerField::VisaRefusal => self.visa_refusal = None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnswerField {
    StudyGoal,
    FieldOfStudy,
    Destination,
    KnowsUniversities,
    Country,
    Gpa,
    Intake,
    Budget,
    Funding,
    StudyBreak,
    VisaRefusal,
}

/// Fields the wizard lets the user skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionalField {
    FieldOfStudy,
    Gpa,
    Intake,
    Budget,
}

impl From<OptionalField> for AnswerField {
    fn from(value: OptionalField) -> Self {
        match value {
            OptionalField::FieldOfStudy => AnswerField::FieldOfStudy,
            OptionalField::Gpa => AnswerField::Gpa,
            OptionalField::Intake => AnswerField::Intake,
            OptionalField::Budget => AnswerField::Budget,
        }
    }
}

/// Partial update merged into an [`AnswerSet`].
///
/// Outer `None` leaves a field untouched, `Some(None)` clears it (JSON
/// `null`), `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub study_goal: Option<Option<StudyGoal>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub field_of_study: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub destination: Option<Option<Destination>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub knows_universities: Option<Option<YesNo>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub country: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub gpa: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub intake: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub budget: Option<Option<Budget>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub funding: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub study_break: Option<Option<YesNo>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub visa_refusal: Option<Option<YesNo>>,
}

impl AnswerPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn study_goal(mut self, goal: StudyGoal) -> Self {
        self.study_goal = Some(Some(goal));
        self
    }

    pub fn field_of_study(mut self, field: impl Into<String>) -> Self {
        self.field_of_study = Some(Some(field.into()));
        self
    }

    pub fn destination(mut self, destination: Destination) -> Self {
        self.destination = Some(Some(destination));
        self
    }

    pub fn knows_universities(mut self, answer: YesNo) -> Self {
        self.knows_universities = Some(Some(answer));
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(Some(country.into()));
        self
    }

    pub fn gpa(mut self, gpa: impl Into<String>) -> Self {
        self.gpa = Some(Some(gpa.into()));
        self
    }

    pub fn intake(mut self, intake: impl Into<String>) -> Self {
        self.intake = Some(Some(intake.into()));
        self
    }

    pub fn budget(mut self, budget: Budget) -> Self {
        self.budget = Some(Some(budget));
        self
    }

    pub fn funding(mut self, funding: impl Into<String>) -> Self {
        self.funding = Some(Some(funding.into()));
        self
    }

    pub fn study_break(mut self, answer: YesNo) -> Self {
        self.study_break = Some(Some(answer));
        self
    }

    pub fn visa_refusal(mut self, answer: YesNo) -> Self {
        self.visa_refusal = Some(Some(answer));
        self
    }

    pub fn clear(mut self, field: AnswerField) -> Self {
        match field {
            AnswerField::StudyGoal => self.study_goal = Some(None),
            AnswerField::FieldOfStudy => self.field_of_study = Some(None),
            AnswerField::Destination => self.destination = Some(None),
            AnswerField::KnowsUniversities => self.knows_universities = Some(None),
            AnswerField::Country => self.country = Some(None),
            AnswerField::Gpa => self.gpa = Some(None),
            AnswerField::Intake => self.intake = Some(None),
            AnswerField::Budget => self.budget = Some(None),
            AnswerField::Funding => self.funding = Some(None),
            AnswerField::StudyBreak => self.study_break = Some(None),
            AnswerField::VisaRefusal => self.visa_refusal = Some(None),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == AnswerPatch::default()
    }

    /// Shallow-merges the patch; fields it does not mention are kept.
    pub fn apply_to(self, answers: &mut AnswerSet) {
        merge(&mut answers.study_goal, self.study_goal);
        merge_text(&mut answers.field_of_study, self.field_of_study);
        merge(&mut answers.destination, self.destination);
        merge(&mut answers.knows_universities, self.knows_universities);
        merge_text(&mut answers.country, self.country);
        merge_text(&mut answers.gpa, self.gpa);
        merge_text(&mut answers.intake, self.intake);
        merge(&mut answers.budget, self.budget);
        merge_text(&mut answers.funding, self.funding);
        merge(&mut answers.study_break, self.study_break);
        merge(&mut answers.visa_refusal, self.visa_refusal);
    }
}

fn merge<T>(slot: &mut Option<T>, incoming: Option<Option<T>>) {
    if let Some(value) = incoming {
        *slot = value;
    }
}

fn merge_text(slot: &mut Option<String>, incoming: Option<Option<String>>) {
    if let Some(value) = incoming {
        *slot = value
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
    }
}
