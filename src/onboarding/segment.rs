//! Coarse applicant segmentation used for downstream personalization.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::answers::AnswerSet;

/// Budgets below this (whole dollars per year) read as scholarship-dependent.
pub const SCHOLARSHIP_BUDGET_CEILING: u32 = 20_000;
/// Budgets at or above this read as premium when the applicant self-funds.
pub const PREMIUM_BUDGET_FLOOR: u32 = 60_000;

const AID_FUNDING: [&str; 2] = ["scholarship", "loan"];
const SELF_FUNDING: [&str; 2] = ["self", "family"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Segment {
    VisaRecovery,
    CareerReturner,
    ScholarshipSeeker,
    PremiumPlanner,
    UndergradExplorer,
    UndergradPlanner,
    GraduateExplorer,
    GraduatePlanner,
}

impl Segment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::VisaRecovery => "visa-recovery",
            Segment::CareerReturner => "career-returner",
            Segment::ScholarshipSeeker => "scholarship-seeker",
            Segment::PremiumPlanner => "premium-planner",
            Segment::UndergradExplorer => "undergrad-explorer",
            Segment::UndergradPlanner => "undergrad-planner",
            Segment::GraduateExplorer => "graduate-explorer",
            Segment::GraduatePlanner => "graduate-planner",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an answer set to its segment. Total and pure: the first matching
/// rule wins and the last two rules cover every remaining combination.
pub fn infer_segment(answers: &AnswerSet) -> Segment {
    if answers.visa_refusal().map(|v| v.is_yes()).unwrap_or(false) {
        return Segment::VisaRecovery;
    }
    if answers.study_break().map(|v| v.is_yes()).unwrap_or(false) {
        return Segment::CareerReturner;
    }

    let budget = answers.budget.map(|b| b.amount());
    let funding = answers.funding();
    let aid_funded = funding.map(|f| AID_FUNDING.contains(&f)).unwrap_or(false);
    if aid_funded || budget.map(|b| b < SCHOLARSHIP_BUDGET_CEILING).unwrap_or(false) {
        return Segment::ScholarshipSeeker;
    }

    // Bachelor applicants never report funding, so any large budget counts.
    let self_funded = funding.map(|f| SELF_FUNDING.contains(&f)).unwrap_or(true);
    if self_funded && budget.map(|b| b >= PREMIUM_BUDGET_FLOOR).unwrap_or(false) {
        return Segment::PremiumPlanner;
    }

    let has_shortlist = answers
        .knows_universities
        .map(|k| k.is_yes())
        .unwrap_or(false);
    match (answers.is_graduate_track(), has_shortlist) {
        (true, true) => Segment::GraduatePlanner,
        (true, false) => Segment::GraduateExplorer,
        (false, true) => Segment::UndergradPlanner,
        (false, false) => Segment::UndergradExplorer,
    }
}
