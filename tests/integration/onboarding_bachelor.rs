use super::IntegrationHarness;
use abroadpath::onboarding::{AnswerPatch, StepId, StudyGoal};
use anyhow::Result;

#[test]
fn bachelor_catalog_has_nine_steps_and_no_graduate_details() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut app = harness.app();
    let mut session = app.onboarding(None)?;

    session.set(AnswerPatch::new().study_goal(StudyGoal::Bachelor))?;
    let ids: Vec<StepId> = session.steps().iter().map(|s| s.id()).collect();
    assert_eq!(ids.len(), 9);
    assert_eq!(ids.last(), Some(&StepId::Ready));
    for graduate in [StepId::Funding, StepId::StudyBreak, StepId::VisaRefusal] {
        assert!(!ids.contains(&graduate), "{:?} leaked into bachelor path", graduate);
    }
    Ok(())
}

#[test]
fn skipping_optional_steps_reaches_ready() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut app = harness.app();
    let mut session = app.onboarding(None)?;

    session.set(AnswerPatch::new().study_goal(StudyGoal::Bachelor))?;
    session.next()?;
    let skipped = session.skip()?;
    assert_eq!(skipped.to, StepId::Destination);

    // Destination is required: next stays put and it cannot be skipped.
    let blocked = session.next()?;
    assert!(!blocked.moved());
    assert!(!session.can_continue());
    assert!(session.skip().is_err());
    assert_eq!(session.current_step().id(), StepId::Destination);

    session.set_step(5)?;
    session.skip()?;
    session.skip()?;
    let last = session.skip()?;
    assert_eq!(last.to, StepId::Ready);
    assert!(last.inferred.is_some());
    assert_eq!(session.answers().segment, last.inferred);
    Ok(())
}
