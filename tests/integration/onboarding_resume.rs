use super::IntegrationHarness;
use abroadpath::onboarding::{AnswerPatch, Destination, Identity, StepId, StudyGoal, YesNo};
use abroadpath::EventType;
use anyhow::Result;

#[test]
fn reload_resumes_at_saved_step() -> Result<()> {
    let harness = IntegrationHarness::new();
    {
        let mut app = harness.app();
        let mut session = app.onboarding(None)?;
        session.set(
            AnswerPatch::new()
                .study_goal(StudyGoal::SecondMaster)
                .destination(Destination::Uk)
                .knows_universities(YesNo::No),
        )?;
        session.set_step(3)?;
        session.close();
    }

    // Fresh app over the same workspace simulates a page reload.
    let mut app = harness.app();
    let session = app.onboarding(None)?;
    assert!(session.was_resumed());
    assert_eq!(session.step_index(), 3);
    assert_eq!(session.current_step().id(), StepId::KnowsUniversities);
    assert_eq!(session.answers().destination, Some(Destination::Uk));
    drop(session);

    assert_eq!(app.log().events_of(EventType::OnboardingResumed)?.len(), 1);
    Ok(())
}

#[test]
fn reset_and_identity_change_drop_progress() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut app = harness.app();
    {
        let mut session = app.onboarding(None)?;
        session.set(AnswerPatch::new().country("kenya"))?;
        session.reset()?;
    }
    {
        let session = app.onboarding(None)?;
        assert!(!session.was_resumed());
        assert!(session.answers().country.is_none());
    }

    let owner = Identity::new("owner-1");
    {
        let mut session = app.onboarding(Some(&owner))?;
        session.set(AnswerPatch::new().country("kenya"))?;
    }
    let session = app.onboarding(None)?;
    assert!(!session.was_resumed(), "logout must not expose another user's answers");
    assert!(session.answers().country.is_none());
    Ok(())
}

#[test]
fn mirror_file_lives_in_workspace_storage() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut app = harness.app();
    {
        let mut session = app.onboarding(None)?;
        session.set(AnswerPatch::new().study_goal(StudyGoal::Bachelor))?;
    }
    let mirror = harness
        .workspace_path()
        .join("storage")
        .join("onboarding-progress.json");
    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(mirror)?)?;
    assert_eq!(raw["answers"]["studyGoal"], "bachelor");
    assert_eq!(raw["stepIndex"], 0);
    assert_eq!(raw["isCompleted"], false);
    Ok(())
}
