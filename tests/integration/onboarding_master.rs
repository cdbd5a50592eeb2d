use super::support::{at, Router, StubBackend};
use super::IntegrationHarness;
use abroadpath::onboarding::{
    AnswerPatch, Destination, HandoffOutcome, StepId, StudyGoal, YesNo,
};
use abroadpath::EventType;
use anyhow::Result;

fn master_answers() -> AnswerPatch {
    AnswerPatch::new()
        .study_goal(StudyGoal::Master)
        .destination(Destination::Usa)
        .knows_universities(YesNo::Yes)
        .country("india")
        .funding("self")
        .study_break(YesNo::No)
        .visa_refusal(YesNo::No)
}

#[test]
fn master_path_with_full_answers_walks_every_gate() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut app = harness.app();
    {
        let mut session = app.onboarding(None)?;
        session.set(master_answers())?;
        assert_eq!(session.steps().len(), 12);

        let mut visited = vec![session.current_step().id()];
        while session.current_step().id() != StepId::Ready {
            assert!(session.can_continue(), "blocked at {:?}", session.current_step().id());
            let transition = session.next()?;
            assert!(transition.moved());
            visited.push(transition.to);
        }
        assert_eq!(visited.len(), 12);
        let segment = session.answers().segment.expect("segment inferred at ready");
        assert!(!segment.as_str().is_empty());
    }

    let events = app.log().load_events()?;
    assert_eq!(events[0].event_type, EventType::OnboardingStarted);
    let inferred: Vec<_> = events
        .iter()
        .filter(|e| e.event_type == EventType::SegmentInferred)
        .collect();
    assert_eq!(inferred.len(), 1);
    Ok(())
}

#[test]
fn signed_in_master_is_synced_and_earns_first_steps() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut app = harness.app();
    let mut backend = StubBackend::signed_in("student-7");
    {
        let identity = backend.identity.clone();
        let mut session = app.onboarding(identity.as_ref())?;
        session.set(master_answers())?;
        session.set_step(i64::MAX)?;
        session.close();
    }

    let mut router = Router::default();
    let outcome = app.complete_onboarding(&mut backend, &mut router, at(0))?;
    assert_eq!(
        outcome,
        HandoffOutcome::Persisted {
            identity_id: "student-7".into(),
            redirect: "/dashboard".into(),
        }
    );
    let (id, saved) = &backend.persisted[0];
    assert_eq!(id, "student-7");
    assert_eq!(saved.funding(), Some("self"));
    assert!(saved.segment.is_some());

    let tracker = app.achievements()?;
    assert!(tracker.is_unlocked("first-steps"));
    assert_eq!(router.visits, vec![("/dashboard".to_string(), Vec::new())]);
    Ok(())
}
