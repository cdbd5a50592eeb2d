use super::support::{at, Router, StubBackend};
use super::IntegrationHarness;
use abroadpath::onboarding::{
    create_identity_from_signup, AnswerPatch, Budget, HandoffOutcome, Identity, StudyGoal,
};
use abroadpath::EventType;
use anyhow::Result;

fn finish_bachelor(harness: &IntegrationHarness) -> Result<abroadpath::StudyApp> {
    let mut app = harness.app();
    {
        let mut session = app.onboarding(None)?;
        session.set(
            AnswerPatch::new()
                .study_goal(StudyGoal::Bachelor)
                .field_of_study("computer-science")
                .country("vietnam")
                .budget(Budget::new(32_000).unwrap()),
        )?;
        session.set_step(100)?;
    }
    Ok(app)
}

#[test]
fn anonymous_completion_redirects_to_signup_with_params() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut app = finish_bachelor(&harness)?;
    let mut backend = StubBackend::default();
    let mut router = Router::default();

    let outcome = app.complete_onboarding(&mut backend, &mut router, at(0))?;
    let HandoffOutcome::RedirectedToSignup { path, query } = outcome else {
        panic!("expected signup redirect");
    };
    assert_eq!(path, "/signup");
    assert_eq!(
        query,
        vec![
            ("country".to_string(), "vietnam".to_string()),
            ("field".to_string(), "computer-science".to_string()),
            ("budget".to_string(), "32000".to_string()),
        ]
    );

    let identity = create_identity_from_signup(&mut backend, &query, &[])?;
    assert_eq!(identity.id, "new-user-1");
    assert_eq!(backend.created[0].get("budget").map(String::as_str), Some("32000"));

    // Finishing clears the mirror: a new wizard starts empty.
    let session = app.onboarding(None)?;
    assert!(!session.was_resumed());
    Ok(())
}

#[test]
fn failed_sync_is_retryable_after_cooldown() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut app = harness.app();
    let mut backend = StubBackend::signed_in("student-2");
    backend.fail_next_persist = true;
    let mut router = Router::default();
    let owner = Identity::new("student-2");
    {
        let mut session = app.onboarding(Some(&owner))?;
        session.set(
            AnswerPatch::new()
                .study_goal(StudyGoal::Bachelor)
                .country("vietnam"),
        )?;
        session.set_step(100)?;
    }

    let err = app
        .complete_onboarding(&mut backend, &mut router, at(0))
        .unwrap_err();
    assert!(format!("{err:#}").contains("503"));
    assert!(router.visits.is_empty());

    let too_soon = app
        .complete_onboarding(&mut backend, &mut router, at(3))
        .unwrap_err();
    assert!(too_soon.to_string().contains("Please wait 7 seconds"));

    // The mirror survived the failure, so the retry resumes on `ready`.
    let outcome = app.complete_onboarding(&mut backend, &mut router, at(11))?;
    assert!(matches!(outcome, HandoffOutcome::Persisted { .. }));
    assert_eq!(backend.persisted.len(), 1);
    assert_eq!(backend.persisted[0].1.country.as_deref(), Some("vietnam"));

    assert_eq!(app.log().events_of(EventType::HandoffFailed)?.len(), 1);
    assert_eq!(app.log().events_of(EventType::HandoffPersisted)?.len(), 1);
    assert_eq!(app.log().events_of(EventType::RateLimited)?.len(), 1);
    Ok(())
}
