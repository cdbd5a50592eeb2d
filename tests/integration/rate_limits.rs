use super::support::{at, Router, StubBackend};
use super::IntegrationHarness;
use abroadpath::onboarding::{AnswerPatch, Destination, HandoffOutcome, Identity, StudyGoal, YesNo};
use abroadpath::ratelimit::RateLimitDecision;
use abroadpath::workspace::AppConfig;
use abroadpath::EventType;
use anyhow::Result;

#[test]
fn chat_cooldown_persists_across_reloads() -> Result<()> {
    let harness = IntegrationHarness::new();
    {
        let mut app = harness.app();
        assert_eq!(app.guard_outbound("chat", at(0))?, RateLimitDecision::Allowed);
    }
    let mut app = harness.app();
    let decision = app.guard_outbound("chat", at(2))?;
    assert_eq!(decision.remaining_secs(), 3);
    assert!(app.guard_outbound("chat", at(5))?.is_allowed());

    let limited = app.log().events_of(EventType::RateLimited)?;
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].details["action"], "chat");
    Ok(())
}

#[test]
fn configured_cooldowns_override_defaults() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut config = AppConfig::default();
    config.rate_limits.cooldowns.insert("workflow-webhook".into(), 1);
    let mut app = harness.app_with(config);

    assert!(app.guard_outbound("workflow-webhook", at(0))?.is_allowed());
    assert!(app.guard_outbound("workflow-webhook", at(1))?.is_allowed());

    assert!(app.guard_outbound("unknown-action", at(0))?.is_allowed());
    let decision = app.guard_outbound("unknown-action", at(29))?;
    assert_eq!(decision.remaining_secs(), 1);
    Ok(())
}

#[test]
fn completing_off_ready_leaves_profile_sync_cooldown_untouched() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut app = harness.app();
    let mut backend = StubBackend::signed_in("student-5");
    let mut router = Router::default();
    let owner = Identity::new("student-5");
    {
        let mut session = app.onboarding(Some(&owner))?;
        session.set(
            AnswerPatch::new()
                .study_goal(StudyGoal::Bachelor)
                .destination(Destination::Uk)
                .knows_universities(YesNo::No)
                .country("ghana"),
        )?;
    }

    let err = app
        .complete_onboarding(&mut backend, &mut router, at(0))
        .unwrap_err();
    assert!(err.to_string().contains("ready"));

    app.onboarding(Some(&owner))?.set_step(100)?;
    let outcome = app.complete_onboarding(&mut backend, &mut router, at(1))?;
    assert!(matches!(outcome, HandoffOutcome::Persisted { .. }));
    assert!(app.log().events_of(EventType::RateLimited)?.is_empty());
    Ok(())
}
