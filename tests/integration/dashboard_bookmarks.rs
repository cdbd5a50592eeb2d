use super::support::at;
use super::IntegrationHarness;
use abroadpath::gamification::Activity;
use abroadpath::onboarding::{AnswerPatch, AnswerSet, Budget, Destination, Identity};
use abroadpath::universities::UniversityQuery;
use abroadpath::workspace::AppConfig;
use abroadpath::EventType;
use anyhow::Result;
use std::fs;

#[test]
fn search_from_answers_and_bookmark_shortlist() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut app = harness.app();
    let student = Identity::new("student-3");

    let mut answers = AnswerSet::new();
    AnswerPatch::new()
        .destination(Destination::Usa)
        .field_of_study("engineering")
        .budget(Budget::new(65_000).unwrap())
        .apply_to(&mut answers);
    let hits = app.search_universities(&UniversityQuery::from_answers(&answers), at(0))?;
    let ids: Vec<&str> = hits.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["mit", "stanford", "uiuc", "asu"]);

    for id in ["stanford", "mit"] {
        assert!(app.toggle_bookmark(Some(&student), id, at(1))?);
    }
    assert!(!app.toggle_bookmark(Some(&student), "stanford", at(2))?);
    let saved: Vec<String> = app
        .bookmarks(Some(&student))?
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(saved, vec!["mit"]);
    assert!(app.bookmarks(None)?.is_empty());

    assert!(app.toggle_bookmark(Some(&student), "hogwarts", at(3)).is_err());

    let tracker = app.achievements()?;
    assert_eq!(tracker.count(Activity::UniversitySearch), 1);
    assert_eq!(tracker.count(Activity::UniversityBookmarked), 2);
    assert!(tracker.is_unlocked("first-pick"));
    assert_eq!(app.log().events_of(EventType::BookmarkRemoved)?.len(), 1);
    Ok(())
}

#[test]
fn yaml_catalog_replaces_builtin_list() -> Result<()> {
    let harness = IntegrationHarness::new();
    let catalog_dir = harness.workspace_path().join("catalog");
    fs::create_dir_all(&catalog_dir)?;
    fs::write(
        catalog_dir.join("uk.yaml"),
        concat!(
            "- id: bristol\n",
            "  name: University of Bristol\n",
            "  country: uk\n",
            "  city: Bristol\n",
            "  programs: [engineering]\n",
            "  annual_tuition_usd: 34000\n",
            "  ranking: 55\n",
        ),
    )?;
    let mut config = AppConfig::default();
    config.universities.catalog_dir = Some(catalog_dir);
    let mut app = harness.app_with(config);

    assert_eq!(app.catalog().len(), 1);
    let hits = app.search_universities(&UniversityQuery::default().with_text("bris"), at(0))?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "University of Bristol");
    Ok(())
}

#[test]
fn daily_visits_build_a_streak() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut app = harness.app();
    let day = 24 * 60 * 60;
    app.record_activity(Activity::DailyVisit, at(0))?;
    app.record_activity(Activity::DailyVisit, at(day))?;
    let unlocked = app.record_activity(Activity::DailyVisit, at(2 * day))?;
    assert!(unlocked.iter().any(|a| a.id == "regular"));

    let reopened = harness.app();
    assert_eq!(reopened.achievements()?.streak_days(), 3);
    Ok(())
}
