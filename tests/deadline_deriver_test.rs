mod common;

use std::collections::HashSet;

use chrono::{Days, NaiveDate};

use college_tracker::models::{EventCategory, TaskCategory, TaskPriority};
use college_tracker::services::deadline_deriver::{
    derive_tasks, derive_timeline, possible_event_ids, possible_task_ids,
};

use common::{application, date};

#[test]
fn test_minimal_application_yields_deadline_and_four_tasks() {
    let app = application("app-1", "2025-01-01");

    let timeline = derive_timeline(&app);
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].id, "deadline-app-1");
    assert_eq!(timeline[0].category, EventCategory::Deadline);
    assert_eq!(timeline[0].date, date("2025-01-01"));

    let tasks = derive_tasks(&app);
    let categories: Vec<_> = tasks.iter().map(|t| t.category).collect();
    assert_eq!(
        categories,
        vec![
            TaskCategory::Application,
            TaskCategory::Transcript,
            TaskCategory::TestScores,
            TaskCategory::FinancialAid,
        ]
    );
    let ids: HashSet<_> = tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids.len(), 4);
    assert!(tasks.iter().all(|t| t.due_date == app.deadline));
}

#[test]
fn test_full_application_offsets_and_ordering() {
    let mut app = application("app-2", "2025-01-01");
    app.requires_essay = true;
    app.requires_recommendations = true;
    app.decision_date = Some(date("2025-03-15"));

    let timeline = derive_timeline(&app);
    let dates: Vec<_> = timeline.iter().map(|e| e.date).collect();
    assert_eq!(
        dates,
        vec![date("2024-12-11"), date("2024-12-18"), date("2025-01-01"), date("2025-03-15")]
    );
    assert_eq!(timeline[0].id, "recommendation-deadline-app-2");
    assert_eq!(timeline[1].id, "essay-deadline-app-2");
    assert_eq!(timeline[3].category, EventCategory::Decision);
    assert!(timeline.iter().all(|e| e.important && !e.completed && !e.reminder_sent));
    assert!(timeline.iter().all(|e| e.reminder_days_before == 7));

    let tasks = derive_tasks(&app);
    assert_eq!(tasks.len(), 6);
    assert!(tasks.windows(2).all(|w| w[0].due_date <= w[1].due_date));

    let essay = tasks.iter().find(|t| t.category == TaskCategory::Essay).unwrap();
    assert_eq!(app.deadline - essay.due_date, chrono::TimeDelta::days(14));
    assert_eq!(essay.priority, TaskPriority::High);

    let rec = tasks.iter().find(|t| t.category == TaskCategory::Recommendation).unwrap();
    assert_eq!(app.deadline - rec.due_date, chrono::TimeDelta::days(21));
    assert_eq!(rec.priority, TaskPriority::High);

    let transcript = tasks.iter().find(|t| t.category == TaskCategory::Transcript).unwrap();
    assert_eq!(transcript.priority, TaskPriority::Medium);
}

#[test]
fn test_supplemental_essays_add_second_essay_task() {
    let mut app = application("app-3", "2025-01-01");
    app.requires_essay = true;
    app.requires_recommendations = true;
    app.requires_supplemental_essays = true;

    let tasks = derive_tasks(&app);
    assert_eq!(tasks.len(), 7);

    let essays: Vec<_> = tasks.iter().filter(|t| t.category == TaskCategory::Essay).collect();
    assert_eq!(essays.len(), 2);
    assert_eq!(essays[0].id, "essay-app-3");
    assert_eq!(essays[1].id, "supplemental-essays-app-3");
    assert_eq!(essays[0].due_date, essays[1].due_date);
}

#[test]
fn test_supplemental_flag_without_essay_adds_nothing() {
    let mut app = application("app-4", "2025-01-01");
    app.requires_supplemental_essays = true;

    assert_eq!(derive_tasks(&app).len(), 4);
}

#[test]
fn test_tied_due_dates_keep_emission_order() {
    let app = application("app-5", "2025-01-01");
    let ids: Vec<_> = derive_tasks(&app).into_iter().map(|t| t.id).collect();
    assert_eq!(
        ids,
        vec!["application-app-5", "transcript-app-5", "test-scores-app-5", "financial-aid-app-5"]
    );
}

#[test]
fn test_derivation_is_idempotent() {
    let mut app = application("app-6", "2025-11-01");
    app.requires_essay = true;
    app.requires_recommendations = true;
    app.requires_supplemental_essays = true;
    app.decision_date = Some(date("2025-12-15"));

    assert_eq!(derive_timeline(&app), derive_timeline(&app));
    assert_eq!(derive_tasks(&app), derive_tasks(&app));
}

#[test]
fn test_offsets_are_not_clamped_to_today() {
    // A deadline ten days out still gets an essay date in the past.
    let mut app = application("app-7", "2020-01-10");
    app.requires_essay = true;
    app.requires_recommendations = true;

    let timeline = derive_timeline(&app);
    assert_eq!(timeline[0].date, date("2019-12-20"));
    assert_eq!(timeline[1].date, date("2019-12-27"));
}

#[test]
fn test_offsets_cross_month_and_leap_day() {
    let mut app = application("app-8", "2024-03-10");
    app.requires_essay = true;
    app.requires_recommendations = true;

    let timeline = derive_timeline(&app);
    assert_eq!(timeline[0].date, date("2024-02-18"));
    assert_eq!(timeline[1].date, date("2024-02-25"));
}

#[test]
fn test_derived_ids_are_within_known_id_sets() {
    let mut app = application("app-9", "2025-01-01");
    app.requires_essay = true;
    app.requires_recommendations = true;
    app.requires_supplemental_essays = true;
    app.decision_date = Some(date("2025-04-01"));

    let event_ids = possible_event_ids(&app.id);
    assert!(derive_timeline(&app).iter().all(|e| event_ids.contains(&e.id)));
    let task_ids = possible_task_ids(&app.id);
    assert!(derive_tasks(&app).iter().all(|t| task_ids.contains(&t.id)));
}

#[test]
fn test_offsets_saturate_near_the_earliest_date() {
    let mut app = application("app-1", "2025-01-01");
    app.deadline = NaiveDate::MIN.checked_add_days(Days::new(4)).unwrap();
    app.requires_essay = true;
    app.requires_recommendations = true;

    let tasks = derive_tasks(&app);
    let timeline = derive_timeline(&app);

    let essay = tasks.iter().find(|t| t.id == "essay-app-1").unwrap();
    let recs = tasks.iter().find(|t| t.id == "recommendations-app-1").unwrap();
    assert_eq!(essay.due_date, NaiveDate::MIN);
    assert_eq!(recs.due_date, NaiveDate::MIN);
    assert_eq!(timeline.len(), 3);
    assert_eq!(timeline.last().unwrap().date, app.deadline);
}
