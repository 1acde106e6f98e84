//! Tests for the planner module.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use jiff::{tz::TimeZone, Timestamp};
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::Notify;

use super::*;
use crate::{
    error::ErrorKind,
    generation::{parse_plan, GeneratedPlan, GenerationRequest, RequestedGoal},
    models::{EnergyLevel, GoalStatus, Priority},
    params::{AddGoal, CompleteOnboarding, GeneratePlan, GoalId, ListHistory, ToggleTask, UpdateGoal},
    store::{DocumentStore, SqliteStore},
};

/// 2026-10-19 12:00:00 UTC
const NOON: i64 = 1_792_411_200;
const DAY: i64 = 86_400;

const PLAN: &str = r#"```json
{
    "theme": "Foundations",
    "tasks": [
        {"time": "09:00 - 10:00", "task": "Read the docs", "type": "work", "related_goal_name": "Learn Rust", "completed": true},
        {"time": "10:00 - 10:15", "task": "Stretch", "type": "break"},
        {"time": "10:15 - 11:30", "task": "Borrow checker kata", "type": "boss_fight"}
    ]
}
```"#;

/// Generation service double that records requests.
#[derive(Default)]
struct StubGenerator {
    calls: AtomicUsize,
    fail: AtomicBool,
    requests: Mutex<Vec<GenerationRequest>>,
    gate: Option<Arc<Notify>>,
}

impl StubGenerator {
    fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Default::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> Option<GenerationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PlanGenerator for StubGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedPlan> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(DayZeroError::GenerationStatus {
                status: 500,
                body: "model overloaded".to_string(),
            });
        }
        parse_plan(PLAN)
    }
}

struct Fixture {
    _temp_dir: TempDir,
    store: Arc<SqliteStore>,
    generator: Arc<StubGenerator>,
}

impl Fixture {
    async fn new(generator: StubGenerator) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(
            SqliteStore::open(temp_dir.path().join("test.db"))
                .await
                .expect("Failed to open store"),
        );
        Self {
            _temp_dir: temp_dir,
            store,
            generator: Arc::new(generator),
        }
    }

    async fn planner_at(&self, second: i64, policy: StaleSessionPolicy) -> DayPlanner {
        DayPlannerBuilder::new("test-user")
            .with_store(self.store.clone())
            .with_generator(self.generator.clone())
            .with_clock(Clock::fixed(
                Timestamp::from_second(second).unwrap(),
                TimeZone::UTC,
            ))
            .with_stale_policy(policy)
            .build()
            .await
            .expect("Failed to create planner")
    }

    async fn planner(&self) -> DayPlanner {
        self.planner_at(NOON, StaleSessionPolicy::Trust).await
    }
}

fn onboarding() -> CompleteOnboarding {
    CompleteOnboarding {
        goal: "Learn Rust".to_string(),
        timeline: Some("3 Months".to_string()),
        daily_bandwidth: 3.0,
        proficiency: Some("adept".to_string()),
    }
}

fn add_goal(title: &str) -> AddGoal {
    AddGoal {
        title: title.to_string(),
        priority: Priority::Medium,
        category: Some("Side project".to_string()),
        deadline: None,
    }
}

/// Helper function to create an onboarded planner
async fn create_test_planner() -> (Fixture, DayPlanner) {
    let fixture = Fixture::new(StubGenerator::default()).await;
    let planner = fixture.planner().await;
    planner
        .complete_onboarding(&onboarding())
        .await
        .expect("Failed to onboard");
    (fixture, planner)
}

#[tokio::test]
async fn test_missing_profile() {
    let fixture = Fixture::new(StubGenerator::default()).await;
    let planner = fixture.planner().await;

    let err = planner.get_profile().await.unwrap_err();
    assert!(matches!(err, DayZeroError::ProfileNotFound { .. }));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_builder_rejects_empty_user() {
    let result = DayPlannerBuilder::new("  ").build().await;
    assert!(matches!(result, Err(DayZeroError::Configuration { .. })));
}

#[tokio::test]
async fn test_complete_onboarding_writes_migrated_shape() {
    let (fixture, planner) = create_test_planner().await;

    let profile = planner.get_profile().await.unwrap();
    assert!(profile.onboarding_completed);
    assert_eq!(profile.daily_bandwidth, 3.0);
    assert_eq!(profile.proficiency.as_deref(), Some("Adept"));
    assert_eq!(profile.created_at, Some(Timestamp::from_second(NOON).unwrap()));
    assert_eq!(profile.goals.len(), 1);
    assert_eq!(profile.goals[0].title, "Learn Rust");
    assert_eq!(profile.goals[0].deadline.as_deref(), Some("3 Months"));
    assert_eq!(profile.goals[0].priority, Priority::High);

    let raw = fixture
        .store
        .subscribe(planner.user_id())
        .await
        .unwrap()
        .borrow()
        .clone();
    assert!(!raw.fields.contains_key("goal"));
    assert!(!raw.fields.contains_key("activeSession"));

    let err = planner.complete_onboarding(&onboarding()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_complete_onboarding_validation() {
    let fixture = Fixture::new(StubGenerator::default()).await;
    let planner = fixture.planner().await;

    let cases = [
        CompleteOnboarding {
            goal: "   ".to_string(),
            ..onboarding()
        },
        CompleteOnboarding {
            daily_bandwidth: 0.0,
            ..onboarding()
        },
        CompleteOnboarding {
            daily_bandwidth: 13.0,
            ..onboarding()
        },
        CompleteOnboarding {
            proficiency: Some("Wizard".to_string()),
            ..onboarding()
        },
    ];
    for params in cases {
        let err = planner.complete_onboarding(&params).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    assert!(planner.current_profile().await.unwrap().is_none());
}

#[tokio::test]
async fn test_legacy_profile_is_migrated_on_read() {
    let fixture = Fixture::new(StubGenerator::default()).await;
    let planner = fixture.planner().await;

    let legacy = json!({
        "goal": "Learn React Native",
        "timeline": "6 Months",
        "dailyBandwidth": 2,
        "proficiency": "Novice",
        "onboardingCompleted": true,
        "createdAt": "2026-10-17T08:00:00Z"
    });
    let serde_json::Value::Object(fields) = legacy else {
        unreachable!()
    };
    fixture
        .store
        .merge_write(planner.user_id(), fields)
        .await
        .unwrap();

    let goals = planner.list_goals().await.unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].title, "Learn React Native");
    assert_eq!(goals[0].deadline.as_deref(), Some("6 Months"));

    // Reading again does not synthesize another goal
    assert_eq!(planner.list_goals().await.unwrap(), goals);
}

#[tokio::test]
async fn test_generate_plan_for_legacy_profile() {
    let fixture = Fixture::new(StubGenerator::default()).await;
    let planner = fixture.planner().await;

    let legacy = json!({
        "goal": "Learn Rust",
        "timeline": "1 Month",
        "dailyBandwidth": 4,
        "onboardingCompleted": true
    });
    let serde_json::Value::Object(fields) = legacy else {
        unreachable!()
    };
    fixture
        .store
        .merge_write(planner.user_id(), fields)
        .await
        .unwrap();

    let outcome = planner
        .generate_plan(&GeneratePlan::user(EnergyLevel::High))
        .await
        .unwrap();
    let GenerationOutcome::Generated(session) = outcome else {
        panic!("expected a generated session");
    };
    assert_eq!(session.generated_goal_count, Some(1));

    let request = fixture.generator.last_request().unwrap();
    assert_eq!(
        request.goals,
        vec![RequestedGoal {
            title: "Learn Rust".to_string(),
            priority: Priority::High,
            category: None,
        }]
    );
    assert_eq!(planner.list_goals().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_goal() {
    let (_fixture, planner) = create_test_planner().await;

    let goal = planner.add_goal(&add_goal("  Build a CLI  ")).await.unwrap();
    assert_eq!(goal.title, "Build a CLI");
    assert_eq!(goal.status, GoalStatus::Active);
    assert_eq!(goal.category.as_deref(), Some("Side project"));

    let goals = planner.list_goals().await.unwrap();
    assert_eq!(goals.len(), 2);
    assert_eq!(goals[1], goal);
}

#[tokio::test]
async fn test_add_goal_rejects_empty_title() {
    let (_fixture, planner) = create_test_planner().await;

    let err = planner.add_goal(&add_goal(" ")).await.unwrap_err();
    assert!(matches!(err, DayZeroError::InvalidInput { ref field, .. } if field == "title"));
    assert_eq!(planner.list_goals().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_goal() {
    let (_fixture, planner) = create_test_planner().await;
    let goal = planner.add_goal(&add_goal("Build a CLI")).await.unwrap();

    let updated = planner
        .update_goal(&UpdateGoal {
            id: goal.id.clone(),
            title: Some("Build a TUI".to_string()),
            priority: Some(Priority::Low),
            category: Some(String::new()),
            status: Some(GoalStatus::Paused),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.id, goal.id);
    assert_eq!(updated.title, "Build a TUI");
    assert_eq!(updated.priority, Priority::Low);
    assert_eq!(updated.category, None);
    assert_eq!(updated.status, GoalStatus::Paused);
    assert_eq!(updated.created_at, goal.created_at);

    let result = planner
        .update_goal_result(&UpdateGoal {
            id: goal.id.clone(),
            deadline: Some("1 Year".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(result.changes, vec!["Deadline: 1 Year".to_string()]);
}

#[tokio::test]
async fn test_update_goal_errors() {
    let (_fixture, planner) = create_test_planner().await;
    let goal_id = planner.list_goals().await.unwrap()[0].id.clone();

    let err = planner
        .update_goal(&UpdateGoal {
            id: "missing".to_string(),
            priority: Some(Priority::Low),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DayZeroError::GoalNotFound { .. }));

    let err = planner
        .update_goal(&UpdateGoal {
            id: goal_id.clone(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = planner
        .update_goal(&UpdateGoal {
            id: goal_id,
            title: Some(String::new()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_delete_goal_respects_floor() {
    let (_fixture, planner) = create_test_planner().await;
    let only = planner.list_goals().await.unwrap()[0].clone();

    let err = planner
        .delete_goal(&GoalId { id: only.id.clone() })
        .await
        .unwrap_err();
    assert!(matches!(err, DayZeroError::LastGoal { .. }));
    assert_eq!(err.kind(), ErrorKind::InvariantViolation);
    assert_eq!(planner.list_goals().await.unwrap(), vec![only.clone()]);

    let second = planner.add_goal(&add_goal("Second")).await.unwrap();
    let removed = planner
        .delete_goal(&GoalId { id: only.id.clone() })
        .await
        .unwrap();
    assert_eq!(removed.id, only.id);
    assert_eq!(planner.list_goals().await.unwrap(), vec![second]);

    let err = planner
        .delete_goal(&GoalId {
            id: "missing".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DayZeroError::GoalNotFound { .. }));
}

#[tokio::test]
async fn test_generate_plan() {
    let (fixture, planner) = create_test_planner().await;
    planner.add_goal(&add_goal("Build a CLI")).await.unwrap();

    let outcome = planner
        .generate_plan(&GeneratePlan::user(EnergyLevel::Medium))
        .await
        .unwrap();
    let GenerationOutcome::Generated(session) = outcome else {
        panic!("expected a generated session");
    };

    assert_eq!(session.date, jiff::civil::date(2026, 10, 19));
    assert_eq!(session.energy_level, EnergyLevel::Medium);
    assert_eq!(session.generated_goal_count, Some(2));
    assert_eq!(session.theme.as_deref(), Some("Foundations"));
    assert_eq!(session.tasks.len(), 3);
    assert!(session.tasks.iter().all(|task| !task.completed));
    assert!(!session.completed);

    let request = fixture.generator.last_request().unwrap();
    assert_eq!(request.goal_count(), 2);
    assert_eq!(request.available_time_hours, 3.0);
    assert_eq!(request.day_sequence, 1);
    assert_eq!(request.energy_level, EnergyLevel::Medium);

    assert_eq!(planner.active_session().await.unwrap(), Some(session));
}

#[tokio::test]
async fn test_generate_plan_defaults_and_overrides() {
    let (fixture, planner) = create_test_planner().await;

    planner
        .generate_plan(&GeneratePlan {
            energy_level: Some(EnergyLevel::Low),
            available_hours: Some(1.5),
            user_initiated: true,
        })
        .await
        .unwrap();
    assert_eq!(fixture.generator.last_request().unwrap().available_time_hours, 1.5);

    // Without an energy level the current session's level is reused
    planner.generate_plan(&GeneratePlan::default()).await.unwrap();
    let request = fixture.generator.last_request().unwrap();
    assert_eq!(request.energy_level, EnergyLevel::Low);
    assert_eq!(request.available_time_hours, 3.0);

    // Day sequence counts from the profile's creation
    let later = fixture
        .planner_at(NOON + 2 * DAY, StaleSessionPolicy::Trust)
        .await;
    later.generate_plan(&GeneratePlan::default()).await.unwrap();
    assert_eq!(fixture.generator.last_request().unwrap().day_sequence, 3);

    let err = planner
        .generate_plan(&GeneratePlan {
            available_hours: Some(0.0),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_generate_plan_without_generator() {
    let fixture = Fixture::new(StubGenerator::default()).await;
    let planner = DayPlannerBuilder::new("test-user")
        .with_store(fixture.store.clone())
        .build()
        .await
        .unwrap();
    planner.complete_onboarding(&onboarding()).await.unwrap();

    let err = planner
        .generate_plan(&GeneratePlan::user(EnergyLevel::High))
        .await
        .unwrap_err();
    assert!(matches!(err, DayZeroError::Configuration { .. }));
}

#[tokio::test]
async fn test_failed_generation_keeps_previous_session() {
    let (fixture, planner) = create_test_planner().await;
    planner
        .generate_plan(&GeneratePlan::user(EnergyLevel::High))
        .await
        .unwrap();
    let before = planner.toggle_task(&ToggleTask { index: 0 }).await.unwrap();

    fixture.generator.fail.store(true, Ordering::SeqCst);
    let err = planner
        .generate_plan(&GeneratePlan::user(EnergyLevel::Low))
        .await
        .unwrap_err();
    assert!(err.is_retryable());

    assert_eq!(planner.active_session().await.unwrap(), Some(before));
    assert!(!planner.is_generating());
}

#[tokio::test]
async fn test_second_generation_is_suppressed() {
    let gate = Arc::new(Notify::new());
    let fixture = Fixture::new(StubGenerator::gated(gate.clone())).await;
    let planner = fixture.planner().await;
    planner.complete_onboarding(&onboarding()).await.unwrap();

    let high = GeneratePlan::user(EnergyLevel::High);
    let (first, second) = tokio::join!(
        planner.generate_plan(&high),
        async {
            let outcome = planner
                .generate_plan(&GeneratePlan::user(EnergyLevel::Low))
                .await;
            gate.notify_one();
            outcome
        }
    );

    assert!(matches!(first.unwrap(), GenerationOutcome::Generated(_)));
    assert_eq!(second.unwrap(), GenerationOutcome::Suppressed);
    assert_eq!(fixture.generator.calls(), 1);
}

#[tokio::test]
async fn test_toggle_task() {
    let (_fixture, planner) = create_test_planner().await;

    let err = planner.toggle_task(&ToggleTask { index: 0 }).await.unwrap_err();
    assert!(matches!(err, DayZeroError::NoActiveSession));

    planner
        .generate_plan(&GeneratePlan::user(EnergyLevel::High))
        .await
        .unwrap();

    let session = planner.toggle_task(&ToggleTask { index: 1 }).await.unwrap();
    assert!(session.tasks[1].completed);
    assert!(!session.tasks[0].completed);
    assert!(!session.completed);

    let session = planner.toggle_task(&ToggleTask { index: 1 }).await.unwrap();
    assert!(!session.tasks[1].completed);

    for index in 0..3 {
        planner.toggle_task(&ToggleTask { index }).await.unwrap();
    }
    assert!(planner.active_session().await.unwrap().unwrap().completed);

    let err = planner.toggle_task(&ToggleTask { index: 3 }).await.unwrap_err();
    assert!(matches!(err, DayZeroError::TaskNotFound { index: 3, len: 3 }));
}

#[tokio::test]
async fn test_archive_today() {
    let (_fixture, planner) = create_test_planner().await;

    let err = planner.archive_today().await.unwrap_err();
    assert!(matches!(err, DayZeroError::NoActiveSession));

    planner
        .generate_plan(&GeneratePlan::user(EnergyLevel::High))
        .await
        .unwrap();
    planner.toggle_task(&ToggleTask { index: 0 }).await.unwrap();

    let entry = planner.archive_today().await.unwrap();
    assert_eq!(entry.id, "2026-10-19");
    assert_eq!(entry.score, 33);
    assert_eq!(entry.completed_at, Timestamp::from_second(NOON).unwrap());
    assert_eq!(planner.active_session().await.unwrap(), None);

    let history = planner.list_history(&ListHistory::default()).await.unwrap();
    assert_eq!(history, vec![entry]);
}

#[tokio::test]
async fn test_list_history_order_and_limit() {
    let fixture = Fixture::new(StubGenerator::default()).await;
    let first_day = fixture.planner().await;
    first_day.complete_onboarding(&onboarding()).await.unwrap();

    for day in 0..3 {
        let planner = fixture
            .planner_at(NOON + day * DAY, StaleSessionPolicy::Trust)
            .await;
        planner
            .generate_plan(&GeneratePlan::user(EnergyLevel::High))
            .await
            .unwrap();
        planner.archive_today().await.unwrap();
    }

    let newest = first_day.list_history(&ListHistory::default()).await.unwrap();
    let ids: Vec<&str> = newest.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, vec!["2026-10-21", "2026-10-20", "2026-10-19"]);

    let oldest = first_day
        .list_history(&ListHistory {
            newest_first: false,
            limit: Some(2),
        })
        .await
        .unwrap();
    let ids: Vec<&str> = oldest.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, vec!["2026-10-19", "2026-10-20"]);
}

async fn stale_fixture() -> Fixture {
    let fixture = Fixture::new(StubGenerator::default()).await;
    let yesterday = fixture.planner().await;
    yesterday.complete_onboarding(&onboarding()).await.unwrap();
    yesterday
        .generate_plan(&GeneratePlan::user(EnergyLevel::High))
        .await
        .unwrap();
    fixture
}

#[tokio::test]
async fn test_stale_session_trusted() {
    let fixture = stale_fixture().await;
    let today = fixture
        .planner_at(NOON + DAY, StaleSessionPolicy::Trust)
        .await;

    let session = today.toggle_task(&ToggleTask { index: 0 }).await.unwrap();
    assert_eq!(session.date, jiff::civil::date(2026, 10, 19));
    assert!(session.tasks[0].completed);
}

#[tokio::test]
async fn test_stale_session_conflict() {
    let fixture = stale_fixture().await;
    let today = fixture
        .planner_at(NOON + DAY, StaleSessionPolicy::Conflict)
        .await;

    let err = today.toggle_task(&ToggleTask { index: 0 }).await.unwrap_err();
    assert!(matches!(err, DayZeroError::StaleSession { .. }));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let err = today
        .generate_plan(&GeneratePlan::user(EnergyLevel::High))
        .await
        .unwrap_err();
    assert!(matches!(err, DayZeroError::StaleSession { .. }));

    // Archiving is how the conflict gets resolved
    let entry = today.archive_today().await.unwrap();
    assert_eq!(entry.id, "2026-10-19");
    assert!(matches!(
        today.generate_plan(&GeneratePlan::user(EnergyLevel::High)).await,
        Ok(GenerationOutcome::Generated(_))
    ));
}

#[tokio::test]
async fn test_stale_session_archived_and_reset() {
    let fixture = stale_fixture().await;
    let today = fixture
        .planner_at(NOON + DAY, StaleSessionPolicy::ArchiveAndReset)
        .await;

    let err = today.toggle_task(&ToggleTask { index: 0 }).await.unwrap_err();
    assert!(matches!(err, DayZeroError::NoActiveSession));

    let history = today.list_history(&ListHistory::default()).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, "2026-10-19");

    let outcome = today
        .generate_plan(&GeneratePlan::user(EnergyLevel::Low))
        .await
        .unwrap();
    assert_eq!(
        outcome.session().map(|session| session.date),
        Some(jiff::civil::date(2026, 10, 20))
    );
}
