#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use dayzero_core::{
    generation::parse_plan,
    params::CompleteOnboarding,
    store::{DocumentStore, Snapshot, SortDirection, SqliteStore},
    Clock, DayPlanner, DayPlannerBuilder, DayZeroError, GeneratedPlan, GenerationRequest,
    PlanGenerator, Result, StaleSessionPolicy, UserId,
};
use jiff::{tz::TimeZone, Timestamp};
use serde_json::{Map, Value};
use tempfile::TempDir;
use tokio::sync::watch;

/// 2026-10-19 12:00:00 UTC
pub const NOON: i64 = 1_792_411_200;

/// Five tasks, reported by the service as partly complete.
pub const FIVE_TASK_PLAN: &str = r#"{
    "theme": "Ship it",
    "tasks": [
        {"time": "08:00 - 09:00", "task": "Plan the release", "type": "work", "completed": true},
        {"time": "09:00 - 10:30", "task": "Fix flaky test", "type": "boss_fight", "related_goal_name": "Launch"},
        {"time": "10:30 - 10:45", "task": "Coffee", "type": "break", "completed": true},
        {"time": "10:45 - 12:00", "task": "Write changelog", "type": "work"},
        {"time": "13:00 - 14:00", "task": "Tag the release", "type": "work", "related_goal_name": "Launch"}
    ]
}"#;

/// Generation service double.
#[derive(Default)]
pub struct StubGenerator {
    calls: AtomicUsize,
    pub fail: AtomicBool,
}

impl StubGenerator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlanGenerator for StubGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<GeneratedPlan> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(DayZeroError::GenerationStatus {
                status: 502,
                body: "bad gateway".to_string(),
            });
        }
        parse_plan(FIVE_TASK_PLAN)
    }
}

/// Store wrapper whose record writes and field deletes can be made to fail.
pub struct FlakyStore {
    inner: SqliteStore,
    pub fail_records: AtomicBool,
    pub fail_deletes: AtomicBool,
}

impl FlakyStore {
    fn unavailable(operation: &str) -> DayZeroError {
        DayZeroError::StoreUnavailable {
            message: format!("{operation} rejected"),
        }
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn subscribe(&self, user_id: &UserId) -> Result<watch::Receiver<Snapshot>> {
        self.inner.subscribe(user_id).await
    }

    async fn merge_write(&self, user_id: &UserId, fields: Map<String, Value>) -> Result<()> {
        self.inner.merge_write(user_id, fields).await
    }

    async fn delete_field(&self, user_id: &UserId, field: &str) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Self::unavailable("delete"));
        }
        self.inner.delete_field(user_id, field).await
    }

    async fn write_record(
        &self,
        user_id: &UserId,
        collection: &str,
        record_id: &str,
        record: Value,
    ) -> Result<()> {
        if self.fail_records.load(Ordering::SeqCst) {
            return Err(Self::unavailable("record write"));
        }
        self.inner
            .write_record(user_id, collection, record_id, record)
            .await
    }

    async fn query_ordered(
        &self,
        user_id: &UserId,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Value>> {
        self.inner
            .query_ordered(user_id, collection, order_by, direction)
            .await
    }
}

pub struct TestEnv {
    pub temp_dir: TempDir,
    pub store: Arc<FlakyStore>,
    pub generator: Arc<StubGenerator>,
}

impl TestEnv {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let inner = SqliteStore::open(temp_dir.path().join("test.db"))
            .await
            .expect("Failed to open store");
        Self {
            temp_dir,
            store: Arc::new(FlakyStore {
                inner,
                fail_records: AtomicBool::new(false),
                fail_deletes: AtomicBool::new(false),
            }),
            generator: Arc::new(StubGenerator::default()),
        }
    }

    /// A planner for `user` sharing this environment's store and generator.
    pub async fn planner(&self, user: &str) -> DayPlanner {
        DayPlannerBuilder::new(user)
            .with_store(self.store.clone())
            .with_generator(self.generator.clone())
            .with_clock(Clock::fixed(
                Timestamp::from_second(NOON).unwrap(),
                TimeZone::UTC,
            ))
            .with_stale_policy(StaleSessionPolicy::Trust)
            .build()
            .await
            .expect("Failed to create planner")
    }
}

impl TestEnv {
    /// A planner for `user` with its own connection to this environment's
    /// database file, standing in for another process.
    pub async fn separate_planner(&self, user: &str) -> DayPlanner {
        DayPlannerBuilder::new(user)
            .with_database_path(Some(self.temp_dir.path().join("test.db")))
            .with_generator(self.generator.clone())
            .with_clock(Clock::fixed(
                Timestamp::from_second(NOON).unwrap(),
                TimeZone::UTC,
            ))
            .build()
            .await
            .expect("Failed to create planner")
    }
}

/// Helper function to create an onboarded test planner
pub async fn create_test_planner() -> (TestEnv, DayPlanner) {
    let env = TestEnv::new().await;
    let planner = env.planner("test-user").await;
    planner
        .complete_onboarding(&CompleteOnboarding {
            goal: "Launch".to_string(),
            timeline: Some("1 Month".to_string()),
            daily_bandwidth: 6.0,
            proficiency: Some("Elite".to_string()),
        })
        .await
        .expect("Failed to onboard");
    (env, planner)
}

/// Polls `condition` until it holds, failing the test after two seconds.
pub async fn wait_until(condition: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
