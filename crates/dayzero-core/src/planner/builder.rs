//! Builder for creating and configuring DayPlanner instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use log::debug;

use super::DayPlanner;
use crate::{
    clock::Clock,
    error::{DayZeroError, Result},
    generation::{HttpPlanGenerator, PlanGenerator},
    migration::MigrationEngine,
    models::UserId,
    profile::ProfileStore,
    session::{InFlight, StaleSessionPolicy},
    store::{DocumentStore, SqliteStore},
};

/// Hours planned for when neither the request nor the profile says.
pub const DEFAULT_AVAILABLE_HOURS: f64 = 2.0;

/// Default timeout of a generation request.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// How long to wait for the store to re-deliver a migrated profile.
const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Builder for creating and configuring DayPlanner instances.
#[derive(Clone)]
pub struct DayPlannerBuilder {
    user_id: String,
    database_path: Option<PathBuf>,
    store: Option<Arc<dyn DocumentStore>>,
    generator: Option<Arc<dyn PlanGenerator>>,
    generation_url: Option<String>,
    generation_timeout: Duration,
    stale_policy: StaleSessionPolicy,
    default_hours: f64,
    clock: Clock,
}

impl DayPlannerBuilder {
    /// Creates a builder for the user identified by `user_id`.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            database_path: None,
            store: None,
            generator: None,
            generation_url: None,
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
            stale_policy: StaleSessionPolicy::default(),
            default_hours: DEFAULT_AVAILABLE_HOURS,
            clock: Clock::system(),
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/dayzero/dayzero.db` or `~/.local/share/dayzero/dayzero.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses an already opened document store instead of a database file.
    pub fn with_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Uses the given generation service client.
    pub fn with_generator(mut self, generator: Arc<dyn PlanGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Talks to the generation service over HTTP at `url`.
    pub fn with_generation_url(mut self, url: impl Into<String>) -> Self {
        self.generation_url = Some(url.into());
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_stale_policy(mut self, policy: StaleSessionPolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    /// Hours to plan for when the request and the profile leave it open.
    pub fn with_default_hours(mut self, hours: f64) -> Self {
        self.default_hours = hours;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the configured planner instance.
    ///
    /// # Errors
    ///
    /// Returns `DayZeroError::Configuration` for an empty user id or an
    /// unusable generation URL
    /// Returns `DayZeroError::FileSystem` if the database path is invalid
    /// Returns `DayZeroError::Database` if database initialization fails
    pub async fn build(self) -> Result<DayPlanner> {
        let user_id = self.user_id.trim();
        if user_id.is_empty() {
            return Err(DayZeroError::Configuration {
                message: "user id must not be empty".to_string(),
            });
        }
        let user_id = UserId::new(user_id);

        if !(self.default_hours > 0.0 && self.default_hours <= 24.0) {
            return Err(DayZeroError::Configuration {
                message: format!("default hours out of range: {}", self.default_hours),
            });
        }

        let store = match self.store {
            Some(store) => store,
            None => {
                let db_path = match self.database_path {
                    Some(path) => path,
                    None => Self::default_database_path()?,
                };

                if let Some(parent) = db_path.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| DayZeroError::FileSystem {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
                }

                debug!("build: opening store at {}", db_path.display());
                Arc::new(SqliteStore::open(&db_path).await?) as Arc<dyn DocumentStore>
            }
        };

        let generator = match (self.generator, self.generation_url) {
            (Some(generator), _) => Some(generator),
            (None, Some(url)) => Some(Arc::new(HttpPlanGenerator::new(url, self.generation_timeout)?)
                as Arc<dyn PlanGenerator>),
            (None, None) => None,
        };

        let profiles = ProfileStore::new(store, user_id);
        let migration = MigrationEngine::new(profiles.clone(), self.clock.clone());

        Ok(DayPlanner {
            profiles,
            migration,
            generator,
            clock: self.clock,
            stale_policy: self.stale_policy,
            default_hours: self.default_hours,
            settle_timeout: DEFAULT_SETTLE_TIMEOUT,
            generating: InFlight::default(),
            archiving: InFlight::default(),
        })
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("dayzero")
            .place_data_file("dayzero.db")
            .map_err(|e| DayZeroError::XdgDirectory(e.to_string()))
    }
}
