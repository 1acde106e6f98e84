use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use dayzero_core::StaleSessionPolicy;

use crate::cli::{GenerateArgs, GoalCommands, HistoryArgs, OnboardArgs, ToggleArgs};

/// Command-line front end for the DayZero daily planner
///
/// DayZero turns a small set of goals into a daily plan produced by a
/// generation service, tracks task completion during the day and archives
/// finished days into a scored history. Running `dz` without a command shows
/// today's plan.
#[derive(Parser)]
#[command(version, about, name = "dz")]
pub struct Args {
    /// Identifier of the user whose profile is used
    #[arg(long, global = true, env = "DAYZERO_USER", default_value = "local")]
    pub user: String,

    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/dayzero/dayzero.db
    #[arg(long, global = true, env = "DAYZERO_DATABASE")]
    pub database_file: Option<PathBuf>,

    /// URL of the plan generation service
    #[arg(long, global = true, env = "DAYZERO_GENERATION_URL")]
    pub generation_url: Option<String>,

    /// What to do with a plan left over from an earlier day
    #[arg(long, global = true, value_enum, default_value_t = StalePolicyArg::Trust)]
    pub stale_policy: StalePolicyArg,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the DayZero CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Create the profile with a first goal
    Onboard(OnboardArgs),
    /// Manage goals
    #[command(alias = "g")]
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Generate today's plan from the current goals
    #[command(alias = "gen")]
    Generate(GenerateArgs),
    /// Show today's plan
    #[command(alias = "t")]
    Today,
    /// Mark a task of today's plan done or not done
    Toggle(ToggleArgs),
    /// Move today's plan into history
    Archive,
    /// List archived days
    #[command(alias = "h")]
    History(HistoryArgs),
    /// Show the profile
    Profile,
    /// Follow the profile and regenerate the plan when goals are added
    Watch,
}

/// Command-line representation of [`StaleSessionPolicy`].
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum StalePolicyArg {
    /// Keep using yesterday's plan as today's
    Trust,
    /// Archive yesterday's plan before working on today
    Archive,
    /// Refuse to touch yesterday's plan until it is archived
    Conflict,
}

impl From<StalePolicyArg> for StaleSessionPolicy {
    fn from(val: StalePolicyArg) -> Self {
        match val {
            StalePolicyArg::Trust => StaleSessionPolicy::Trust,
            StalePolicyArg::Archive => StaleSessionPolicy::ArchiveAndReset,
            StalePolicyArg::Conflict => StaleSessionPolicy::Conflict,
        }
    }
}
