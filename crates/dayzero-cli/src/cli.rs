//! Command handlers and their clap argument types.
//!
//! Argument structs carry the clap derives and convert into the core's
//! parameter types with `From`, keeping the core free of CLI concerns:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → DayPlanner
//! ```

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use dayzero_core::{
    params::{
        AddGoal, CompleteOnboarding, GeneratePlan, GoalId, ListHistory, ToggleTask, UpdateGoal,
    },
    DayPlanner, EnergyLevel, GoalStatus, OperationStatus, Priority, SyncEvent,
};
use log::{info, warn};

use crate::renderer::TerminalRenderer;

/// Create the profile with a first goal
#[derive(Args)]
pub struct OnboardArgs {
    /// The first thing you want to achieve
    pub goal: String,
    /// Time frame for the goal ("1 Month", "3 Months", ...)
    #[arg(short, long)]
    pub timeline: Option<String>,
    /// Hours per day you can invest (1-12)
    #[arg(short = 'b', long, default_value_t = 2.0)]
    pub bandwidth: f64,
    /// Self-assessed level: Novice, Adept or Elite
    #[arg(short, long)]
    pub proficiency: Option<String>,
}

impl From<OnboardArgs> for CompleteOnboarding {
    fn from(val: OnboardArgs) -> Self {
        CompleteOnboarding {
            goal: val.goal,
            timeline: val.timeline,
            daily_bandwidth: val.bandwidth,
            proficiency: val.proficiency,
        }
    }
}

/// Add a goal
#[derive(Args)]
pub struct AddGoalArgs {
    /// Title of the goal
    pub title: String,
    #[arg(short, long, value_enum, default_value_t = PriorityArg::High)]
    pub priority: PriorityArg,
    /// Category tag ("Development", "Health", ...)
    #[arg(short, long)]
    pub category: Option<String>,
    /// Free-text deadline
    #[arg(short, long)]
    pub deadline: Option<String>,
}

impl From<AddGoalArgs> for AddGoal {
    fn from(val: AddGoalArgs) -> Self {
        AddGoal {
            title: val.title,
            priority: val.priority.into(),
            category: val.category,
            deadline: val.deadline,
        }
    }
}

/// Change a goal in place
///
/// Passing an empty string to --category or --deadline clears that field.
#[derive(Args)]
pub struct UpdateGoalArgs {
    #[arg(help = "Identifier of the goal to update")]
    pub id: String,
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long, value_enum)]
    pub priority: Option<PriorityArg>,
    #[arg(short, long)]
    pub category: Option<String>,
    #[arg(short, long)]
    pub deadline: Option<String>,
    #[arg(short, long, value_enum)]
    pub status: Option<GoalStatusArg>,
}

impl From<UpdateGoalArgs> for UpdateGoal {
    fn from(val: UpdateGoalArgs) -> Self {
        UpdateGoal {
            id: val.id,
            title: val.title,
            priority: val.priority.map(Into::into),
            category: val.category,
            deadline: val.deadline,
            status: val.status.map(Into::into),
        }
    }
}

/// Delete a goal
#[derive(Args)]
pub struct DeleteGoalArgs {
    #[arg(help = "Identifier of the goal to delete")]
    pub id: String,
}

impl From<DeleteGoalArgs> for GoalId {
    fn from(val: DeleteGoalArgs) -> Self {
        GoalId { id: val.id }
    }
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Add a goal
    #[command(alias = "a")]
    Add(AddGoalArgs),
    /// List all goals
    #[command(aliases = ["l", "ls"])]
    List,
    /// Change a goal
    #[command(alias = "u")]
    Update(UpdateGoalArgs),
    /// Delete a goal (the last one cannot be deleted)
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteGoalArgs),
}

/// Generate today's plan
#[derive(Args)]
pub struct GenerateArgs {
    /// Energy level to plan for; defaults to the current plan's level
    #[arg(short, long, value_enum)]
    pub energy: Option<EnergyArg>,
    /// Hours available today; defaults to the profile's daily bandwidth
    #[arg(long)]
    pub hours: Option<f64>,
}

impl From<GenerateArgs> for GeneratePlan {
    fn from(val: GenerateArgs) -> Self {
        GeneratePlan {
            energy_level: val.energy.map(Into::into),
            available_hours: val.hours,
            user_initiated: true,
        }
    }
}

/// Toggle a task
#[derive(Args)]
pub struct ToggleArgs {
    /// 1-based task number as shown by `dz today`
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub number: u32,
}

impl From<ToggleArgs> for ToggleTask {
    fn from(val: ToggleArgs) -> Self {
        ToggleTask {
            index: val.number as usize - 1,
        }
    }
}

/// List archived days
#[derive(Args)]
pub struct HistoryArgs {
    /// Oldest first instead of newest first
    #[arg(long)]
    pub oldest_first: bool,
    /// Show at most this many days
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

impl From<HistoryArgs> for ListHistory {
    fn from(val: HistoryArgs) -> Self {
        ListHistory {
            newest_first: !val.oldest_first,
            limit: val.limit,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    High,
    Medium,
    Low,
}

impl From<PriorityArg> for Priority {
    fn from(val: PriorityArg) -> Self {
        match val {
            PriorityArg::High => Priority::High,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::Low => Priority::Low,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum GoalStatusArg {
    Active,
    Paused,
    Completed,
}

impl From<GoalStatusArg> for GoalStatus {
    fn from(val: GoalStatusArg) -> Self {
        match val {
            GoalStatusArg::Active => GoalStatus::Active,
            GoalStatusArg::Paused => GoalStatus::Paused,
            GoalStatusArg::Completed => GoalStatus::Completed,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum EnergyArg {
    High,
    Medium,
    Low,
}

impl From<EnergyArg> for EnergyLevel {
    fn from(val: EnergyArg) -> Self {
        match val {
            EnergyArg::High => EnergyLevel::High,
            EnergyArg::Medium => EnergyLevel::Medium,
            EnergyArg::Low => EnergyLevel::Low,
        }
    }
}

/// Runs commands against one planner and prints their results.
pub struct Cli {
    planner: DayPlanner,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(planner: DayPlanner, renderer: TerminalRenderer) -> Self {
        Self { planner, renderer }
    }

    pub async fn handle_goal_command(&self, command: GoalCommands) -> Result<()> {
        match command {
            GoalCommands::Add(args) => {
                let result = self.planner.add_goal_result(&args.into()).await?;
                self.renderer.render(&result)
            }
            GoalCommands::List => {
                let goals = self.planner.list_goals_result().await?;
                self.renderer.render(&goals)
            }
            GoalCommands::Update(args) => {
                let result = self.planner.update_goal_result(&args.into()).await?;
                self.renderer.render(&result)
            }
            GoalCommands::Delete(args) => {
                let result = self.planner.delete_goal_result(&args.into()).await?;
                self.renderer.render(&result)
            }
        }
    }

    pub async fn onboard(&self, args: OnboardArgs) -> Result<()> {
        let profile = self.planner.complete_onboarding(&args.into()).await?;
        self.renderer
            .render(&OperationStatus::success("Profile created"))?;
        self.renderer.render(&profile)
    }

    pub async fn generate(&self, args: GenerateArgs) -> Result<()> {
        let outcome = self.planner.generate_plan(&args.into()).await?;
        self.renderer.render(&outcome)
    }

    pub async fn today(&self) -> Result<()> {
        match self.planner.active_session().await? {
            Some(session) => self.renderer.render(&session),
            None => self
                .renderer
                .render(&"No plan for today. Run `dz generate` to create one.\n"),
        }
    }

    pub async fn toggle(&self, args: ToggleArgs) -> Result<()> {
        let result = self.planner.toggle_task_result(&args.into()).await?;
        self.renderer.render(&result)
    }

    pub async fn archive(&self) -> Result<()> {
        let result = self.planner.archive_today_result().await?;
        self.renderer.render(&result)
    }

    pub async fn history(&self, args: HistoryArgs) -> Result<()> {
        let entries = self.planner.list_history_result(&args.into()).await?;
        self.renderer.render(&entries)
    }

    pub async fn profile(&self) -> Result<()> {
        let profile = self.planner.get_profile().await?;
        self.renderer.render(&profile)
    }

    /// Follows the profile until Ctrl-C.
    pub async fn watch(&self) -> Result<()> {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Could not listen for Ctrl-C: {e}");
                std::future::pending::<()>().await;
            }
            info!("Ctrl-C received");
        };

        let mut goal_count = None;
        self.planner
            .run_sync(shutdown, |event| {
                let text = match event {
                    SyncEvent::Profile(profile) => {
                        // Only announce changes to the goal set
                        if goal_count == Some(profile.goal_count()) {
                            return;
                        }
                        goal_count = Some(profile.goal_count());
                        format!("Watching {} goals\n", profile.goal_count())
                    }
                    SyncEvent::Regenerated(session) => {
                        format!("New plan for the updated goals\n\n{session}")
                    }
                    SyncEvent::RegenerationFailed { message } => {
                        OperationStatus::failure(format!("Automatic regeneration failed: {message}"))
                            .to_string()
                    }
                    SyncEvent::StaleArchived(entry) => {
                        format!("Archived plan from {} (score {})\n", entry.id, entry.score)
                    }
                    SyncEvent::StaleSession {
                        session_date,
                        today,
                    } => format!(
                        "The current plan is from {session_date}, today is {today}. Run `dz archive` to start fresh.\n"
                    ),
                };
                if let Err(e) = self.renderer.render(&text) {
                    warn!("Could not render sync event: {e}");
                }
            })
            .await?;
        Ok(())
    }
}
