//! DayZero CLI Application
//!
//! Command-line front end for the DayZero daily planner.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use dayzero_core::DayPlannerBuilder;
use log::{error, info};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let result = run(Args::parse()).await;
    if let Err(e) = &result {
        error!("{e:#}");
    }
    result
}

async fn run(args: Args) -> Result<()> {
    let Args {
        user,
        database_file,
        generation_url,
        stale_policy,
        no_color,
        command,
    } = args;

    let mut builder = DayPlannerBuilder::new(user)
        .with_database_path(database_file)
        .with_stale_policy(stale_policy.into());
    if let Some(url) = generation_url {
        builder = builder.with_generation_url(url);
    }
    let planner = builder.build().await.context("Failed to initialize planner")?;

    info!("DayZero started for user {}", planner.user_id());
    let cli = Cli::new(planner, TerminalRenderer::new(!no_color));

    match command {
        Some(Onboard(args)) => cli.onboard(args).await,
        Some(Goal { command }) => cli.handle_goal_command(command).await,
        Some(Generate(args)) => cli.generate(args).await.context("Plan generation failed"),
        Some(Today) | None => cli.today().await,
        Some(Toggle(args)) => cli.toggle(args).await,
        Some(Archive) => cli.archive().await,
        Some(History(args)) => cli.history(args).await,
        Some(Profile) => cli.profile().await,
        Some(Watch) => cli.watch().await,
    }
}
