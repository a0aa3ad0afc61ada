//! Onsite - coding interview simulator CLI
//!
//! ## Commands
//!
//! - `start`: begin a new interview session and show the problem
//! - `submit --file <path>`: evaluate a solution against the test battery
//! - `hint [--give-up]`: request graded guidance
//! - `status`: show the current session's progress
//! - `end`: seal the session and print its summary

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use onsite_core::{
    init_tracing, AgentDecision, EvaluationResult, ManagerConfig, OnsiteError, ReadModel,
    SessionManager, SessionSummary,
};

mod text;

#[derive(Parser)]
#[command(name = "onsite")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Single-problem coding interview simulator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Data directory for session logs (default: ~/.onsite)
    #[arg(long, global = true, env = "ONSITE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new interview session
    Start,

    /// Submit code for evaluation
    Submit {
        /// Path to your solution file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Request a hint for the current problem
    Hint {
        /// Give up and ask for the full reference approach
        #[arg(long)]
        give_up: bool,
    },

    /// Show current session status
    Status,

    /// End the current session and show the summary
    End,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    init_tracing(cli.json, level);

    let mut config = ManagerConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let mut manager = SessionManager::open(&config)
        .await
        .context("failed to open session manager")?;

    let outcome = match cli.command {
        Commands::Start => run_start(&mut manager).await,
        Commands::Submit { file } => run_submit(&mut manager, &file).await,
        Commands::Hint { give_up } => run_hint(&mut manager, give_up).await,
        Commands::Status => run_status(&manager).await,
        Commands::End => run_end(&mut manager, &config).await,
    };

    match outcome {
        Ok(()) => Ok(()),
        // Caller mistakes get a friendly line and a clean nonzero exit.
        Err(OnsiteError::Session(e)) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
        Err(e) => Err(e).context("command failed"),
    }
}

async fn run_start(manager: &mut SessionManager) -> onsite_core::Result<()> {
    let model = manager.start().await?;

    println!("Interview session started");
    println!("Session ID: {}", model.session_id);
    println!();
    println!("{}", text::problem_statement());
    println!();
    println!("When ready, submit your solution:");
    println!("  onsite submit --file your_solution.py");
    Ok(())
}

async fn run_submit(
    manager: &mut SessionManager,
    file: &std::path::Path,
) -> onsite_core::Result<()> {
    let model = manager.submit(file).await?;

    if let Some(result) = &model.last_result {
        print_result(result);
    }
    if let Some(decision) = &model.decision {
        print_decision(decision);
    }
    Ok(())
}

async fn run_hint(manager: &mut SessionManager, give_up: bool) -> onsite_core::Result<()> {
    let model = manager.hint(give_up).await?;

    if let Some(AgentDecision::GiveHint { level }) = model.decision {
        println!("Hint (level {level} of 4)");
        println!();
        println!("{}", text::hint_text(level));
    }
    Ok(())
}

async fn run_status(manager: &SessionManager) -> onsite_core::Result<()> {
    let model = manager.status().await?;
    print_status(&model);
    Ok(())
}

async fn run_end(
    manager: &mut SessionManager,
    config: &ManagerConfig,
) -> onsite_core::Result<()> {
    let session_id = manager
        .active_session_id()
        .map(str::to_string)
        .unwrap_or_default();
    let summary = manager.end().await?;

    print_summary(&summary);
    println!();
    println!(
        "Session log: {}",
        config
            .data_dir
            .join("sessions")
            .join(format!("{session_id}.jsonl"))
            .display()
    );
    Ok(())
}

fn print_result(result: &EvaluationResult) {
    println!("Evaluation result");
    println!("  Status:       {}", if result.passed { "passed" } else { "failed" });
    println!(
        "  Tests:        {}/{} passed",
        result.tests_passed,
        result.tests_passed + result.tests_failed
    );
    println!("  Category:     {}", result.failure_category);
    println!("  Runtime:      {}ms", result.runtime_ms);

    if !result.failing_tests.is_empty() {
        println!("  Failing tests:");
        for id in &result.failing_tests {
            println!("    - {id}");
        }
    }
    if let Some(exception) = &result.exception {
        println!("  Details:      {exception}");
    }
    println!();
}

fn print_decision(decision: &AgentDecision) {
    match decision {
        AgentDecision::GiveFeedback { category } => {
            println!("Feedback: {}", text::feedback_text(*category));
            println!();
            println!("Try again, or run 'onsite hint' for guidance.");
        }
        AgentDecision::OfferEnd => {
            println!("Feedback: {}", text::feedback_text(onsite_core::FailureCategory::Pass));
            println!();
            println!("Run 'onsite end' to finish and see your summary.");
        }
        AgentDecision::GiveHint { .. } => {}
    }
}

fn print_status(model: &ReadModel) {
    println!("Session status");
    println!("  Session ID:   {}", model.session_id);
    println!("  State:        {}", model.state);
    if let Some(started_at) = model.started_at {
        println!("  Started:      {}", started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!("  Attempts:     {}", model.attempt_count);
    println!("  Hints used:   {}", model.hints_given);
    if let Some(result) = &model.last_result {
        println!(
            "  Last result:  {}/{} tests passed ({})",
            result.tests_passed,
            result.tests_passed + result.tests_failed,
            result.failure_category
        );
    }
}

fn print_summary(summary: &SessionSummary) {
    println!("Interview summary");
    println!("  Session ID:     {}", summary.session_id);
    println!("  Outcome:        {}", text::outcome_text(summary.outcome));
    println!("  Total attempts: {}", summary.total_attempts);
    println!(
        "  Final result:   {}/{} tests passed",
        summary.final_tests_passed,
        summary.final_tests_passed + summary.final_tests_failed
    );
    if summary.hint_levels.is_empty() {
        println!("  Hints used:     0");
    } else {
        let levels: Vec<String> = summary.hint_levels.iter().map(|l| l.to_string()).collect();
        println!(
            "  Hints used:     {} (levels {})",
            summary.hints_used,
            levels.join(", ")
        );
    }
    println!("  Duration:       {}s", summary.duration_seconds);
}
