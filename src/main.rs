//! Interval Timer CLI - segment-based workout timer
//!
//! Manage workout plans and run them in the terminal:
//! - simple work/rest cycles
//! - built-in presets (Tabata, EMOM, ...)
//! - custom segment lists loaded from JSON

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;

use interval_timer::cli::{
    run_session, AddSimpleArgs, Cli, Commands, Display, PlanCommands, RunArgs, SessionOutcome,
};
use interval_timer::config::AppConfig;
use interval_timer::cue::TerminalBell;
use interval_timer::plan::presets::is_preset_id;
use interval_timer::plan::{PlanDefaults, PlanDraft, PlanStore, PlanStoreError};
use interval_timer::storage::FileStore;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Completions { shell }) => generate_completions(shell),
        Some(command) => {
            let config = AppConfig::load(cli.config.as_deref())?;
            let mut store = open_store(&config, cli.data_dir.as_deref())?;
            execute_with_store(&mut store, &config, command).await?;
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Executes a command that needs the plan store.
async fn execute_with_store(
    store: &mut PlanStore<FileStore>,
    config: &AppConfig,
    command: Commands,
) -> Result<()> {
    match command {
        Commands::Plans { command } => execute_plans(store, config, command)?,
        Commands::Activate { id } => {
            if !store.set_active(&id)? {
                anyhow::bail!("Plan not found: {}", id);
            }
            if let Some(plan) = store.get_by_id(&id) {
                Display::show_activated(&plan);
            }
        }
        Commands::Deactivate => {
            store.clear_active()?;
            Display::show_deactivated();
        }
        Commands::Active => Display::show_active(store.active_plan().as_ref()),
        Commands::Run(args) => run_workout(store, config, args).await?,
        Commands::Completions { shell } => generate_completions(shell),
    }

    Ok(())
}

/// Opens the file-backed plan store.
fn open_store(config: &AppConfig, data_dir: Option<&Path>) -> Result<PlanStore<FileStore>> {
    let dir = config.resolve_data_dir(data_dir)?;
    tracing::info!("Using data directory {}", dir.display());

    let backend = FileStore::open(&dir)?;
    let store = PlanStore::open(backend)
        .with_context(|| format!("Failed to load plans from {}", dir.display()))?;
    Ok(store.with_defaults(PlanDefaults {
        alert_time: config.default_alert_time,
        ..PlanDefaults::default()
    }))
}

/// Executes a `plans` subcommand.
fn execute_plans(
    store: &mut PlanStore<FileStore>,
    config: &AppConfig,
    command: PlanCommands,
) -> Result<()> {
    match command {
        PlanCommands::List => Display::show_plan_list(store.list_all(), store.active_id()),
        PlanCommands::Presets => Display::show_presets(store.presets(), store.active_id()),
        PlanCommands::Show { id } => {
            let plan = store
                .get_by_id(&id)
                .with_context(|| format!("Plan not found: {}", id))?;
            Display::show_plan(&plan, store.active_id() == Some(id.as_str()));
        }
        PlanCommands::Add { file } => {
            let draft = read_draft(&file)?;
            save_draft(store, &draft)?;
        }
        PlanCommands::AddSimple(args) => {
            let draft = simple_draft(&args, config);
            save_draft(store, &draft)?;
        }
        PlanCommands::Delete { id } => {
            if is_preset_id(&id) {
                anyhow::bail!("Built-in presets cannot be deleted");
            }
            if !store.delete_by_id(&id)? {
                anyhow::bail!("Plan not found: {}", id);
            }
            Display::show_deleted(&id);
        }
    }
    Ok(())
}

/// Reads a plan draft from a JSON file, or stdin for `-`.
fn read_draft(path: &Path) -> Result<PlanDraft> {
    let json = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("Failed to read plan from stdin")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    serde_json::from_str(&json).context("Plan file is not a valid plan JSON object")
}

fn simple_draft(args: &AddSimpleArgs, config: &AppConfig) -> PlanDraft {
    let mut draft = PlanDraft::simple(
        args.name.clone(),
        i64::from(args.work),
        i64::from(args.rest),
        i64::from(args.reps),
    )
    .with_alert_time(i64::from(args.alert.unwrap_or(config.default_alert_time)));
    if let Some(description) = &args.description {
        draft = draft.with_description(description.clone());
    }
    draft
}

fn save_draft(store: &mut PlanStore<FileStore>, draft: &PlanDraft) -> Result<()> {
    match store.save(draft) {
        Ok(id) => {
            Display::show_saved(&id);
            Ok(())
        }
        Err(PlanStoreError::Validation(err)) => {
            Display::show_validation_errors(&err.messages);
            anyhow::bail!("Plan was not saved")
        }
        Err(e) => Err(e.into()),
    }
}

/// Runs the requested or active plan in the foreground.
async fn run_workout(
    store: &mut PlanStore<FileStore>,
    config: &AppConfig,
    args: RunArgs,
) -> Result<()> {
    let id = match args.plan.or_else(|| store.active_id().map(str::to_string)) {
        Some(id) => id,
        None => anyhow::bail!("No active plan. Pass --plan <id> or run `activate <id>` first"),
    };
    let plan = store
        .get_by_id(&id)
        .with_context(|| format!("Plan not found: {}", id))?;

    store.increment_usage(&plan.id)?;

    let bell = Arc::new(TerminalBell::new(config.bell && !args.no_bell));
    let input = BufReader::new(tokio::io::stdin());
    let outcome = run_session(&plan, config.tick_interval(), bell, input).await?;

    if outcome == SessionOutcome::Interrupted {
        tracing::info!("Workout interrupted");
    }
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
