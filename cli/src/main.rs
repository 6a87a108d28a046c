//! CLI entrypoint for Council Chamber
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{
    CouncilOrchestrator, NoProgress, ProgressNotifier, RunOutcome, RunSessionInput,
    RunSessionOutput,
};
use council_domain::{CouncilSettings, OutputFormat};
use council_infrastructure::{
    ConfigLoader, FileConfig, JsonFilePersistence, JsonlConversationLogger, JsonlPrecedentStore,
    LocalToolExecutor, MemorySessionStore, NoPersistence, OpenAiCompatConfig,
    OpenAiCompatInvoker, SessionBudgetGuard, SessionPersistence,
};
use council_presentation::{
    Cli, ConsoleFormatter, OutputConfig, OutputFormatter, ProgressReporter, SimpleProgress,
};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Held until exit so buffered log lines reach the file
    let _log_guard = init_logging(&cli);

    info!("Starting Council Chamber");

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("failed to load configuration")?
    };

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let output_config = OutputConfig::resolve(
        cli.output.map(OutputFormat::from),
        config.output.parse_format(),
        config.output.color,
        cli.quiet,
    );
    output_config.apply_color();

    check_config(&config, cli.concurrency)?;

    if cli.check_provider {
        return check_provider(&config).await;
    }
    if cli.list_precedents {
        return list_precedents(&config);
    }
    if let Some(session_id) = &cli.show_session {
        return show_session(&config, session_id, output_config.format);
    }

    let (mut roster, _) = config.roster();

    if cli.list_personas {
        println!("{}", ConsoleFormatter::format_roster(&roster));
        return Ok(());
    }

    if !cli.councilors.is_empty() {
        if let Some(unknown) = cli.councilors.iter().find(|id| roster.by_id(id).is_none()) {
            bail!("Unknown councilor '{}'. Use --list-personas to see the catalog.", unknown);
        }
        roster.enable_only(&cli.councilors);
    }

    let Some(topic) = cli.topic.clone() else {
        bail!("A topic is required. Use --list-personas or --show-config for information only.");
    };

    let settings = CouncilSettings::new(roster.clone(), cli.mode_settings(config.council.economy))
        .with_max_concurrency(
            cli.concurrency
                .unwrap_or(config.council.max_concurrency)
                .max(1),
        );

    // === Dependency Injection ===
    let invoker = OpenAiCompatInvoker::new(OpenAiCompatConfig::from(&config.provider))
        .context("failed to create the model invoker")?;

    let persistence: Box<dyn SessionPersistence> =
        match config.storage.sessions_dir().filter(|_| config.storage.persist) {
            Some(dir) => Box::new(JsonFilePersistence::new(dir)),
            None => Box::new(NoPersistence),
        };
    let store = Arc::new(MemorySessionStore::new(
        persistence,
        Duration::from_millis(config.storage.debounce_ms),
    ));

    let tools = LocalToolExecutor::new(std::env::current_dir()?)
        .context("failed to open the working directory for tools")?;

    let params = config
        .council
        .orchestrator_params(config.provider.max_tokens)
        .with_seed(cli.seed.or(config.council.seed));

    let mut orchestrator = CouncilOrchestrator::new(Arc::new(invoker), store.clone())
        .with_budget_guard(Arc::new(SessionBudgetGuard::new(
            config.budget.max_concurrent_calls,
            config.budget.max_session_tokens,
        )))
        .with_tools(Arc::new(tools))
        .with_params(params);

    if let Some(path) = config.storage.precedent_file() {
        match JsonlPrecedentStore::open(&path) {
            Ok(precedents) => orchestrator = orchestrator.with_precedent_store(Arc::new(precedents)),
            Err(e) => warn!(path = %path.display(), error = %e, "Precedent store unavailable"),
        }
    }
    if let Some(path) = config.storage.conversation_log()
        && let Some(logger) = JsonlConversationLogger::new(&path)
    {
        orchestrator = orchestrator.with_conversation_logger(Arc::new(logger));
    }
    let orchestrator = Arc::new(orchestrator);

    // Build input
    let session_id = uuid::Uuid::new_v4().to_string();
    let mut input = RunSessionInput::new(&session_id, topic.clone(), settings);
    if let Some(context) = &cli.context {
        input = input.with_context(context);
    }
    if let Some(prompt) = &cli.prompt {
        input = input.with_user_prompt(prompt);
    }

    // Print header
    if output_config.show_progress {
        println!();
        println!("+============================================================+");
        println!("|           Council Chamber - AI Council                     |");
        println!("+============================================================+");
        println!();
        println!("Topic: {}", topic);
        println!("Mode: {}", cli.mode.as_str());
        println!(
            "Council: {}",
            roster
                .enabled()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!();
    }

    // Ctrl-C stops the session at its next checkpoint
    let stopper = {
        let orchestrator = orchestrator.clone();
        let session_id = session_id.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nStopping the session...");
                orchestrator.stop_session(&session_id);
            }
        })
    };

    // Spinners and log lines fight over the terminal, so verbose runs get plain lines
    let progress: Box<dyn ProgressNotifier> = if !output_config.show_progress {
        Box::new(NoProgress)
    } else if cli.verbose > 0 {
        Box::new(SimpleProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let result = orchestrator
        .run_session_with_progress(input, progress.as_ref())
        .await;
    stopper.abort();
    store.flush();
    let output = result?;

    let formatter = ConsoleFormatter::new().with_roster(&roster);
    println!("{}", formatter.format(&output, output_config.format));

    if let RunOutcome::Failed(reason) = &output.outcome {
        bail!("Session failed: {}", reason);
    }

    Ok(())
}

/// Install the tracing subscriber; `RUST_LOG` overrides the `-v`/`-q` level
fn init_logging(cli: &Cli) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    let (file_layer, guard) = match &cli.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .unwrap_or(OsStr::new("council-chamber.log"));
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

/// Report configuration issues; errors abort the run
fn check_config(config: &FileConfig, cli_concurrency: Option<usize>) -> Result<()> {
    let mut issues = config.validate();
    if let Some(concurrency) = cli_concurrency {
        issues.extend(config.concurrency_issue(concurrency));
    }
    for issue in &issues {
        eprintln!("{}", issue);
    }
    let errors = issues.iter().filter(|i| i.is_error()).count();
    if errors > 0 {
        bail!("Configuration has {} error(s)", errors);
    }
    Ok(())
}

/// `--check-provider`: probe the model listing of the configured server
async fn check_provider(config: &FileConfig) -> Result<()> {
    let invoker = OpenAiCompatInvoker::new(OpenAiCompatConfig::from(&config.provider))
        .context("failed to create the model invoker")?;
    let health = invoker
        .check_health()
        .await
        .with_context(|| format!("provider at {} is not healthy", invoker.base_url()))?;

    println!("Provider: {} (ok)", invoker.base_url());
    println!("Models:   {}", health.models.len());
    for model in &health.models {
        println!("  - {}", model);
    }
    if !health.default_model_listed {
        warn!(model = %config.provider.model, "Default model is not listed by the provider");
        eprintln!(
            "warning: default model '{}' is not listed; participants without their own model will fail",
            config.provider.model
        );
    }
    Ok(())
}

/// `--list-precedents`: every passed motion recorded so far
fn list_precedents(config: &FileConfig) -> Result<()> {
    let Some(path) = config.storage.precedent_file() else {
        bail!("No precedent file configured and no data directory available");
    };
    let precedents = if path.exists() {
        JsonlPrecedentStore::open(&path)
            .and_then(|store| store.entries())
            .with_context(|| format!("failed to read precedents from {}", path.display()))?
    } else {
        Vec::new()
    };
    println!("{}", ConsoleFormatter::format_precedents(&precedents));
    Ok(())
}

/// `--show-session <ID>`: print a saved snapshot like a finished run
fn show_session(config: &FileConfig, session_id: &str, format: OutputFormat) -> Result<()> {
    let Some(dir) = config.storage.sessions_dir() else {
        bail!("No sessions directory configured and no data directory available");
    };
    let persistence = JsonFilePersistence::new(dir);
    let session = persistence.load(session_id).with_context(|| {
        format!(
            "failed to load session '{}' from {}",
            session_id,
            persistence.path_for(session_id).display()
        )
    })?;

    let summary_chars = config
        .council
        .orchestrator_params(config.provider.max_tokens)
        .summary_chars;
    let output = RunSessionOutput::from_snapshot(&session, summary_chars);
    let formatter = ConsoleFormatter::new().with_roster(&session.settings.participants);
    if format != OutputFormat::Json {
        println!("Session {} - {}", session.id, session.status().as_str());
    }
    println!("{}", formatter.format(&output, format));
    Ok(())
}
