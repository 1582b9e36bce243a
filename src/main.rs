//! Brew Bro CLI - pour-over brew timer and coffee journal
//!
//! - Times a brew in the foreground and rings an alarm when it is done
//! - Keeps a newest-first history of finished brews
//! - Asks a roast analysis service to classify bean photos

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::{AsyncBufReadExt, BufReader};

use brewbro::cli::{run_brew, BrewArgs, BrewOutcome, Cli, Commands, Display, HistoryCommand};
use brewbro::{default_alarm, AppConfig, BrewHistoryStore, FileStore, RoastAnalysisClient};

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

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves the configuration from the environment and global flags.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    apply_flags(cli, AppConfig::from_env())
}

/// Applies global flags on top of `config` and validates the result.
fn apply_flags(cli: &Cli, mut config: AppConfig) -> Result<AppConfig> {
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir);
    }
    config.validate().map_err(|e| anyhow!(e))?;
    tracing::debug!("Using data directory {}", config.data_dir.display());
    Ok(config)
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Brew(args)) => brew(&config, &args).await?,
        Some(Commands::Analyze { image }) => {
            let client = RoastAnalysisClient::from_config(&config)?;
            Display::show_analyzing();
            let analysis = client.analyze_image(&image).await?;
            Display::show_analysis(&analysis);
        }
        Some(Commands::History(command)) => history(&config, command).await?,
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Runs a foreground brew.
async fn brew(config: &AppConfig, args: &BrewArgs) -> Result<()> {
    let alarm = default_alarm(&config.clone().with_alarm_enabled(!args.no_sound));

    let mut store = if args.no_save {
        None
    } else {
        Some(
            BrewHistoryStore::open(FileStore::new(&config.data_dir))
                .await
                .context("Failed to load history")?,
        )
    };

    Display::show_presets();
    let stdin = BufReader::new(tokio::io::stdin());
    let outcome = run_brew(args, alarm, store.as_mut(), stdin, shutdown_signal())
        .await
        .context("Failed to save brew")?;

    match outcome {
        BrewOutcome::Completed(_) => {}
        BrewOutcome::Quit | BrewOutcome::Interrupted => {
            println!();
            Display::show_not_saved();
        }
    }
    Ok(())
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Executes a history subcommand.
async fn history(config: &AppConfig, command: HistoryCommand) -> Result<()> {
    let mut store = BrewHistoryStore::open(FileStore::new(&config.data_dir))
        .await
        .context("Failed to load history")?;

    match command {
        HistoryCommand::List => Display::show_history(store.sessions()),
        HistoryCommand::Show { id } => match store.get(&id) {
            Some(session) => Display::show_session(session),
            None => return Err(anyhow!("No brew with id {}", id)),
        },
        HistoryCommand::Delete { id } => {
            if store.delete_session(&id).await? {
                Display::show_deleted(&id);
            } else {
                Display::show_not_found(&id);
            }
        }
        HistoryCommand::Clear { yes } => {
            if store.is_empty() {
                Display::show_history(&[]);
                return Ok(());
            }
            if !yes && !confirm(&format!("Delete all {} brews?", store.len())).await? {
                println!("Cancelled");
                return Ok(());
            }
            store.clear_history().await?;
            Display::show_cleared();
        }
    }
    Ok(())
}

/// Asks a yes/no question on stdin. End of input counts as "no".
async fn confirm(question: &str) -> Result<bool> {
    println!("{} [y/N]", question);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
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
