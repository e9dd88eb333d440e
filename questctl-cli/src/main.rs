//! questctl CLI - quest chat reporting and pending-quest escalation
//!
//! This is the main entry point for the questctl command-line tool, which
//! provides:
//! - Quest award reports posted back into the party chat (`report`)
//! - Pending-quest notices, force-start and private escalation (`pending`)
//! - Quest scheduling queue management (`queue`)
//! - Configuration management (`config`)
//!
//! Designed for scheduled (e.g. hourly) runs: every subcommand is
//! idempotent, and fatal errors surface as a non-zero exit status.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use tracing::info;

use questctl_core::queue::{QueueEntry, QuestQueue};
use questctl_core::run::{run_pending_notice, run_quest_report, PendingOptions, ReportOptions};
use questctl_core::QuestConfig;

mod client;
mod tracing_setup;

use client::HabiticaClient;
use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "questctl",
    author,
    version,
    about = "Quest chat reporter and pending-quest escalator for Habitica parties",
    long_about = "Parses the party chat transcript into action records, posts tied-aware \
                  award leaderboards for completed quests, and nudges, force-starts or \
                  escalates quests that were invited but never started."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Suppress info-level output (warnings and errors only)
    #[arg(long, short = 'q', global = true, conflicts_with = "debug")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Post the award report for the most recently completed quest
    Report(ReportArgs),
    /// Check for a pending quest and notify, force-start or escalate
    Pending(PendingArgs),
    /// Manage the quest scheduling queue (who starts the next quest)
    Queue(QueueArgs),
    /// Manage questctl configuration (init, show, path)
    Config(ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct ReportArgs {
    /// Which completed quest to report on (1 = most recent)
    #[arg(long, value_name = "N")]
    history: Option<usize>,

    /// Also post the report to the configured secondary group
    #[arg(long)]
    secondary: bool,

    /// Consume the quest queue head and post a who-starts-next reminder
    #[arg(long = "queue-reminder")]
    queue_reminder: bool,

    /// Print the report instead of posting it
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[derive(Parser, Debug)]
struct PendingArgs {
    /// Override the configured notice header
    #[arg(long, value_name = "TEXT")]
    header: Option<String>,

    /// Override the configured escalation timer, in hours
    #[arg(long = "timeout-hours", value_name = "H")]
    timeout_hours: Option<f64>,

    /// Log the decision instead of posting or messaging
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[derive(Parser, Debug)]
struct QueueArgs {
    #[command(subcommand)]
    command: QueueCommand,
}

#[derive(Subcommand, Debug)]
enum QueueCommand {
    /// Append a (user, quest) pair to the queue
    Add { user: String, quest: String },
    /// List queued entries in order
    List,
    /// Remove and print the head entry
    Pop,
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a commented config template
    Init,
    /// Print the resolved configuration
    Show,
    /// Print the config file path
    Path,
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&TracingConfig {
        debug: cli.debug,
        quiet: cli.quiet,
    })?;

    match cli.command {
        Commands::Report(args) => run_report(args),
        Commands::Pending(args) => run_pending(args),
        Commands::Queue(args) => run_queue(args),
        Commands::Config(args) => run_config(args),
        Commands::Completions(args) => run_completions(args),
    }
}

fn run_report(args: ReportArgs) -> Result<()> {
    let mut config = QuestConfig::load().context("failed to load config")?;
    if let Some(history) = args.history {
        config.report.history = history;
    }
    let client = HabiticaClient::new(&config)?;

    let opts = ReportOptions {
        post_to_secondary: args.secondary,
        queue_reminder: args.queue_reminder,
        dry_run: args.dry_run,
    };

    info!(history = config.report.history, "running quest report");
    run_quest_report(&client, &config, &opts).context("quest report failed")?;
    Ok(())
}

fn run_pending(args: PendingArgs) -> Result<()> {
    let config = QuestConfig::load().context("failed to load config")?;
    let client = HabiticaClient::new(&config)?;

    let opts = PendingOptions {
        header: args.header.unwrap_or_else(|| config.pending.header.clone()),
        timeout_hours: args.timeout_hours.unwrap_or(config.pending.timer_hours),
        dry_run: args.dry_run,
    };

    info!(timeout_hours = opts.timeout_hours, "running pending-quest check");
    run_pending_notice(&client, &config, &opts).context("pending-quest check failed")?;
    Ok(())
}

fn run_queue(args: QueueArgs) -> Result<()> {
    let config = QuestConfig::load().context("failed to load config")?;
    let mut queue = QuestQueue::load(&config.paths.queue_file)?;

    match args.command {
        QueueCommand::Add { user, quest } => {
            queue.push(QueueEntry { user, quest });
            queue.save()?;
            println!("queued {} entries", queue.entries().len());
        }
        QueueCommand::List => {
            for (idx, entry) in queue.entries().iter().enumerate() {
                println!("{:>3}. {} -> {}", idx + 1, entry.user, entry.quest);
            }
        }
        QueueCommand::Pop => match queue.pop_front() {
            Some(entry) => {
                queue.save()?;
                println!("{} -> {}", entry.user, entry.quest);
            }
            None => println!("queue is empty"),
        },
    }
    Ok(())
}

fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Init => {
            let path = QuestConfig::init()?;
            println!("wrote config template to {:?}", path);
        }
        ConfigCommand::Show => {
            let config = QuestConfig::load().context("failed to load config")?;
            // token stays out of the printout
            println!("user_id   = {}", config.credentials.user_id);
            println!("base_url  = {}", config.api.base_url);
            println!("group_id  = {}", config.party.group_id);
            if let Some(secondary) = &config.party.secondary_group_id {
                println!("secondary = {}", secondary);
            }
            println!("header    = {}", config.report.header);
            println!("history   = {}", config.report.history);
            println!("pending   = {} ({}h)", config.pending.header, config.pending.timer_hours);
            println!("queue     = {}", config.paths.queue_file.display());
        }
        ConfigCommand::Path => {
            println!("{}", QuestConfig::config_path().display());
        }
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
