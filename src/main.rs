use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use red::agent::{Session, SessionOutcome};
use red::approval::StdinApprover;
use red::config::Config;
use red::llm::ChatCompletionsClient;

mod cli;

use cli::Cli;

const BANNER: [&str; 6] = [
    "██████╗ ███████╗██████╗ ",
    "██╔══██╗██╔════╝██╔══██╗",
    "██████╔╝█████╗  ██║  ██║",
    "██╔══██╗██╔══╝  ██║  ██║",
    "██║  ██║███████╗██████╔╝",
    "╚═╝  ╚═╝╚══════╝╚═════╝ ",
];

// Red fading to orange, top to bottom
const GRADIENT: [(u8, u8, u8); 6] = [
    (255, 0, 0),
    (255, 0, 0),
    (255, 0, 0),
    (255, 0, 0),
    (255, 95, 0),
    (255, 135, 0),
];

/// Default log filter when RUST_LOG is unset: --verbose wins, then the configured level
fn default_log_filter(config: &Config, verbose: bool) -> String {
    if verbose {
        return "debug".to_string();
    }
    config
        .log_level
        .as_deref()
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .unwrap_or("info")
        .to_string()
}

fn setup_logging(default_filter: &str) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("red")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("red.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn print_splash() {
    for (line, (r, g, b)) in BANNER.iter().zip(GRADIENT) {
        println!("{}", line.truecolor(r, g, b));
    }
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    match std::env::current_dir() {
        Ok(cwd) => println!("cwd: {}", cwd.display()),
        Err(e) => log::warn!("Failed to read current directory: {}", e),
    }
    println!();
}

fn read_task() -> Result<String> {
    print!("{}", "You: ".bold());
    io::stdout().flush().context("Failed to flush prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read task from stdin")?;
    Ok(line.trim().to_string())
}

async fn run_application(cli: &Cli, config: Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    print_splash();

    let task = match cli.task_text() {
        Some(task) => {
            println!("{} {}", "You:".bold(), task);
            task
        }
        None => read_task()?,
    };

    if task.is_empty() {
        println!("No input provided. Exiting.");
        return Ok(());
    }

    let client = ChatCompletionsClient::new(config.llm.clone()).context("Failed to create completion client")?;
    info!("Using model {} at {}", config.llm.model, config.llm.base_url);

    let client = Arc::new(client);
    let mut session = Session::new(Arc::clone(&client), StdinApprover, &config.agent);
    let outcome = session.run(&task).await.context("Session failed")?;

    let usage = client.total_usage();
    info!(
        "Session used {} tokens ({} prompt, {} completion) over {} messages",
        usage.total(),
        usage.prompt_tokens,
        usage.completion_tokens,
        session.transcript().len()
    );

    match outcome {
        SessionOutcome::Completed { .. } => {
            println!("\n{}", "Task completed!".green().bold());
            Ok(())
        }
        SessionOutcome::StepLimitReached { .. } => {
            println!(
                "\n{}",
                format!(
                    "Stopped after reaching the limit of {} messages.",
                    config.agent.max_messages
                )
                .yellow()
            );
            Ok(())
        }
        SessionOutcome::Aborted { reason } => Err(eyre::eyre!("Session aborted: {}", reason)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(&default_log_filter(&config, cli.is_verbose())).context("Failed to setup logging")?;

    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    info!("Starting with config from: {:?}", cli.config);

    run_application(&cli, config).await.context("Application failed")?;

    Ok(())
}
