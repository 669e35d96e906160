//! CLI definition using clap.

use clap::Parser;
use std::path::PathBuf;

/// Red - a terminal coding agent that asks before it touches anything
#[derive(Parser, Debug)]
#[command(name = "red")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Task to perform; prompts for one when omitted
    #[arg(trailing_var_arg = true)]
    pub task: Vec<String>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// The task given on the command line, if any
    pub fn task_text(&self) -> Option<String> {
        let task = self.task.join(" ");
        let task = task.trim();
        if task.is_empty() { None } else { Some(task.to_string()) }
    }
}
