// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and subcommands for drover

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "drover")]
#[command(about = "Runs a batch of shell commands in parallel under a single shared deadline")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute a batch of commands, one OS process per command
    Run {
        #[arg(help = "Commands to execute (quote each one); defaults to the demo set")]
        tasks: Vec<String>,

        #[arg(
            short,
            long,
            help = "Shared execution timeout in seconds (0 uses the configured default)"
        )]
        timeout: Option<u64>,

        #[arg(short, long, help = "Base directory for the dated output folder")]
        output_dir: Option<PathBuf>,

        #[arg(long, help = "Shell used to interpret each command string")]
        shell: Option<String>,

        #[arg(long, help = "Write the run result as JSON to this file")]
        summary: Option<PathBuf>,
    },

    /// Print the default demo command set for this platform
    Tasks,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
