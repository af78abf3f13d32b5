//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{CreateCommand, PlanCommand, RegionsCommand};
use std::ffi::OsString;

/// Scaffold a project from a template and deploy it to Fly.io
#[derive(Debug, Parser, Clone)]
#[command(name = "scaffolder")]
#[command(version = "0.1.0")]
#[command(about = "Create, clone and deploy a new project from a template", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to scaffold configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Create a project by running the scaffold pipeline
    Create(CreateCommand),

    /// Show the commands that would run, without running them
    Plan(PlanCommand),

    /// List deployment regions
    Regions(RegionsCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
