//! CLI command definitions

use crate::core::region::DEFAULT_REGION;
use clap::Args;
use std::path::PathBuf;

/// Create a project
#[derive(Debug, Args, Clone)]
pub struct CreateCommand {
    /// Project name (no whitespace)
    #[arg(short, long)]
    pub name: String,

    /// Deployment region code (see `regions`)
    #[arg(short, long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Per-step timeout in seconds (overrides config)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Directory to create the project in (overrides config)
    #[arg(long)]
    pub workspace: Option<PathBuf>,
}

/// Show the pipeline for a project
#[derive(Debug, Args, Clone)]
pub struct PlanCommand {
    /// Project name (no whitespace)
    #[arg(short, long)]
    pub name: String,

    /// Deployment region code (see `regions`)
    #[arg(short, long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// List deployment regions
#[derive(Debug, Args, Clone)]
pub struct RegionsCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
