//! Core domain models for the scaffold pipeline
//!
//! This module defines the steps and pipelines that describe a scaffold
//! request, the builder that produces them, and the run state reported
//! after execution.

pub mod builder;
pub mod config;
pub mod pipeline;
pub mod region;
pub mod state;
pub mod step;

pub use builder::{build, PipelineBuilder};
pub use config::ScaffoldConfig;
pub use pipeline::*;
pub use region::Region;
pub use state::*;
pub use step::*;
