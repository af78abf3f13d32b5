//! Pipeline domain model

use crate::core::step::CommandStep;
use serde::{Deserialize, Serialize};

/// An ordered, fixed sequence of steps built for one scaffold request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Pipeline name (the project being scaffolded)
    name: String,

    /// Steps in execution order
    steps: Vec<CommandStep>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, steps: Vec<CommandStep>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Steps in the order they will run
    pub fn steps(&self) -> &[CommandStep] {
        &self.steps
    }

    /// Get a step by position
    pub fn step(&self, index: usize) -> Option<&CommandStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Labels in execution order
    pub fn labels(&self) -> Vec<&str> {
        self.steps.iter().map(CommandStep::label).collect()
    }
}
