//! Step domain model

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a step is carried out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Invocation {
    /// Run a program directly with an explicit argument vector (no shell)
    Program { program: String, args: Vec<String> },

    /// Run a script through `sh -c`
    ///
    /// Only for steps that need shell features (redirection, `&&`). Inputs
    /// interpolated into `script` are not escaped.
    Shell { script: String },

    /// Change the working directory for all later steps of the run
    ChangeDirectory { path: String },
}

impl Invocation {
    pub fn program<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::Program {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn shell(script: impl Into<String>) -> Self {
        Invocation::Shell {
            script: script.into(),
        }
    }

    pub fn change_directory(path: impl Into<String>) -> Self {
        Invocation::ChangeDirectory { path: path.into() }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invocation::Program { program, args } => {
                write!(f, "{}", program)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                Ok(())
            }
            Invocation::Shell { script } => write!(f, "{}", script),
            Invocation::ChangeDirectory { path } => write!(f, "cd {}", path),
        }
    }
}

/// Binds a child environment variable to a named credential
///
/// The credential value is looked up when the step runs, never when the
/// pipeline is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvBinding {
    /// Variable name as seen by the child process
    pub var: String,

    /// Credential name to resolve at run time
    pub credential: String,
}

impl EnvBinding {
    pub fn new(var: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            credential: credential.into(),
        }
    }
}

/// A single named command in a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandStep {
    label: String,
    command: String,
    invocation: Invocation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    env: Vec<EnvBinding>,
}

impl CommandStep {
    /// Create a step; `command` is rendered from the invocation
    pub fn new(label: impl Into<String>, invocation: Invocation) -> Self {
        Self {
            label: label.into(),
            command: invocation.to_string(),
            invocation,
            env: Vec::new(),
        }
    }

    /// Add a credential-backed environment variable
    pub fn with_env(mut self, binding: EnvBinding) -> Self {
        self.env.push(binding);
        self
    }

    /// Human-readable step name
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Fully substituted command line
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// Credential bindings the step needs in its environment
    pub fn env(&self) -> &[EnvBinding] {
        &self.env
    }
}
