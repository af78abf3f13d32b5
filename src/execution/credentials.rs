//! Credentials handed to child processes through their environment

use crate::core::EnvBinding;
use crate::error::StepError;
use std::collections::BTreeMap;
use std::fmt;

/// Named secret values scoped to one pipeline run
///
/// Values only reach children through the per-step environment map; the
/// process environment is never modified. `Debug` prints names only.
#[derive(Clone, Default)]
pub struct Credentials {
    values: BTreeMap<String, String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the named credentials from the current process environment
    ///
    /// Unset or empty variables are left out; steps that need them fail
    /// with [`StepError::CredentialMissing`] when they run.
    pub fn from_env<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut credentials = Self::new();
        for name in names {
            let name = name.as_ref();
            match std::env::var(name) {
                Ok(value) if !value.is_empty() => credentials.insert(name, value),
                _ => {}
            }
        }
        credentials
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Names of the credentials present
    pub fn names(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }

    /// Resolve a step's bindings into `(var, value)` pairs
    pub fn resolve(&self, bindings: &[EnvBinding]) -> Result<Vec<(String, String)>, StepError> {
        bindings
            .iter()
            .map(|binding| {
                self.values
                    .get(&binding.credential)
                    .map(|value| (binding.var.clone(), value.clone()))
                    .ok_or_else(|| StepError::CredentialMissing {
                        name: binding.credential.clone(),
                    })
            })
            .collect()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("names", &self.names())
            .finish()
    }
}
