//! Scenario-based tests for the pipeline runner

mod helpers;

mod credentials;
mod failure_handling;
