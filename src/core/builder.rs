//! Builds the fixed scaffold pipeline from a project name and region

use crate::core::{
    config::ScaffoldConfig,
    pipeline::Pipeline,
    step::{CommandStep, EnvBinding, Invocation},
};
use crate::error::ScaffoldError;

/// Build the scaffold pipeline with the default configuration
pub fn build(project_name: &str, region: &str) -> Result<Pipeline, ScaffoldError> {
    PipelineBuilder::new(&ScaffoldConfig::default()).build(project_name, region)
}

/// Turns a validated request into an ordered list of commands
///
/// Project name and region are substituted literally; no quoting is
/// applied. Callers must validate them first (see
/// [`crate::core::region::validate_request`]).
pub struct PipelineBuilder<'a> {
    config: &'a ScaffoldConfig,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new(config: &'a ScaffoldConfig) -> Self {
        Self { config }
    }

    /// Build the pipeline for `project_name` deployed to `region`
    pub fn build(&self, project_name: &str, region: &str) -> Result<Pipeline, ScaffoldError> {
        check_project_name(project_name)?;
        if region.trim().is_empty() {
            return Err(ScaffoldError::InvalidArgument("region is required".to_string()));
        }

        let config = self.config;
        let repo = format!("{}/{}", config.github_org, project_name);
        let github_token = EnvBinding::new("GH_TOKEN", &config.github_token_env);
        let fly_token = EnvBinding::new("FLY_API_TOKEN", &config.fly_token_env);

        let steps = vec![
            CommandStep::new(
                "Create GitHub Repository",
                Invocation::program("gh", ["repo", "create", repo.as_str(), "--private", "--clone=false"]),
            )
            .with_env(github_token),
            CommandStep::new(
                "Clone Template",
                Invocation::program("git", ["clone", config.template_repo.as_str(), project_name]),
            ),
            CommandStep::new("Change Directory", Invocation::change_directory(project_name)),
            CommandStep::new(
                "Set Repository Remote",
                Invocation::program(
                    "git",
                    [
                        "remote".to_string(),
                        "set-url".to_string(),
                        "origin".to_string(),
                        format!("https://github.com/{}.git", repo),
                    ],
                ),
            ),
            CommandStep::new(
                "Create Fly App",
                Invocation::program("fly", ["apps", "create", project_name, "-o", config.fly_org.as_str()]),
            )
            .with_env(fly_token.clone()),
            CommandStep::new("Update fly.toml", Invocation::shell(self.fly_toml_rewrite(project_name, region))),
            CommandStep::new(
                "Deploy to Fly",
                Invocation::program("fly", ["deploy", "-a", project_name]),
            )
            .with_env(fly_token),
        ];

        Ok(Pipeline::new(project_name, steps))
    }

    /// The only shell step: rewrites app name and region in `fly.toml`
    fn fly_toml_rewrite(&self, project_name: &str, region: &str) -> String {
        format!(
            "sed -e 's/app = \"{app}\"/app = \"{name}\"/' -e 's/primary_region = \"{from}\"/primary_region = \"{to}\"/' fly.toml > fly.toml.tmp && mv fly.toml.tmp fly.toml",
            app = self.config.template_app,
            name = project_name,
            from = self.config.template_region,
            to = region,
        )
    }
}

fn check_project_name(project_name: &str) -> Result<(), ScaffoldError> {
    if project_name.is_empty() {
        return Err(ScaffoldError::InvalidArgument("project name is required".to_string()));
    }
    if project_name.chars().any(char::is_whitespace) {
        return Err(ScaffoldError::InvalidArgument(format!(
            "project name '{}' must not contain whitespace",
            project_name
        )));
    }
    Ok(())
}
