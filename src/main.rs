use anyhow::{Context, Result};
use scaffolder::cli::commands::{CreateCommand, PlanCommand, RegionsCommand};
use scaffolder::cli::output::*;
use scaffolder::cli::{Cli, Command};
use scaffolder::core::region::{self, validate_request, DEFAULT_REGION};
use scaffolder::core::{PipelineBuilder, ScaffoldConfig};
use scaffolder::execution::sink::DEFAULT_CAPACITY;
use scaffolder::execution::{
    channel, CancellationHandle, Credentials, PipelineRunner, RunEvent, RunOptions,
    SubprocessExecutor,
};
use std::io::Write;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging; stderr only, stdout carries the pipeline stream
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let config = match &cli.config {
        Some(path) => ScaffoldConfig::from_file(path).context("Failed to load scaffold config")?,
        None => ScaffoldConfig::default(),
    };

    // Execute command
    match &cli.command {
        Command::Create(cmd) => create_project(cmd, config).await?,
        Command::Plan(cmd) => plan_project(cmd, &config)?,
        Command::Regions(cmd) => list_regions(cmd)?,
    }

    Ok(())
}

async fn create_project(cmd: &CreateCommand, mut config: ScaffoldConfig) -> Result<()> {
    let region = validate_request(&cmd.name, &cmd.region)?;

    if let Some(timeout) = cmd.timeout {
        config.step_timeout_secs = Some(timeout);
    }
    if let Some(workspace) = &cmd.workspace {
        config.workspace = workspace.clone();
    }
    config.validate()?;

    let pipeline = PipelineBuilder::new(&config).build(&cmd.name, region.code)?;

    println!(
        "{} Creating {} in {} {}",
        ROCKET,
        style(&cmd.name).bold(),
        region.flag,
        region.name
    );

    let credentials = Credentials::from_env(config.credential_names());
    let mut options = RunOptions::new().with_working_dir(&config.workspace);
    if let Some(secs) = config.step_timeout_secs {
        options = options.with_step_timeout(Duration::from_secs(secs));
    }

    let spinner = console::Term::stderr().is_term().then(create_spinner);
    let progress = spinner.clone();
    let cancel = CancellationHandle::new();

    let runner = PipelineRunner::new(SubprocessExecutor::new(), credentials)
        .with_options(options)
        .with_cancellation(cancel.clone())
        .with_event_handler(move |event| {
            if let (Some(progress), RunEvent::StepStarted { index, total, label }) = (&progress, event) {
                progress.set_message(format_step_progress(*index, *total, label));
            }
        });

    let (mut sink, mut stream) = channel(DEFAULT_CAPACITY);
    let task = tokio::spawn(async move { runner.run(&pipeline, &mut sink).await });

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    // Relay the stream as it arrives
    while let Some(chunk) = stream.next_chunk().await {
        match &spinner {
            Some(progress) => progress.suspend(|| print_chunk(&chunk)),
            None => print_chunk(&chunk),
        }
    }

    let report = task.await.context("Pipeline task failed")?;
    if let Some(progress) = spinner {
        progress.finish_and_clear();
    }

    println!("\n{}", format_report_summary(&report));
    if !report.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

fn print_chunk(chunk: &str) {
    let mut stdout = std::io::stdout().lock();
    // A closed stdout only loses the relay, the pipeline keeps running
    let _ = stdout.write_all(chunk.as_bytes());
    let _ = stdout.flush();
}

fn plan_project(cmd: &PlanCommand, config: &ScaffoldConfig) -> Result<()> {
    let region = validate_request(&cmd.name, &cmd.region)?;
    let pipeline = PipelineBuilder::new(config).build(&cmd.name, region.code)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&pipeline)?);
        return Ok(());
    }

    println!(
        "{} Pipeline for {} ({} steps, region {} {})",
        INFO,
        style(pipeline.name()).bold(),
        pipeline.len(),
        region.flag,
        style(region.code).cyan()
    );
    for (index, step) in pipeline.steps().iter().enumerate() {
        println!("{}", format_planned_step(index, step));
    }

    Ok(())
}

fn list_regions(cmd: &RegionsCommand) -> Result<()> {
    if cmd.json {
        let data = serde_json::json!({
            "default": DEFAULT_REGION,
            "regions": region::all(),
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("{} Deployment regions:", INFO);
    for region in region::all() {
        let marker = if region.code == DEFAULT_REGION { " (default)" } else { "" };
        println!("  {}{}", format_region(region), style(marker).dim());
    }

    Ok(())
}
