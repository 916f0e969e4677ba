use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lvr_analytics::init_logging;
use lvr_analytics::ui::cli::drivers::InquireDriver;
use lvr_analytics::ui::cli::wizard::prompt_choice;
use lvr_analytics::ui::types::build::{read_input, read_job, run_transform};
use lvr_analytics::ui::types::choices::{TransformChoice, UIChoice};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "lvr-analytics")]
#[command(about = "Statistical transforms for LVR dashboard datasets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a transform job file against a JSON dataset
    Run {
        #[arg(short, long)]
        job: PathBuf,

        #[arg(short, long)]
        input: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build a job interactively, then run it
    Wizard {
        #[arg(short, long)]
        input: PathBuf,

        /// Save the job built by the wizard
        #[arg(short, long)]
        save: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the JSON schema of job files
    Schema,
}

fn execute(job: &TransformChoice, input: &Path, output: Option<&Path>) -> Result<()> {
    let data = read_input(input).with_context(|| format!("reading input {}", input.display()))?;
    let result = run_transform(job, data).with_context(|| format!("running {} job", job.kind()))?;
    emit(&result, output)
}

fn emit(value: &Value, output: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "result written");
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { job, input, output } => {
            let choice =
                read_job(&job).with_context(|| format!("reading job {}", job.display()))?;
            execute(&choice, &input, output.as_deref())
        }
        Commands::Wizard {
            input,
            save,
            output,
        } => {
            let choice: TransformChoice = prompt_choice(&InquireDriver)?;
            if let Some(path) = save {
                let text = serde_json::to_string_pretty(&choice)?;
                fs::write(&path, text).with_context(|| format!("saving job {}", path.display()))?;
                info!(path = %path.display(), "job saved");
            }
            execute(&choice, &input, output.as_deref())
        }
        Commands::Schema => emit(&serde_json::to_value(TransformChoice::schema())?, None),
    }
}
