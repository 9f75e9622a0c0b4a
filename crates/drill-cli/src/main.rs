//! Drill CLI
//!
//! Renders, replays and checks exercise definitions.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Parser, Subcommand, ValueEnum};
use drill_core::{
    Config, Exercise, ExerciseDefinition, InteractionOutcome, Notification, Script,
};
use drill_preview::{json::JsonGenerator, HtmlGenerator, Preview};
use tracing_subscriber::EnvFilter;

/// Drill - Interactive Exercise Tool
///
/// Renders exercise definitions into static previews and replays scripted
/// learner interactions against them.
#[derive(Parser, Debug)]
#[command(name = "drill")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (default: drill.json in current directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an exercise as it looks before any interaction
    Render {
        /// Path to the exercise definition
        #[arg(value_name = "EXERCISE")]
        exercise: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Replay a script against an exercise, printing notifications as JSON lines
    Play {
        /// Path to the exercise definition
        #[arg(value_name = "EXERCISE")]
        exercise: PathBuf,

        /// Path to the interaction script
        #[arg(short, long, value_name = "SCRIPT")]
        script: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Check that an exercise definition loads and all its templates format
    Check {
        /// Path to the exercise definition
        #[arg(value_name = "EXERCISE")]
        exercise: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Preview format
    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Write the preview to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Html,
    Json,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(config = ?args.config, "Config file");

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Render { exercise, output } => {
            let definition = ExerciseDefinition::load(&exercise)?;
            let exercise = definition.instantiate(&config, Rc::new(drill_core::Discard))?;
            write_preview(&exercise, &output)
        }
        Command::Play {
            exercise,
            script,
            output,
        } => {
            let definition = ExerciseDefinition::load(&exercise)?;
            let script = Script::load(&script)?;
            let mut exercise = definition.instantiate(&config, Rc::new(print_notification))?;

            for (step, interaction) in script.steps.iter().enumerate() {
                let outcome = definition
                    .apply(&mut exercise, interaction)
                    .map_err(|e| anyhow::anyhow!("Step {}: {e}", step + 1))?;
                print_outcome(step + 1, &outcome);
            }
            write_preview(&exercise, &output)
        }
        Command::Check { exercise } => {
            let definition = ExerciseDefinition::load(&exercise)?;
            definition.check(&config)?;
            println!(
                "OK: {} ({} widgets, {} hints)",
                definition.kind,
                definition.widgets.len(),
                definition.hints.len()
            );
            Ok(())
        }
    }
}

/// Loads configuration from a file or the current directory.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load_from_dir(Path::new(".")).map_err(|e| anyhow::anyhow!("{e}")),
    }
}

/// Prints one notification as a JSON line.
fn print_notification(notification: Notification) {
    match serde_json::to_string(&notification) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::warn!(error = %e, "Failed to serialize notification"),
    }
}

fn print_outcome(step: usize, outcome: &InteractionOutcome) {
    match outcome {
        InteractionOutcome::Applied => tracing::debug!(step, "Applied"),
        InteractionOutcome::Submit(result) => tracing::info!(step, ?result, "Submit clicked"),
        InteractionOutcome::Hint(hint) => tracing::info!(step, given = hint.is_some(), "Hint requested"),
        InteractionOutcome::ClearDebug(cleared) => tracing::debug!(step, cleared, "Clear debug"),
    }
}

/// Writes the preview of `exercise` in the requested format.
fn write_preview(exercise: &Exercise, args: &OutputArgs) -> anyhow::Result<()> {
    let preview = Preview::new(exercise.snapshot());

    match (args.format, &args.output) {
        (Format::Json, Some(path)) => {
            JsonGenerator::new(&preview).write_to_file(path, true)?;
        }
        (Format::Json, None) => {
            println!("{}", JsonGenerator::new(&preview).generate_pretty()?);
        }
        (Format::Html, Some(path)) => {
            std::fs::write(path, HtmlGenerator::new(&preview).generate()?)?;
        }
        (Format::Html, None) => {
            print!("{}", HtmlGenerator::new(&preview).generate()?);
        }
    }

    if let Some(path) = &args.output {
        tracing::info!(path = %path.display(), "Preview written");
    }
    Ok(())
}
