use attrschema::driver::{self, BuildOutput, MockPublisher, ProjectMetadata};
use attrschema::error::DriverError;
use attrschema::validator::Validator;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Validates attribute schemas, builds `schema.json` and publishes it
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory `schema.json` is written to (defaults to the current directory)
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Reject fields that are not part of the schema grammar
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validates a schema and builds it. Expects a JSON or YAML schema source.
    Build {
        /// Path to the schema source
        src: PathBuf,
    },
    /// Validates a schema, builds it and publishes it. Expects a JSON or YAML schema source.
    Publish {
        /// Path to the schema source
        src: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => return exit_with_error(&format!("Cannot determine working directory: {}", e)),
    };
    let out_dir = cli.out_dir.clone().unwrap_or_else(|| project_dir.clone());
    let validator = Validator::builder().strict(cli.strict).build();

    let result = match &cli.command {
        Command::Build { src } => validate_and_build(src, &out_dir, &validator).map(|_| ()),
        Command::Publish { src } => run_publish(src, &out_dir, &project_dir, &validator),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(DriverError::Validation(e)) => {
            eprintln!("\nError: schema validation failed ({} problem(s))", e.violations.len());
            for violation in &e.violations {
                eprintln!("  {}", violation);
            }
            ExitCode::FAILURE
        }
        Err(e) => exit_with_error(&e.to_string()),
    }
}

fn validate_and_build(
    src: &Path,
    out_dir: &Path,
    validator: &Validator,
) -> Result<BuildOutput, DriverError> {
    println!("Validating data... ⌛");
    let output = driver::build(src, out_dir, validator)?;
    println!("Data is valid ✅");
    println!("Schema written to {}", output.artifact_path.display());
    Ok(output)
}

fn run_publish(
    src: &Path,
    out_dir: &Path,
    project_dir: &Path,
    validator: &Validator,
) -> Result<(), DriverError> {
    let metadata = ProjectMetadata::read(project_dir)?;
    let output = validate_and_build(src, out_dir, validator)?;

    println!("Publishing to Webflow... ⌛");
    let receipt = driver::publish(&output, &metadata.version, &MockPublisher::default())?;
    println!("Published schema v{} to Webflow ✅", receipt.version);
    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_with_error(message: &str) -> ExitCode {
    eprintln!("\nError: {}", message);
    ExitCode::FAILURE
}
