use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use qpdfjob_core::{Settings, config_file};

mod output;

use output::ColorMode;

/// Run qpdf JSON job files through libqpdf
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log dispatch details to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a job file and exit with qpdf's exit code
    Run {
        /// Path to the job JSON file, or `-` to read from stdin
        job: PathBuf,

        /// Path to the qpdf shared library (overrides LIB_QPDF_PATH and config)
        #[arg(long)]
        library: Option<PathBuf>,
    },

    /// Validate a job file without running it
    Check {
        /// Path to the job JSON file, or `-` to read from stdin
        job: PathBuf,
    },

    /// List the exit codes qpdf jobs report
    Codes,

    /// Show or change the configured qpdf library path
    Config {
        /// Store this library path in the platform config file
        #[arg(long)]
        set_library: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let color = ColorMode(!cli.no_color);

    match cli.command {
        Command::Run { job, library } => run(&job, library, color),
        Command::Check { job } => check(&job, color),
        Command::Codes => {
            output::print_codes(&mut std::io::stdout(), color)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Config { set_library } => config(set_library, color),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(job: &Path, library: Option<PathBuf>, color: ColorMode) -> anyhow::Result<ExitCode> {
    // Resolve configuration: CLI flag > env var > config file
    let settings = Settings::resolve(library, &config_file::load_config());
    if let Some(source) = settings.source() {
        tracing::debug!(%source, "resolved qpdf library path");
    }
    let dispatcher = qpdfjob_native::dispatcher(&settings)?;

    let bytes = read_job(job)?;
    let status = dispatcher
        .run_job(bytes)
        .with_context(|| format!("Job {} was not dispatched", job_name(job)))?;

    output::print_status(&mut std::io::stderr(), &job_name(job), status, color)?;

    // Out-of-range codes can't be represented as a process exit status.
    Ok(u8::try_from(status.code())
        .map(ExitCode::from)
        .unwrap_or(ExitCode::FAILURE))
}

fn check(job: &Path, color: ColorMode) -> anyhow::Result<ExitCode> {
    let bytes = read_job(job)?;
    let validated = qpdfjob_core::validate_job(&bytes)
        .with_context(|| format!("Job {} is invalid", job_name(job)))?;

    output::print_valid(&mut std::io::stdout(), &job_name(job), validated.len(), color)?;
    Ok(ExitCode::SUCCESS)
}

fn config(set_library: Option<PathBuf>, color: ColorMode) -> anyhow::Result<ExitCode> {
    let mut stdout = std::io::stdout();

    if let Some(path) = set_library {
        if !path.is_file() {
            anyhow::bail!("Library not found: {}", path.display());
        }
        let path = path
            .canonicalize()
            .with_context(|| format!("Could not resolve {}", path.display()))?;

        let platform = config_file::config_path()
            .and_then(|p| config_file::load_from_path(&p))
            .unwrap_or_default();
        let updated = config_file::merge(
            platform,
            config_file::ConfigFile::with_library_path(path.to_string_lossy()),
        );
        let saved = config_file::save_config(&updated).map_err(anyhow::Error::msg)?;
        writeln!(stdout, "Saved library path to {}", saved.display())?;
        return Ok(ExitCode::SUCCESS);
    }

    let settings = Settings::resolve(None, &config_file::load_config());
    let resolved = settings
        .library_path()
        .ok()
        .zip(settings.source());
    output::print_library(
        &mut stdout,
        resolved,
        config_file::config_path().as_deref(),
        color,
    )?;
    Ok(ExitCode::SUCCESS)
}

fn read_job(job: &Path) -> anyhow::Result<Vec<u8>> {
    if job == Path::new("-") {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read job from stdin")?;
        return Ok(bytes);
    }
    if !job.exists() {
        anyhow::bail!("File not found: {}", job.display());
    }
    std::fs::read(job).with_context(|| format!("Failed to read {}", job.display()))
}

fn job_name(job: &Path) -> String {
    if job == Path::new("-") {
        return "<stdin>".to_string();
    }
    job.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| job.display().to_string())
}
