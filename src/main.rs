use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use ledmerge::model::Configuration;
use ledmerge::settings::Settings;
use ledmerge::ui::TerminalUi;
use ledmerge::validate::validate_configuration;
use ledmerge::workflow::{MergeSession, SessionOutcome};

/// Ledmerge CLI
#[derive(Debug, Parser)]
#[command(
    name = ledmerge::PKG_NAME,
    version = ledmerge::PKG_VERSION,
    about = "Merge custom LED-matrix animations between CYBERBOARD firmware JSON configurations"
)]
struct Args {
    /// Path to the JSON settings file
    #[arg(short = 's', long = "settings", default_value = "settings.json")]
    settings: PathBuf,

    /// Override the source directory from settings
    #[arg(long = "source-dir")]
    source_dir: Option<PathBuf>,

    /// Override the output directory from settings
    #[arg(long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Set log level (e.g., trace, debug, info, warn, error). Overrides RUST_LOG.
    #[arg(long = "log-level")]
    log_level: Option<String>,

    /// Print the JSON Schema for the firmware document format and exit
    #[arg(long = "print-schema")]
    print_schema: bool,

    /// Validate a configuration file, list violations, and exit
    #[arg(long = "check", value_name = "FILE")]
    check: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Honor --log-level by initializing tracing directly with that level.
    if let Some(level) = &args.log_level {
        let level = match level.to_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "warn" | "warning" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        };
        let _ = tracing_subscriber::fmt().with_max_level(level).try_init();
    }

    if args.log_level.is_none() {
        ledmerge::init_tracing();
    }
    info!(
        version = ledmerge::PKG_VERSION,
        settings = %args.settings.display(),
        "Starting ledmerge"
    );

    if args.print_schema {
        let schema = schemars::schema_for!(Configuration);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    if let Some(path) = &args.check {
        return check_file(path);
    }

    let mut settings = Settings::load(&args.settings);
    if let Some(dir) = args.source_dir {
        settings.source_dir = dir;
    }
    if let Some(dir) = args.output_dir {
        settings.output_dir = dir;
    }
    debug!(
        source = %settings.source_dir.display(),
        output = %settings.output_dir.display(),
        max_frames = settings.max_frames,
        "Settings resolved"
    );

    loop {
        let mut session = MergeSession::new(
            settings.clone(),
            args.settings.clone(),
            TerminalUi::new(),
        );
        session.initialize_directories()?;
        match session.run()? {
            SessionOutcome::Completed => break,
            SessionOutcome::Restart => {
                info!("Restarting session");
                continue;
            }
            SessionOutcome::Aborted => {
                info!("Session aborted");
                std::process::exit(1);
            }
        }
    }

    info!("Ledmerge exited");
    Ok(())
}

/// Non-interactive validation of a single document.
fn check_file(path: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let config: Configuration = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in '{}'", path.display()))?;

    let violations = validate_configuration(&config);
    if violations.is_empty() {
        println!(
            "{}: OK (custom LED frames: {:?})",
            path.display(),
            config.custom_led_frame_counts()
        );
        return Ok(());
    }
    for violation in &violations {
        eprintln!("{}: {violation}", path.display());
    }
    anyhow::bail!("{} schema violation(s) found", violations.len())
}
