use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use uuid::Uuid;

use platform::{correlation_span, init_logging, LogOptions};
use upps_core::{
    convert_profile, extended_output_path, has_pending_legacy, load_profile, save_profile,
    validate_profile, CheckSelection, ProfileStats, SchemaLocator, SchemaValidator,
    ValidatorConfig,
};

mod render;

#[derive(Parser, Debug)]
#[command(
    name = "upps",
    version,
    about = "Validate UPPS persona profiles and convert legacy fields to the extended format"
)]
struct Cli {
    /// Log at debug level regardless of RUST_LOG
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Validator configuration (TOML); falls back to UPPS_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a profile against the schema and its own cross-references
    Validate(ValidateArgs),
    /// Write an extended copy of a profile that still uses legacy fields
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Profile to validate
    profile: PathBuf,

    /// Run only the schema validation
    #[arg(long)]
    schema: bool,

    /// Run only the reference checks
    #[arg(long)]
    reference: bool,

    /// Run every check (the default)
    #[arg(long)]
    all: bool,

    /// Schema file, overriding the configured and discovered locations
    #[arg(long)]
    schema_path: Option<PathBuf>,

    /// Validate legacy fields as written instead of converting them first
    #[arg(long)]
    no_convert: bool,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Profile to convert
    profile: PathBuf,

    /// Output path; defaults to <name>_extended.<ext> next to the input
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let options = LogOptions {
        verbose: cli.verbose,
        ..LogOptions::default()
    };
    if let Err(e) = init_logging("upps", &options) {
        eprintln!("failed to init logging: {e}");
    }

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether the run succeeded; `Err` is reserved for environment
/// failures such as unreadable files.
fn run(cli: Cli) -> Result<bool> {
    let config = ValidatorConfig::resolve(cli.config.as_deref())
        .context("failed to load validator configuration")?;

    match cli.command {
        Command::Validate(args) => {
            let span = correlation_span(Uuid::new_v4(), "validate");
            let _guard = span.enter();
            validate(args, &config)
        }
        Command::Convert(args) => {
            let span = correlation_span(Uuid::new_v4(), "convert");
            let _guard = span.enter();
            convert(args).map(|()| true)
        }
    }
}

fn validate(args: ValidateArgs, config: &ValidatorConfig) -> Result<bool> {
    let mut profile = load_profile(&args.profile)?;
    println!("Profile: {}", args.profile.display());

    if has_pending_legacy(&profile) {
        if args.no_convert {
            warn!("profile uses legacy fields; validating as written");
        } else {
            let conversion = convert_profile(&profile)?;
            print!("{}", render::conversion_notice(&conversion.report));
            profile = conversion.profile;
        }
    }

    let selection = CheckSelection::from_flags(args.schema, args.reference, args.all);
    let schema = if selection.runs_schema() {
        let explicit = args.schema_path.or_else(|| config.schema.path.clone());
        Some(load_schema(explicit)?)
    } else {
        None
    };

    let summary = validate_profile(&profile, schema.as_ref(), config, selection);
    print!("{}", render::summary(&summary));
    print!("{}", render::stats(&ProfileStats::collect(&profile)));
    Ok(summary.passed())
}

fn load_schema(explicit: Option<PathBuf>) -> Result<SchemaValidator> {
    let path = SchemaLocator::from_environment(explicit).locate()?;
    info!(path = %path.display(), "using schema");
    SchemaValidator::from_path(&path)
        .with_context(|| format!("failed to load schema {}", path.display()))
}

fn convert(args: ConvertArgs) -> Result<()> {
    let profile = load_profile(&args.profile)?;
    let conversion = convert_profile(&profile)?;

    let output = args
        .output
        .unwrap_or_else(|| extended_output_path(&args.profile));
    write_output(&output, &conversion.profile)?;
    print!("{}", render::conversion(&conversion.report, &output));
    Ok(())
}

fn write_output(path: &Path, profile: &upps_core::Profile) -> Result<()> {
    save_profile(path, profile)?;
    info!(path = %path.display(), "extended profile written");
    Ok(())
}
