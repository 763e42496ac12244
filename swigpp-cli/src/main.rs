// swigpp-cli: CLI entry point for the directive compiler (transform, build, profiles).

mod build_cmd;

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use swigpp_codegen::Backend;
use swigpp_codegen::config::SwigppConfig;
use swigpp_codegen::context::{self, RunOptions, RunSettings};
use swigpp_codegen::error::SwigppError;
use swigpp_codegen::profile::ProfileTable;

#[derive(Parser)]
#[command(name = "swigpp", about = "swigpp: extended SWIG interface compiler")]
struct Cli {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite the interface tree for one backend (replaces the previous module tree).
    Transform(RunArgs),
    /// Run the 3-step pipeline: clear outputs, transform, swig + post-process.
    Build {
        #[command(flatten)]
        run: RunArgs,
        /// Run only step N (1-3).
        #[arg(long)]
        step: Option<u8>,
        /// Start from step N (1-3, default: 1).
        #[arg(long, default_value_t = 1)]
        from: u8,
    },
    /// List the known build profiles.
    Profiles {
        /// Path to swigpp.config.toml.
        #[arg(long, default_value = "swigpp.config.toml")]
        config: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Path to swigpp.config.toml.
    #[arg(long, default_value = "swigpp.config.toml")]
    config: PathBuf,
    /// Output language: csharp, java, objc or emscripten.
    #[arg(long, value_parser = parse_backend)]
    backend: Backend,
    /// Target platform (required when the backend has several).
    #[arg(long)]
    target: Option<String>,
    /// Build profile id.
    #[arg(long)]
    profile: Option<String>,
    /// Extra semicolon-joined defines.
    #[arg(long)]
    defines: Option<String>,
    /// Path to the swig executable.
    #[arg(long)]
    swig: Option<String>,
}

fn parse_backend(name: &str) -> Result<Backend, String> {
    Backend::parse(name).ok_or_else(|| {
        let known: Vec<&str> = Backend::ALL.iter().map(|b| b.name()).collect();
        format!("unknown backend '{name}' (expected one of: {})", known.join(", "))
    })
}

/// Failures surfaced by the CLI.
#[derive(Debug)]
enum CliError {
    Usage(String),
    Swigpp(SwigppError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => f.write_str(msg),
            CliError::Swigpp(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<SwigppError> for CliError {
    fn from(err: SwigppError) -> Self {
        CliError::Swigpp(err)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Transform(args) => {
            let settings = resolve_settings(&args)?;
            build_cmd::run_transform_only(&settings)
        }
        Commands::Build { run, step, from } => {
            let steps = build_cmd::select_steps(step, from)?;
            let settings = resolve_settings(&run)?;
            build_cmd::run_steps(&settings, &steps)
        }
        Commands::Profiles { config } => {
            let (config, config_dir) = load_config(&config)?;
            let profiles = context::load_profiles(&config, &config_dir)?;
            print_profiles(&profiles);
            Ok(())
        }
    }
}

/// Load the config file and the directory its relative paths resolve against.
fn load_config(config_path: &Path) -> Result<(SwigppConfig, PathBuf), CliError> {
    let config = SwigppConfig::load(config_path)?;
    let config_dir = match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((config, config_dir))
}

fn resolve_settings(args: &RunArgs) -> Result<RunSettings, CliError> {
    let (config, config_dir) = load_config(&args.config)?;
    let opts = RunOptions {
        backend: args.backend,
        target: args.target.clone(),
        profile: args.profile.clone(),
        defines: args.defines.clone(),
        swig: args.swig.clone(),
    };
    Ok(RunSettings::resolve(&config, &config_dir, &opts)?)
}

fn print_profiles(profiles: &ProfileTable) {
    let default = profiles.default_id();
    for id in profiles.ids() {
        let marker = if Some(id) == default { " (default)" } else { "" };
        println!("{id}{marker}");
    }
}
