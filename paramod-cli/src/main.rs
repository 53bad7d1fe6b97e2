mod convert;
mod stages;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use paramod::{Error, PipelineConfig};
use tracing_subscriber::EnvFilter;

use crate::convert::{ConvertOptions, run_convert, run_inspect};
use crate::stages::{run_build, run_extract, run_fetch, run_manifest, run_pack};

/// Configuration read from the working directory when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "paramod.toml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Pipeline configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the whole pipeline: fetch, convert, pack and publish.
    Build {
        /// Publish into this directory instead of the configured bucket
        #[arg(long, value_name = "DIR")]
        dry_run: Option<PathBuf>,
    },

    /// Download the translation artifact.
    Fetch {
        /// Where to write the artifact (defaults to the work directory cache)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract export folders from a translation artifact.
    Extract {
        /// The artifact zip
        #[arg(short, long)]
        input: PathBuf,
        /// Directory receiving one subdirectory per folder
        #[arg(short, long)]
        output: PathBuf,
        /// Folder below `raw/` to extract (repeatable; defaults to the configured folders)
        #[arg(short, long = "folder")]
        folders: Vec<String>,
    },

    /// Convert a directory of JSON exports into localisation tables.
    Convert {
        /// Directory holding `*.json` exports
        #[arg(short, long)]
        input: PathBuf,
        /// Directory for the converted tables
        #[arg(short, long)]
        output: PathBuf,
        /// Encoder format pair, e.g. `eu4:txt`
        #[arg(long)]
        encoder: Option<String>,
        /// Printer format pair, e.g. `ck2:txt`
        #[arg(long)]
        printer: Option<String>,
        /// Key always emitted with its original text (repeatable)
        #[arg(long = "exclude-key")]
        exclude_keys: Vec<String>,
        /// Regex of keys always emitted with their original text
        #[arg(long)]
        exclude_pattern: Option<String>,
    },

    /// Print the rows of a converted table.
    Inspect {
        /// The converted file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Pack a content archive with the configured descriptor.
    Pack {
        /// Content archive to pack (defaults to the work directory one)
        #[arg(long)]
        content: Option<PathBuf>,
        /// Package file (defaults to the configured output)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a distribution manifest for an existing package.
    Manifest {
        /// The published package
        #[arg(long)]
        package: PathBuf,
        /// URL the package is served from
        #[arg(long)]
        url: String,
        /// Manifest file (defaults to the configured one)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Reads `--config`, else `paramod.toml` when present, else the built-in defaults.
fn load_config(path: Option<&Path>) -> Result<PipelineConfig, Error> {
    match path {
        Some(path) => PipelineConfig::from_toml_file(path),
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            PipelineConfig::from_toml_file(Path::new(DEFAULT_CONFIG_FILE))
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn run(args: Args) -> Result<(), Error> {
    let config = load_config(args.config.as_deref())?;

    match args.commands {
        Commands::Build { dry_run } => run_build(config, dry_run.as_deref()),
        Commands::Fetch { output } => run_fetch(&config, output.as_deref()),
        Commands::Extract {
            input,
            output,
            folders,
        } => run_extract(&config, &input, &output, &folders),
        Commands::Convert {
            input,
            output,
            encoder,
            printer,
            exclude_keys,
            exclude_pattern,
        } => run_convert(
            &config,
            ConvertOptions {
                encoder,
                printer,
                exclude_keys,
                exclude_pattern,
            },
            &input,
            &output,
        ),
        Commands::Inspect { input } => run_inspect(&input),
        Commands::Pack { content, output } => {
            run_pack(&config, content.as_deref(), output.as_deref())
        }
        Commands::Manifest {
            package,
            url,
            output,
        } => run_manifest(&config, &package, &url, output.as_deref()),
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
