//! CLI entry point for the cleaning pipeline.

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use lex_cleaning::output::{PREVIEW_ROWS, preview_records, to_csv_bytes};
use lex_cleaning::{CleaningConfig, CleaningPipeline, EncodeMethod, FillStrategy};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Declarative CSV cleaning: drop, rename, fill and encode",
    long_about = "Apply a cleaning configuration to a CSV file.\n\n\
                  Operations always run in the order drop, rename, fillna, encode.\n\n\
                  EXAMPLES:\n  \
                  # Configuration as JSON\n  \
                  lex-cleaning clean -i data.csv -c '{\"drop\": [\"city\"]}'\n\n  \
                  # Same thing with flags, preview the first rows\n  \
                  lex-cleaning clean -i data.csv --drop city --preview\n\n  \
                  # Fill and one-hot encode, write to a file\n  \
                  lex-cleaning clean -i data.csv --fillna mode --encode color --encode-method onehot -o out.csv\n\n  \
                  # Serve POST /clean on port 8000\n  \
                  lex-cleaning serve --port 8000"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean a CSV file and write the result
    Clean(CleanArgs),

    /// Serve the cleaning pipeline over HTTP
    #[cfg(feature = "server")]
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = 8000)]
        port: u16,
    },
}

#[derive(Args, Debug)]
struct CleanArgs {
    /// Path to the CSV file to clean
    #[arg(short, long)]
    input: PathBuf,

    /// Cleaning configuration as a JSON document
    #[arg(
        short,
        long,
        conflicts_with_all = ["config_file", "drop", "rename", "fillna", "encode"]
    )]
    config: Option<String>,

    /// Path to a JSON file holding the cleaning configuration
    #[arg(long, conflicts_with_all = ["drop", "rename", "fillna", "encode"])]
    config_file: Option<PathBuf>,

    /// Columns to remove (comma separated)
    #[arg(long, value_delimiter = ',')]
    drop: Vec<String>,

    /// Column rename as OLD=NEW (repeatable)
    #[arg(long, value_parser = parse_rename)]
    rename: Vec<(String, String)>,

    /// Fill strategy for missing values (mean, median, mode, constant)
    #[arg(long)]
    fillna: Option<String>,

    /// Value used by the constant fill strategy
    #[arg(long, requires = "fillna", allow_negative_numbers = true)]
    fill_value: Option<f64>,

    /// Columns to encode (comma separated)
    #[arg(long, value_delimiter = ',')]
    encode: Vec<String>,

    /// Encoding method (label, onehot)
    #[arg(long, default_value = "label", requires = "encode")]
    encode_method: String,

    /// Print the first rows as JSON instead of writing CSV
    #[arg(long)]
    preview: bool,

    /// Output CSV path (stdout if omitted)
    #[arg(short, long, conflicts_with = "preview")]
    output: Option<PathBuf>,
}

fn parse_rename(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((from, to)) if !from.is_empty() && !to.is_empty() => {
            Ok((from.to_string(), to.to_string()))
        }
        _ => Err(format!("expected OLD=NEW, got '{}'", s)),
    }
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so stdout only carries the cleaned data.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.quiet);

    match cli.command {
        Command::Clean(args) => run_clean(&args),
        #[cfg(feature = "server")]
        Command::Serve { port } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(lex_cleaning::server::start_server(port))
        }
    }
}

fn run_clean(args: &CleanArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    let config = build_config(args)?;
    debug!("Configuration: {:?}", config);

    info!("Loading dataset from: {}", args.input.display());
    let raw = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let result = CleaningPipeline::new(config).process_bytes(&raw)?;
    for step in &result.summary.processing_steps {
        info!("  {}", step);
    }

    if args.preview {
        let records = preview_records(&result.table, PREVIEW_ROWS);
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let bytes = to_csv_bytes(&result.table)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Cleaned dataset saved to: {}", path.display());
        }
        None => std::io::stdout().lock().write_all(&bytes)?,
    }

    Ok(())
}

/// Build the configuration from `--config`, `--config-file` or the flags.
fn build_config(args: &CleanArgs) -> Result<CleaningConfig> {
    if let Some(raw) = &args.config {
        return Ok(CleaningConfig::from_json_str(raw)?);
    }

    if let Some(path) = &args.config_file {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        return Ok(CleaningConfig::from_json_str(&raw)?);
    }

    let mut builder = CleaningConfig::builder();

    if !args.drop.is_empty() {
        builder = builder.drop(args.drop.iter().cloned());
    }

    for (from, to) in &args.rename {
        builder = builder.rename(from.clone(), to.clone());
    }

    if let Some(strategy) = &args.fillna {
        let strategy: FillStrategy = strategy.parse()?;
        if strategy == FillStrategy::Constant && args.fill_value.is_none() {
            bail!("--fillna constant requires --fill-value");
        }
        builder = builder.fillna(strategy, args.fill_value);
    }

    if !args.encode.is_empty() {
        let method: EncodeMethod = args.encode_method.parse()?;
        builder = builder.encode(args.encode.iter().cloned(), method);
    }

    Ok(builder.build()?)
}
