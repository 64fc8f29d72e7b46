use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use momo_core::TypeFilter;
use momo_ingest::{parse_with, ParseError, ParseOptions};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod config;
mod render;
mod state;

use config::DialectChoice;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("MOMO_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "momo",
    version,
    long_version = LONG_VERSION,
    about = "Summarize MoMo notifications from an exported chat log"
)]
struct Cli {
    /// Log skipped and malformed messages to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a chat export and print totals plus the transaction list
    Analyze {
        /// Chat export to read (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Timestamp style of the export (default from config: auto)
        #[arg(long, value_enum)]
        dialect: Option<DialectChoice>,

        /// Year for exports whose timestamps omit it
        #[arg(long)]
        year: Option<i32>,

        /// Only list one transaction type: all, received, sent, airtime, bundles
        #[arg(long, default_value = "all")]
        filter: TypeFilter,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage ~/.momo/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,

    /// Print the effective config
    Show,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Analyze {
            input,
            dialect,
            year,
            filter,
            format,
            output,
        } => {
            analyze(input.as_deref(), dialect, year, filter, format, output.as_deref())?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

// `RUST_LOG` overrides the default level, e.g. `RUST_LOG=momo_ingest=trace`
fn init_tracing(verbose: bool) {
    let default = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn analyze(
    input: Option<&Path>,
    dialect: Option<DialectChoice>,
    year: Option<i32>,
    filter: TypeFilter,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let cfg = config::load_config()?;
    let text = read_input(input)?;

    let reference_year = match year {
        Some(y) => y,
        None => config::reference_year(&cfg.parse.timezone)?,
    };
    let opts = ParseOptions {
        dialect: dialect.unwrap_or(cfg.parse.dialect).resolve(),
        reference_year,
    };
    tracing::debug!(?opts, input = ?input, "analyzing chat export");

    let out = match parse_with(&text, &opts) {
        Err(ParseError::EmptyInput) => bail!("Please paste some messages first! (input was empty)"),
        other => other.context("parsing messages")?,
    };

    if out.dialect.is_none() {
        eprintln!("No chat timestamps like [01/05, 10:00] or [10:00, 01/05/2024] found.");
    }

    let mut sink: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    match format {
        OutputFormat::Table => render::write_report(&mut sink, &out, filter, &cfg.display.currency_label)?,
        OutputFormat::Json => render::write_json(&mut sink, &out, filter)?,
        OutputFormat::Csv => render::write_csv(&mut sink, &out, filter)?,
    }
    sink.flush().context("flush output")?;

    if let Some(path) = output {
        let n = filter.apply(&out.transactions).len();
        eprintln!("Wrote {n} transactions to {}", path.display());
    }

    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
        }
        None => {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s).context("read stdin")?;
            Ok(s)
        }
    }
}
