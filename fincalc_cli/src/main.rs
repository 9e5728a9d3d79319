//! # FinCalc CLI
//!
//! Command-line runner for the calculator registry. Every command prints
//! JSON on stdout so the output can be piped into other tools; logs go to
//! stderr.
//!
//! ```text
//! fincalc list --category real-estate
//! fincalc describe brrrr
//! fincalc validate rate-lock --input deal.json
//! echo '{"loanAmount": 300000, "baseInterestRate": 6.75, "discountPoints": 2}' \
//!     | fincalc run mortgage-points --input -
//! fincalc example usda-loan --index 1
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use fincalc_core::settings::LogFormat;
use fincalc_core::{CalcError, CalculatorRegistry, Category, InputRecord, Settings};

/// Log output format on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

/// Financial calculators for mortgages, real estate, insurance and personal finance.
#[derive(Parser)]
#[command(name = "fincalc", version, about)]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log format (overrides the settings file)
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormatArg>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered calculators
    List {
        /// Only show one category (finance, real-estate, business, insurance)
        #[arg(long)]
        category: Option<String>,
    },

    /// Print a calculator's descriptor
    Describe {
        /// Calculator id
        id: String,
    },

    /// Validate an input record without calculating
    Validate {
        /// Calculator id
        id: String,
        /// JSON input record file, or `-` for stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Validate and calculate an input record
    Run {
        /// Calculator id
        id: String,
        /// JSON input record file, or `-` for stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Run one of a calculator's built-in examples
    Example {
        /// Calculator id
        id: String,
        /// Example index (0-based)
        #[arg(long, default_value = "0")]
        index: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(format) = cli.log_format {
        settings.logging.format = format.into();
    }
    init_tracing(&settings);

    let registry =
        CalculatorRegistry::builtin(&settings).context("failed to build calculator registry")?;
    debug!(calculators = registry.len(), "registry ready");

    let out = Output { pretty: cli.pretty };

    match cli.command {
        Commands::List { category } => cmd_list(&registry, category.as_deref(), &out),
        Commands::Describe { id } => cmd_describe(&registry, &id, &out),
        Commands::Validate { id, input } => {
            let record = read_record(input.as_deref())?;
            cmd_validate(&registry, &id, &record, &out)
        }
        Commands::Run { id, input } => {
            let record = read_record(input.as_deref())?;
            cmd_run(&registry, &id, &record, &out)
        }
        Commands::Example { id, index } => cmd_example(&registry, &id, index, &out),
    }
}

// ============================================================================
// Setup
// ============================================================================

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let settings = match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    Ok(settings.with_env_overrides())
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_new(&settings.logging.filter)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match settings.logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

/// Read an input record from a file, stdin (`-`), or start empty
fn read_record(input: Option<&Path>) -> Result<InputRecord> {
    let source = match input {
        None => return Ok(InputRecord::new()),
        Some(path) if path.as_os_str() == "-" => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read input record from stdin")?;
            buffer
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input record {}", path.display()))?,
    };
    InputRecord::from_json_str(&source).context("input is not a JSON object")
}

// ============================================================================
// Output
// ============================================================================

struct Output {
    pretty: bool,
}

impl Output {
    fn print<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{text}");
        Ok(())
    }
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_list(registry: &CalculatorRegistry, category: Option<&str>, out: &Output) -> Result<ExitCode> {
    let descriptors = match category {
        Some(slug) => {
            let Some(category) = Category::parse(slug) else {
                bail!("unknown category '{slug}' (expected finance, real-estate, business or insurance)");
            };
            registry.by_category(category)
        }
        None => registry.list(),
    };

    let summaries: Vec<_> = descriptors
        .iter()
        .map(|d| {
            json!({
                "id": d.id,
                "name": d.name,
                "category": d.category,
                "subcategory": d.subcategory,
            })
        })
        .collect();
    out.print(&summaries)?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_describe(registry: &CalculatorRegistry, id: &str, out: &Output) -> Result<ExitCode> {
    let calculator = registry.get(id).ok_or_else(|| CalcError::unknown_calculator(id))?;
    out.print(calculator.descriptor())?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_validate(
    registry: &CalculatorRegistry,
    id: &str,
    record: &InputRecord,
    out: &Output,
) -> Result<ExitCode> {
    let result = registry.validate(id, record)?;
    out.print(&result)?;
    Ok(if result.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_run(
    registry: &CalculatorRegistry,
    id: &str,
    record: &InputRecord,
    out: &Output,
) -> Result<ExitCode> {
    match registry.calculate(id, record) {
        Ok(outputs) => {
            info!(calculator = id, warnings = outputs.warnings.len(), "calculated");
            out.print(&outputs)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err @ CalcError::ValidationFailed { .. }) => {
            out.print(&err)?;
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err).with_context(|| format!("calculator '{id}' failed")),
    }
}

fn cmd_example(registry: &CalculatorRegistry, id: &str, index: usize, out: &Output) -> Result<ExitCode> {
    let calculator = registry.get(id).ok_or_else(|| CalcError::unknown_calculator(id))?;
    let examples = &calculator.descriptor().examples;
    let Some(example) = examples.get(index) else {
        bail!("calculator '{id}' has {} example(s); index {index} is out of range", examples.len());
    };
    debug!(calculator = id, example = %example.title, "running example");

    let outputs = calculator
        .calculate(&example.inputs)
        .with_context(|| format!("example '{}' failed", example.title))?;
    out.print(&json!({
        "title": example.title,
        "description": example.description,
        "inputs": example.inputs,
        "outputs": outputs,
    }))?;
    Ok(ExitCode::SUCCESS)
}
