//! axiomc CLI - compile, check, and run Axiom rules.
//!
//! Exit codes: 0 on success, 1 when the rule itself is rejected (syntax,
//! type, or runtime error, reported as structured JSON on stderr), 2 for
//! I/O and usage problems.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde_json::Value as Json;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use axiomc_drv::{loader, ErrorReport};
use axiomc_util::Error;

/// Axiom rule engine
///
/// Compiles, type-checks, and executes Axiom rules against JSON
/// contracts and context data.
#[derive(Parser, Debug)]
#[command(name = "axiomc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Axiom rule engine", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "AXIOMC_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Type-check a rule against a contract
    Check(CheckCommand),

    /// Compile, check, and execute a rule
    Run(RunCommand),
}

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Rule source file
    rule: PathBuf,

    /// Contract JSON file
    #[arg(short, long)]
    contract: PathBuf,
}

/// Arguments for the run subcommand.
#[derive(Args, Debug)]
struct RunCommand {
    /// Rule source file
    rule: PathBuf,

    /// Contract JSON file
    #[arg(short, long)]
    contract: PathBuf,

    /// Context JSON file (defaults to an empty context)
    #[arg(short = 'x', long)]
    context: Option<PathBuf>,

    /// Print the token stream and exit
    #[arg(long)]
    emit_tokens: bool,

    /// Print the AST and exit
    #[arg(long)]
    emit_ast: bool,
}

/// A command failure: either the rule was rejected by the pipeline, or
/// something environmental (I/O, malformed JSON files) went wrong.
enum CliError {
    Rule(ErrorReport),
    Other(anyhow::Error),
}

impl From<anyhow::Error> for CliError {
    fn from(error: anyhow::Error) -> Self {
        CliError::Other(error)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = init_logging(cli.verbose) {
        eprintln!("warning: failed to initialize logging: {error}");
    }

    match execute_command(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Rule(report)) => {
            match serde_json::to_string_pretty(&report) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{}: {}", report_kind(&report), report.message),
            }
            ExitCode::from(1)
        }
        Err(CliError::Other(error)) => {
            eprintln!("error: {error:#}");
            ExitCode::from(2)
        }
    }
}

fn report_kind(report: &ErrorReport) -> &'static str {
    match report.kind {
        axiomc_util::ErrorKind::Syntax => "syntax error",
        axiomc_util::ErrorKind::Type => "type error",
        axiomc_util::ErrorKind::Runtime => "runtime error",
    }
}

/// Initialize the logging system. Verbose mode lowers the filter to
/// debug; `RUST_LOG` overrides both.
fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .map_err(|error| anyhow::anyhow!("{error}"))
}

fn execute_command(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Check(args) => execute_check(args),
        Commands::Run(args) => execute_run(args),
    }
}

fn execute_check(args: CheckCommand) -> Result<(), CliError> {
    let source = read_rule(&args.rule)?;
    let contract = loader::load_contract(&args.contract)?;

    let result = (|| {
        let ast = axiomc_drv::compile(&source)?;
        axiomc_drv::check(&ast, &contract)
    })();

    match result {
        Ok(Some(ty)) => {
            println!("ok: rule conforms to contract '{}', result type {ty}", contract.name);
            Ok(())
        }
        Ok(None) => {
            println!("ok: rule conforms to contract '{}', no result", contract.name);
            Ok(())
        }
        Err(error) => Err(rule_error(error, &args.rule)),
    }
}

fn execute_run(args: RunCommand) -> Result<(), CliError> {
    let source = read_rule(&args.rule)?;
    let contract = loader::load_contract(&args.contract)?;
    let context = match &args.context {
        Some(path) => read_json(path)?,
        None => Json::Object(serde_json::Map::new()),
    };

    let result = (|| {
        if args.emit_tokens {
            for token in axiomc_lex::tokenize(&source)? {
                println!("{token:?}");
            }
            return Ok(None);
        }

        let ast = axiomc_drv::compile(&source)?;
        if args.emit_ast {
            println!("{ast:#?}");
            return Ok(None);
        }

        axiomc_drv::check(&ast, &contract)?;
        info!(contract = %contract.name, "rule checked, executing");
        axiomc_drv::execute(&ast, &contract, &context).map(Some)
    })();

    match result {
        Ok(Some(value)) => {
            let json = serde_json::to_string_pretty(&value.to_json())
                .map_err(|error| CliError::Other(error.into()))?;
            println!("{json}");
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(error) => Err(rule_error(error, &args.rule)),
    }
}

fn rule_error(error: Error, rule: &PathBuf) -> CliError {
    CliError::Rule(ErrorReport::from(&error).with_filename(rule.display().to_string()))
}

fn read_rule(path: &PathBuf) -> Result<String, CliError> {
    fs::read_to_string(path)
        .map_err(|error| {
            CliError::Other(anyhow::anyhow!(
                "failed to read rule file {}: {error}",
                path.display()
            ))
        })
}

fn read_json(path: &PathBuf) -> Result<Json, CliError> {
    let text = fs::read_to_string(path).map_err(|error| {
        CliError::Other(anyhow::anyhow!(
            "failed to read context file {}: {error}",
            path.display()
        ))
    })?;
    serde_json::from_str(&text).map_err(|error| {
        CliError::Other(anyhow::anyhow!(
            "context file {} is not valid JSON: {error}",
            path.display()
        ))
    })
}
