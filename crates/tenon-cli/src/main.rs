#![forbid(unsafe_code)]

mod cmd;
mod config;
mod output;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::Config;
use crate::output::{CliError, render_error};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tenon: quotation lifecycle and change attribution for furniture orders",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Workspace root (defaults to the current directory).
    #[arg(long, short = 'C', global = true, value_name = "DIR")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Initialize a tenon workspace",
        after_help = "EXAMPLES:\n    # Initialize in the current directory\n    tn init\n\n    # Wipe and start over\n    tn init --force"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        about = "Save the current form state of a material list",
        after_help = "EXAMPLES:\n    # Save a form file\n    tn save DD-2025-001 --file form.json\n\n    # Pipe the form in\n    cat form.json | tn save DD-2025-001"
    )]
    Save(cmd::save::SaveArgs),

    #[command(
        about = "Submit a material list for approval",
        after_help = "EXAMPLES:\n    tn submit DD-2025-001\n    tn submit DD-2025-001 --json"
    )]
    Submit(cmd::submit::OrderArgs),

    #[command(
        about = "Pull a submitted material list back for revision",
        after_help = "EXAMPLES:\n    tn revise DD-2025-001"
    )]
    Revise(cmd::revise::OrderArgs),

    #[command(
        about = "Close a quotation (terminal)",
        after_help = "EXAMPLES:\n    tn complete DD-2025-001"
    )]
    Complete(cmd::complete::OrderArgs),

    #[command(
        about = "Price a submitted material list from the catalog",
        after_help = "EXAMPLES:\n    # Use the configured default type\n    tn quote DD-2025-001\n\n    # Quote owner prices\n    tn quote DD-2025-001 --type owner"
    )]
    Quote(cmd::quote::QuoteArgs),

    #[command(
        about = "Show three-way change attribution",
        after_help = "EXAMPLES:\n    # Only changed fields\n    tn compare DD-2025-001\n\n    # Every row and field\n    tn compare DD-2025-001 --all --json"
    )]
    Compare(cmd::compare::CompareArgs),

    #[command(
        about = "Show one material list and its current rows",
        after_help = "EXAMPLES:\n    tn show DD-2025-001\n    tn show DD-2025-001 --json"
    )]
    Show(cmd::show::ShowArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TENON_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "tenon=debug,info"
        } else {
            "tenon=info,warn"
        })
    });

    let format = env::var("TENON_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    if format == "json" {
        registry
            .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let root = cli
        .dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let output = cli.output_mode();
    let config = Config::load(&root)?;

    match &cli.command {
        Commands::Init(args) => cmd::init::run_init(args, &root),
        Commands::Save(args) => cmd::save::run_save(args, &config, output, &root),
        Commands::Submit(args) => cmd::submit::run_submit(args, &config, output, &root),
        Commands::Revise(args) => cmd::revise::run_revise(args, &config, output, &root),
        Commands::Complete(args) => cmd::complete::run_complete(args, &config, output, &root),
        Commands::Quote(args) => cmd::quote::run_quote(args, &config, output, &root),
        Commands::Compare(args) => cmd::compare::run_compare(args, &config, output, &root),
        Commands::Show(args) => cmd::show::run_show(args, &config, output, &root),
    }
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        tracing::info!("verbose mode enabled");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let cli_error = match err.downcast::<CliError>() {
                Ok(coded) => coded,
                Err(err) => match err.downcast::<tenon_core::error::LifecycleError>() {
                    Ok(lifecycle) => CliError::from(&lifecycle),
                    Err(err) => CliError::internal(format!("{err:#}")),
                },
            };
            if render_error(cli.output_mode(), &cli_error).is_err() {
                eprintln!("error: {}", cli_error.message);
            }
            ExitCode::FAILURE
        }
    }
}
