use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use version_labeler::cli::{exit_codes, extract, reconcile};
use version_labeler::Result;

#[derive(Parser)]
#[command(name = "version-labeler")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Label issues with the version reported in their description", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the version label matching the issue body, removing stale ones
    Reconcile(reconcile::ReconcileArgs),

    /// Print the version found in an issue body read from a file or stdin
    Extract(extract::ExtractArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}", format!("Error: failed to create tokio runtime: {e}").red());
            return ExitCode::from(exit_codes::GENERIC_ERROR);
        }
    };

    match runtime.block_on(run_async(cli)) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{}", format!("Error: {e:#}").red());
            ExitCode::from(exit_codes::exit_code_for(&e))
        }
    }
}

async fn run_async(cli: Cli) -> Result<u8> {
    match cli.command {
        Commands::Reconcile(args) => reconcile::run(args).await,
        Commands::Extract(args) => {
            extract::run(args)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info,version_labeler=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,version_labeler=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
