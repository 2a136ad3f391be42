use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;

use compiler::{ColorChoice, CompilationPipeline, CompilerConfig, ExitStatus};
use front_end::error::CompileError;

#[derive(Parser)]
#[command(name = "minic", version)]
#[command(about = "Scanner, parser and name analysis for the Mini language")]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// When to colour diagnostics
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    color: ColorChoice,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan, parse and analyze names, printing any diagnostics
    Check {
        /// Path to the Mini source file
        path: PathBuf,

        /// Print the program with resolved types after analysis
        #[arg(long)]
        unparse: bool,
    },
    /// Print the token stream, one token per line
    Tokens {
        /// Path to the Mini source file
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let unparse = matches!(cli.command, Commands::Check { unparse: true, .. });
    let config = CompilerConfig {
        verbosity: cli.verbose,
        color: cli.color,
        unparse,
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    config.color.apply();

    let pipeline = CompilationPipeline::new(config);
    let status = match cli.command {
        Commands::Check { path, .. } => check(&pipeline, path),
        Commands::Tokens { path } => tokens(&pipeline, path),
    };

    ExitCode::from(status.code())
}

fn check(pipeline: &CompilationPipeline, path: PathBuf) -> ExitStatus {
    let result = match pipeline.check_file(&path) {
        Ok(result) => result,
        Err(e) => return report_failure(&path, e),
    };

    for diagnostic in &result.diagnostics {
        eprintln!("{}\n", diagnostic);
    }

    if let Some(text) = pipeline.unparsed(&result) {
        print!("{}", text);
    }

    let count = result.error_count();
    if count > 0 {
        eprintln!("{}: {} error(s) found in {}", "error".red().bold(), count, path.display());
    }
    result.exit_status()
}

fn tokens(pipeline: &CompilationPipeline, path: PathBuf) -> ExitStatus {
    let dump = match pipeline.tokens_file(&path) {
        Ok(dump) => dump,
        Err(e) => return report_failure(&path, e),
    };

    for diagnostic in &dump.diagnostics {
        eprintln!("{}\n", diagnostic);
    }
    print!("{}", dump.text);
    dump.exit_status()
}

fn report_failure(path: &Path, e: CompileError) -> ExitStatus {
    debug!(path = %path.display(), error = ?e, "command failed");
    eprintln!("{}: {}: {}", "error".red().bold(), path.display(), e);
    ExitStatus::for_error(&e)
}
