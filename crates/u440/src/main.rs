use std::process::ExitCode;

use anstream::eprintln;
use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;

use crate::cli::Cli;
use crate::commands::ExitStatus;

mod cli;
mod commands;
mod logging;
mod printer;

fn run() -> Result<ExitStatus> {
    let cli = Cli::parse();

    // Colors have to be set up first, the log formatter asks `anstream` whether to use them.
    if cli.no_color {
        anstream::ColorChoice::write_global(anstream::ColorChoice::Never);
    } else {
        anstream::ColorChoice::write_global(cli.color.into());
    }

    // Configure the `tracing` crate, which controls internal logging.
    logging::setup_logging(match cli.verbose {
        0 => logging::Level::Default,
        1 => logging::Level::Verbose,
        _ => logging::Level::ExtraVerbose,
    })?;

    // Configure the `Printer`, which controls user-facing output in the CLI.
    let printer = if cli.quiet {
        printer::Printer::Quiet
    } else if cli.verbose > 0 {
        printer::Printer::Verbose
    } else {
        printer::Printer::Default
    };

    commands::pack(&cli.versions, cli.scheme, cli.output_format, printer)
}

#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    match run() {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("{}: {}", "error".red().bold(), err);
            for cause in err.chain().skip(1) {
                eprintln!("  {}: {}", "Caused by".red().bold(), cause);
            }
            ExitStatus::Error.into()
        }
    }
}
