mod cli;
mod config;
mod pipeline;
mod upload;
mod workbook;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::Parser;
use colored::*;

use cli::Cli;
use config::ReportConfig;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    // RUST_LOG takes precedence over -v
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = ReportConfig::load(cli.config.as_deref())?;
    cli::commands::dispatch(cli.command, &config)
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}
