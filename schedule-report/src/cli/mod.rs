//! Command-line surface

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "schedule-report")]
#[command(about = "Turn broadcast schedule exports into per-channel spot reports")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the user config dir, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the whole pipeline on a schedule export, as an upload would
    Process {
        /// Schedule workbook (.xls or .xlsx)
        file: PathBuf,

        /// Directory holding the uploads and processed folders
        #[arg(long, default_value = ".")]
        workdir: PathBuf,
    },
    /// Extract metadata and the cleaned spot table
    Extract {
        input: PathBuf,
        output: PathBuf,
    },
    /// Split a cleaned table into one sheet per channel
    Reshape {
        input: PathBuf,
        output: PathBuf,

        #[arg(long, default_value = "")]
        brand: String,

        #[arg(long, default_value = "")]
        copyline: String,
    },
    /// Stack per-channel sheets into the styled report
    Format {
        input: PathBuf,
        output: PathBuf,
    },
}
