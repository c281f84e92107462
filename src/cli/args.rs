//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Extract every configured target into its catalog
//! - `scan`: Print the strings found in a single file
//! - `init`: Create a `.locxrc.json` configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Scan(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Directory to search for .locxrc.json from (default: current directory)
    #[arg(long, env = "LOCX_ROOT")]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Only run the targets with this output (can be repeated)
    #[arg(long, value_name = "OUTPUT")]
    pub target: Vec<String>,

    /// Print the catalogs instead of writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Write the full extraction log to FILE
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

/// How `scan` reads its input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ScanKind {
    /// Program text with marker calls
    Source,
    /// Markup with markup-extension values
    Markup,
    /// A disassembly listing already written to a text file
    Il,
    /// A compiled binary, disassembled with the configured tool
    Binary,
}

#[derive(Debug, Args)]
pub struct ScanCommand {
    /// File to scan
    pub file: PathBuf,

    /// Input kind (default: from the file extension)
    #[arg(long, value_enum)]
    pub kind: Option<ScanKind>,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract localizable strings into the configured catalogs
    Extract(ExtractCommand),
    /// Print the localizable strings found in one file
    Scan(ScanCommand),
    /// Initialize a new .locxrc.json configuration file
    Init,
}
