//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use icd_recode_loader::ParseConfig;

/// Map ICD-10 cause-of-death codes to NCHS recode values.
#[derive(Debug, Parser)]
#[command(name = "icd-recode", version, about)]
pub struct Cli {
    /// Recode table to load.
    #[arg(short, long, env = "RECODE_TABLE_PATH", global = true)]
    pub table: Option<PathBuf>,

    /// Title lines at the top of the table to ignore.
    #[arg(long, default_value_t = 1, global = true)]
    pub skip_header: usize,

    /// Columns a tab counts for when measuring indentation.
    #[arg(long, default_value_t = 4, global = true)]
    pub tab_width: usize,

    /// Swap inverted ranges instead of rejecting the table.
    #[arg(long, global = true)]
    pub lenient: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the recode values of one or more codes.
    Lookup {
        /// ICD-10 codes, e.g. G20 or C14.0.
        #[arg(required = true)]
        codes: Vec<String>,
        /// Emit JSON including the matched groups.
        #[arg(long)]
        json: bool,
    },
    /// Print the recode values of leaves containing a whole group of codes.
    Group {
        /// Code list such as "A01-A10, C90-C99".
        codes: String,
    },
    /// Print the parsed hierarchy.
    Tree {
        /// Emit JSON instead of the indented table layout.
        #[arg(long)]
        json: bool,
    },
    /// List the recode tables in a directory.
    Tables {
        /// Directory to search.
        dir: PathBuf,
    },
}

impl Cli {
    /// Builds the parser configuration from the flags.
    pub fn parse_config(&self) -> ParseConfig {
        ParseConfig {
            tab_width: self.tab_width,
            skip_header_lines: self.skip_header,
            allow_inverted_ranges: self.lenient,
        }
    }
}
