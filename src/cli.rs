use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "tournament desk: brackets and SMS score reports")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the HTTP server (SMS webhook and director endpoints)
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Drop and recreate every table
    Reset,
    /// Load players, divisions and entries from a JSON roster
    Import {
        path: PathBuf,
    },
    /// Draw round 1 of a division's main bracket
    Draw {
        division_id: i64,
        /// Seed for a reproducible draw
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Generate the next round of a bracket once the current one is done
    Advance {
        bracket_id: i64,
        /// Round the bracket is expected to be in; repeats become no-ops
        #[arg(short, long)]
        from_round: Option<u32>,
    },
    /// Print a division's brackets
    Show {
        division_id: i64,
    },
    /// List score reports waiting on the director
    Pending,
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}
