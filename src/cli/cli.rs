use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::data::LogLevel;

/// Shows which files differ from a reference branch as a compacted tree.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,

    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    /// Any directory inside the repository; the tree is rooted at its top level
    #[clap(long, short, default_value = ".", global = true)]
    pub root: PathBuf,

    /// Branch or commit to compare against instead of the detected one
    #[clap(long, global = true)]
    pub reference: Option<String>,

    /// List entries of every directory alphabetically
    #[clap(long, global = true)]
    pub sort: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Print the whole tree of changed files
    Tree {
        /// Print absolute paths next to changed files
        #[clap(long)]
        absolute: bool,
    },
    /// Print the children of one node, addressed by its path relative to the repository
    Children { path: String },
    /// List the branches that can be used as reference
    Branches {
        /// Compare against this branch and print the tree
        #[clap(long)]
        select: Option<String>,
    },
    /// Print the tree and print it again whenever the workspace or the checked-out
    /// branch changes
    Watch,
}

impl Default for CliCommand {
    fn default() -> Self {
        CliCommand::Tree { absolute: false }
    }
}
