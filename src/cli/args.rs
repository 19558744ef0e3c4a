//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

/// Organization chart explorer: radial layout, filtering and node details
#[derive(Parser, Debug)]
#[command(name = "orgmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory with company files (overrides config)
    #[arg(short = 'D', long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available companies
    List,

    /// Lay out a company chart and print nodes and edges
    Layout {
        /// Company slug
        company: String,

        #[command(flatten)]
        filter: FilterArgs,

        /// What to do with nodes whose parent is filtered out
        #[arg(long, value_name = "POLICY")]
        orphans: Option<String>,

        /// Node id to select
        #[arg(long, value_name = "NODE_ID")]
        select: Option<String>,

        /// Fit the viewport to the visible nodes and print it
        #[arg(long)]
        fit: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the company hierarchy as a tree
    Tree {
        /// Company slug
        company: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show details of one node
    Show {
        /// Company slug
        company: String,

        /// Node id, e.g. gov-0-sub-1-role-2
        node_id: String,
    },

    /// Search public information about a company
    Search {
        /// Company name
        name: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Filter flags shared by chart commands
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive text matched against label and description
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Category: all, root, governance, subunit, role
    #[arg(short, long, default_value = "all")]
    pub category: String,

    /// Role level, or all
    #[arg(short, long, default_value = "all")]
    pub level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,

    /// Show config file locations
    Path,

    /// Create config template
    Init {
        /// Create in global location (~/.config/orgmap/)
        #[arg(short, long)]
        global: bool,
    },
}
