//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Report table-of-contents outlines: editor text, templates and JSON documents
#[derive(Parser, Debug)]
#[command(name = "tocsmith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(long, global = true, env = "TOCSMITH_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Derive the market name from a report title
    Market {
        /// Report title, e.g. "Global Drone Market Report"
        title: String,
    },

    /// Print the report template, optionally filled in for a title
    Template {
        /// Report title whose market name replaces the placeholder
        #[arg(short, long)]
        title: Option<String>,
        /// Parse the filled-in template and print the document as JSON
        #[arg(long, requires = "title")]
        json: bool,
    },

    /// Render a JSON document as outline text
    Serialize {
        /// Document file ('-' for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        document: PathBuf,
        /// Use template chapter lines (`Chapter no. N`)
        #[arg(long)]
        template_style: bool,
    },

    /// Parse editor text into a JSON document (unfit lines are dropped)
    Parse {
        /// Outline text file ('-' for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Write the document here instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Import template text strictly, reporting every bad line
    Import {
        /// Template text file ('-' for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Write the document here instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Show a JSON document as a tree
    Tree {
        /// Document file ('-' for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        document: PathBuf,
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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a commented config template
    Template,

    /// Show config paths
    Path,
}
