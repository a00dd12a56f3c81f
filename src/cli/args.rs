//! CLI argument definitions using clap
//!
//! Exactly one operation flag is accepted per invocation. `-h` and `-v` are
//! operations of their own, so clap's built-in help and version flags are off.
//! Positional arguments after the operation are accepted and ignored.

use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Parser, ValueHint};

/// Control-plane client for the CamFlow provenance-capture LSM
#[derive(Parser, Debug)]
#[command(name = "provctl")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
#[command(group(
    ArgGroup::new("operation")
        .required(true)
        .multiple(false)
        .args([
            "help",
            "version",
            "state",
            "enable",
            "all",
            "file",
            "track",
            "taint",
            "opaque",
            "propagate_node",
            "propagate_relation",
            "node_filter",
            "relation_filter",
            "reset",
            "completions",
            "show_config",
            "config_template",
        ])
))]
pub struct Cli {
    /// usage.
    #[arg(short = 'h', long = "help")]
    pub help: bool,

    /// print version.
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// print provenance capture state.
    #[arg(short = 's')]
    pub state: bool,

    /// enable/disable provenance capture.
    #[arg(short = 'e', value_name = "BOOL")]
    pub enable: Option<String>,

    /// activate/deactivate whole-system provenance capture.
    #[arg(short = 'a', value_name = "BOOL")]
    pub all: Option<String>,

    /// display provenance info of a file.
    #[arg(short = 'f', value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// false/true/propagate deactivate/activate/propagate tracking.
    #[arg(short = 't', num_args = 2, value_names = ["FILE", "MODE"])]
    pub track: Option<Vec<String>>,

    /// applies taint to the file.
    #[arg(
        short = 'u',
        num_args = 2,
        value_names = ["FILE", "UINT64"],
        allow_hyphen_values = true
    )]
    pub taint: Option<Vec<String>>,

    /// mark/unmark a file as opaque.
    #[arg(short = 'o', num_args = 2, value_names = ["FILE", "BOOL"])]
    pub opaque: Option<Vec<String>>,

    /// filter/unfilter propagation to node type.
    #[arg(short = 'p', num_args = 2, value_names = ["TYPE", "BOOL"])]
    pub propagate_node: Option<Vec<String>>,

    /// filter/unfilter propagation through edge type.
    #[arg(short = 'q', num_args = 2, value_names = ["TYPE", "BOOL"])]
    pub propagate_relation: Option<Vec<String>>,

    /// filter/unfilter capture of node type.
    #[arg(short = 'i', num_args = 2, value_names = ["TYPE", "BOOL"])]
    pub node_filter: Option<Vec<String>>,

    /// filter/unfilter capture of edge type.
    #[arg(short = 'j', num_args = 2, value_names = ["TYPE", "BOOL"])]
    pub relation_filter: Option<Vec<String>>,

    /// reset filters.
    #[arg(short = 'r')]
    pub reset: bool,

    /// Generate shell completions
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,

    /// Show effective configuration
    #[arg(long)]
    pub show_config: bool,

    /// Print a commented config file template
    #[arg(long)]
    pub config_template: bool,

    /// Debug output on stderr (repeat for more: -d -d -d)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count)]
    pub debug: u8,

    /// securityfs directory of the provenance LSM
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub control_dir: Option<PathBuf>,

    /// Exit nonzero on malformed booleans and failed control calls
    #[arg(long)]
    pub strict: bool,

    /// Anything after the operation's own arguments is ignored.
    #[arg(trailing_var_arg = true, num_args = 0.., hide = true, value_name = "IGNORED")]
    pub rest: Vec<String>,
}

