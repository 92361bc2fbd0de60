use std::path::PathBuf;

use clap::{crate_authors, crate_description, crate_name, crate_version, Parser};

use crate::scenario::Concept;
use crate::summary::Format;

#[derive(Debug, Parser)]
#[command(disable_version_flag = true)]
#[clap(name = crate_name!(), about = crate_description!())]
#[clap(version = crate_version!(), author = crate_authors!())]
pub struct Opts {
    /// Configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<String>,
    /// Number of parallel workers.
    #[clap(short = 'j', long)]
    pub jobs: Option<usize>,
    /// Directory holding the intention files (default is ROOT/Intentions).
    #[clap(short = 'I', long)]
    pub intentions: Option<PathBuf>,
    /// Output format (text, json, table).
    #[clap(short = 'F', long, default_value = "text")]
    pub format: Format,
    /// Drop unknown aircraft instead of failing.
    #[clap(long)]
    pub relaxed: bool,
    /// Hierarchical view of spans in logs.
    #[clap(long)]
    pub use_tree: bool,
    /// Also log into hourly files in this directory.
    #[clap(long)]
    pub use_file: Option<String>,
    /// Sub-commands (see below).
    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Process every scenario found under ROOT.
    Run(RunOpts),
    /// Process a single registration log.
    Check(CheckOpts),
    /// List scenarios & their intention files.
    List(ListOpts),
    /// List all package versions.
    Version,
}

#[derive(Debug, Parser)]
pub struct RunOpts {
    /// Directory holding one sub-directory per concept.
    #[clap(default_value = ".")]
    pub root: PathBuf,
}

#[derive(Debug, Parser)]
pub struct CheckOpts {
    /// Concept of the run (Centralised, Decentralised, Hybrid).
    pub concept: Concept,
    /// Registration log.
    pub reglog: PathBuf,
}

#[derive(Debug, Parser)]
pub struct ListOpts {
    /// Directory holding one sub-directory per concept.
    #[clap(default_value = ".")]
    pub root: PathBuf,
}
