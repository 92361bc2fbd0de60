//! Scan registration logs of simulation runs for aircraft bouncing on their destination or
//! straying outside the airspace.
//!

use std::path::{Path, PathBuf};

use clap::{crate_authors, crate_version, Parser};
use eyre::Result;
use tracing::{info, trace};

use reglog_common::{init_logging, ConfigFile};

use crate::cli::{Opts, SubCommand};
use crate::config::{Context, ProcessConfig, CONFIG, CVERSION};
use crate::pool::run_all;
use crate::scenario::{discover, list_scenarios, Scenario};
use crate::summary::render;

mod classify;
mod cli;
mod config;
mod error;
mod pool;
mod scenario;
mod summary;

/// Binary name, using a different binary name
pub const NAME: &str = env!("CARGO_BIN_NAME");
/// Binary version
pub const VERSION: &str = crate_version!();
/// Authors
pub const AUTHORS: &str = crate_authors!();

fn main() -> Result<()> {
    let opts = Opts::parse();

    // No need for logging or configuration there
    //
    if let SubCommand::Version = opts.subcmd {
        banner();
        return Ok(());
    }

    // Initialise logging early
    //
    init_logging(NAME, opts.use_tree, opts.use_file.clone())?;
    trace!("Logging initialised.");

    let cfg = ConfigFile::<ProcessConfig>::load(opts.config.as_deref(), CONFIG, CVERSION)?;
    let cfg = cfg.inner();

    match &opts.subcmd {
        SubCommand::Run(ropts) => {
            let ctx = Context::new(&opts, cfg, &ropts.root)?;
            let list = discover(&ropts.root)?;
            let res = run_all(&list, &ctx)?;
            info!("{} scenarios processed", res.len());

            let out = render(&res, ctx.format)?;
            if !out.is_empty() {
                println!("{out}");
            }
        }
        SubCommand::Check(copts) => {
            // The log lives in ROOT/<concept>/
            //
            let root = copts
                .reglog
                .parent()
                .and_then(Path::parent)
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            let ctx = Context::new(&opts, cfg, &root)?;

            let summary = Scenario::new(copts.concept, &copts.reglog).process(&ctx)?;
            println!("{}", render(&[summary], ctx.format)?);
        }
        SubCommand::List(lopts) => {
            let ctx = Context::new(&opts, cfg, &lopts.root)?;
            let list = discover(&lopts.root)?;
            println!("{}", list_scenarios(&list, &ctx.naming)?);
        }
        SubCommand::Version => banner(),
    }
    Ok(())
}

fn banner() {
    println!(
        "{NAME} v{VERSION} by {AUTHORS}\n{}\n{}",
        reglog_common::version(),
        reglog_formats::version()
    );
}
