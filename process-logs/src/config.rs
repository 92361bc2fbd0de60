//! Configuration module
//!
//! Everything has a default so the configuration file is optional.  It lives in
//! `$HOME/.config/reglog/process-logs.hcl` unless specified with `-c`.  Command-line flags
//! override the file.
//!
//! Version History:
//!
//! - v1 is the initial version
//!

use std::path::Path;

use eyre::Result;
use reglog_common::{LatLon, Versioned};
use reglog_formats::{Layout, Naming, UNCERTAIN};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::classify::{Rules, CENTER};
use crate::cli::Opts;
use crate::error::Status;
use crate::summary::Format;

/// Config filename
pub const CONFIG: &str = "process-logs.hcl";

/// Current version
pub const CVERSION: usize = 1;

/// Configuration file for `process-logs`
///
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    pub version: usize,
    /// Directory holding the intention files, default is `<root>/Intentions`
    pub intentions: Option<String>,
    /// Parallel workers
    pub jobs: usize,
    /// Bounce threshold in meters
    pub proximity: f64,
    /// Airspace radius in meters
    pub boundary: f64,
    /// Strikes needed to be reported
    pub min_strikes: usize,
    /// Airspace center
    pub center_lat: f64,
    pub center_lon: f64,
    /// Lines before the first block in registration logs
    pub header_lines: usize,
    /// Seconds between blocks
    pub time_step: u64,
    /// Identities to ignore
    pub rogues: Vec<String>,
    /// Prefix of tracked identities
    pub prefix: String,
    /// Uncertainty tags in scenario names
    pub uncertain: Vec<String>,
    /// Unknown identities are fatal
    pub strict_ids: bool,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        let layout = Layout::default();
        let rules = Rules::default();
        ProcessConfig {
            version: CVERSION,
            intentions: None,
            jobs: 4,
            proximity: rules.proximity,
            boundary: rules.boundary,
            min_strikes: rules.min_strikes,
            center_lat: CENTER.lat,
            center_lon: CENTER.lon,
            header_lines: layout.header,
            time_step: layout.step,
            rogues: layout.rogues,
            prefix: layout.prefix.to_string(),
            uncertain: UNCERTAIN.iter().map(|s| s.to_string()).collect(),
            strict_ids: true,
        }
    }
}

impl Versioned for ProcessConfig {
    fn version(&self) -> usize {
        self.version
    }
}

/// This holds our context, everything a worker needs to process a scenario.
///
#[derive(Clone, Debug)]
pub struct Context {
    pub layout: Layout,
    pub rules: Rules,
    pub naming: Naming,
    /// Parallel workers
    pub jobs: usize,
    pub format: Format,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            layout: Layout::default(),
            rules: Rules::default(),
            naming: Naming::default(),
            jobs: 4,
            format: Format::default(),
        }
    }
}

impl Context {
    /// Merge the configuration file & command-line flags.  `root` is where the concept
    /// directories are.
    ///
    #[tracing::instrument(skip(opts))]
    pub fn new(opts: &Opts, cfg: &ProcessConfig, root: &Path) -> Result<Self> {
        trace!("Building context");

        let jobs = opts.jobs.unwrap_or(cfg.jobs);
        if jobs == 0 {
            return Err(Status::BadJobs(jobs).into());
        }
        if cfg.time_step == 0 {
            return Err(Status::BadTimeStep.into());
        }

        let mut chars = cfg.prefix.chars();
        let prefix = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(Status::BadPrefix(cfg.prefix.clone()).into()),
        };

        let strict = cfg.strict_ids && !opts.relaxed;

        let intentions = match (&opts.intentions, &cfg.intentions) {
            (Some(dir), _) => dir.clone(),
            (None, Some(dir)) => dir.into(),
            (None, None) => root.join("Intentions"),
        };
        debug!("intentions in {intentions:?}");

        let ctx = Context {
            layout: Layout {
                header: cfg.header_lines,
                step: cfg.time_step,
                rogues: cfg.rogues.clone(),
                prefix,
                strict,
            },
            rules: Rules {
                proximity: cfg.proximity,
                boundary: cfg.boundary,
                min_strikes: cfg.min_strikes,
                center: LatLon::new(cfg.center_lat, cfg.center_lon),
                strict,
            },
            naming: Naming {
                intentions,
                uncertain: cfg.uncertain.clone(),
            },
            jobs,
            format: opts.format,
        };
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::*;

    fn opts(args: &[&str]) -> Opts {
        let mut all = vec!["process-logs"];
        all.extend_from_slice(args);
        all.push("version");
        Opts::parse_from(all)
    }

    #[test]
    fn test_context_defaults() -> Result<()> {
        let ctx = Context::new(&opts(&[]), &ProcessConfig::default(), Path::new("/data"))?;
        assert_eq!(4, ctx.jobs);
        assert_eq!(9, ctx.layout.header);
        assert_eq!(30, ctx.layout.step);
        assert_eq!('D', ctx.layout.prefix);
        assert!(ctx.layout.strict);
        assert!(ctx.rules.strict);
        assert_eq!(5., ctx.rules.proximity);
        assert_eq!(8_500., ctx.rules.boundary);
        assert_eq!(3, ctx.rules.min_strikes);
        assert_eq!(CENTER, ctx.rules.center);
        assert_eq!(PathBuf::from("/data/Intentions"), ctx.naming.intentions);
        assert_eq!(6, ctx.naming.uncertain.len());
        assert_eq!(Format::Text, ctx.format);
        Ok(())
    }

    #[test]
    fn test_context_overrides() -> Result<()> {
        let cfg: ProcessConfig = hcl::from_str(
            r#"
version = 1
intentions = "/cfg/Intentions"
jobs = 8
proximity = 10.0
prefix = "A"
rogues = ["X0"]
"#,
        )?;
        assert_eq!(CVERSION, cfg.version());
        assert_eq!(8_500., cfg.boundary);

        let ctx = Context::new(
            &opts(&["-j", "2", "--relaxed", "-F", "json"]),
            &cfg,
            Path::new("."),
        )?;
        assert_eq!(2, ctx.jobs);
        assert_eq!(10., ctx.rules.proximity);
        assert_eq!('A', ctx.layout.prefix);
        assert_eq!(vec!["X0".to_string()], ctx.layout.rogues);
        assert!(!ctx.layout.strict);
        assert!(!ctx.rules.strict);
        assert_eq!(PathBuf::from("/cfg/Intentions"), ctx.naming.intentions);
        assert_eq!(Format::Json, ctx.format);

        let ctx = Context::new(&opts(&["-I", "/cli"]), &cfg, Path::new("."))?;
        assert_eq!(PathBuf::from("/cli"), ctx.naming.intentions);
        Ok(())
    }

    #[test]
    fn test_context_bad_values() {
        let cfg = ProcessConfig {
            prefix: "DD".to_string(),
            ..ProcessConfig::default()
        };
        assert!(Context::new(&opts(&[]), &cfg, Path::new(".")).is_err());

        let cfg = ProcessConfig::default();
        assert!(Context::new(&opts(&["-j", "0"]), &cfg, Path::new(".")).is_err());

        let cfg = ProcessConfig {
            time_step: 0,
            ..ProcessConfig::default()
        };
        assert!(Context::new(&opts(&[]), &cfg, Path::new(".")).is_err());
    }
}
