//! Filename convention linking the logs of one scenario run.
//!
//! Every log of a run shares the same name, only the prefix changes:
//!
//! ```text
//! REGLOG_Flight_intention_very_low_40_8_W1_20220502_11-19-41.log
//! CONFLOG_Flight_intention_very_low_40_8_W1_20220502_11-19-41.log
//! ```
//!
//! The intention file is named after the scenario itself, i.e. the log name minus its
//! `_YYYYMMDD_HH-MM-SS.log` suffix and, for the "uncertain" variants (wind or route
//! perturbations, tagged `W1`, `R2`, etc.), minus the `_XX` tag as well:
//!
//! ```text
//! Flight_intention_very_low_40_8.csv
//! ```
//!
//! The name is cut by length, the tag being detected anywhere in the name.
//!

use std::path::{Path, PathBuf};

use strum::{EnumIter, EnumString, VariantNames};
use tracing::trace;

use crate::FormatError;

/// Marker identifying registration logs.
pub const REGLOG_MARKER: &str = "REGLOG";

/// Length of `_YYYYMMDD_HH-MM-SS.log`.
const SUFFIX_LEN: usize = 22;

/// Length of the `_XX` uncertainty tag.
const TAG_LEN: usize = 3;

/// Default uncertainty tags.
pub const UNCERTAIN: [&str; 6] = ["W1", "W3", "W5", "R1", "R2", "R3"];

/// All the files produced for a scenario run.
///
#[derive(
    Clone, Copy, Debug, EnumIter, EnumString, Eq, PartialEq, strum::Display, VariantNames,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogKind {
    /// Positions of all aircraft
    Reg,
    /// Flight statistics
    Flst,
    /// Conflicts
    Conf,
    /// Loss of separation
    Los,
    /// Geofences
    Geo,
    /// Flight intentions, not a log per se
    Intention,
}

impl LogKind {
    /// Filename prefix, empty for the intention file.
    ///
    pub fn prefix(&self) -> &'static str {
        match self {
            LogKind::Reg => "REGLOG_",
            LogKind::Flst => "FLSTLOG_",
            LogKind::Conf => "CONFLOG_",
            LogKind::Los => "LOSLOG_",
            LogKind::Geo => "GEOLOG_",
            LogKind::Intention => "",
        }
    }
}

/// Map a registration log to the other files of the same run.
///
#[derive(Clone, Debug)]
pub struct Naming {
    /// Directory holding the intention files
    pub intentions: PathBuf,
    /// Uncertainty tags
    pub uncertain: Vec<String>,
}

impl Default for Naming {
    fn default() -> Self {
        Naming {
            intentions: PathBuf::from("Intentions"),
            uncertain: UNCERTAIN.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Naming {
    pub fn new(intentions: &Path) -> Self {
        Naming {
            intentions: intentions.to_path_buf(),
            ..Naming::default()
        }
    }

    /// Log name shared by all logs of the run, i.e. the registration log filename without
    /// its prefix.
    ///
    pub fn log_name(&self, reglog: &Path) -> Result<String, FormatError> {
        let fname = reglog
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .filter(|f| f.contains(REGLOG_MARKER))
            .ok_or_else(|| FormatError::NotARegLog(reglog.to_path_buf()))?;
        Ok(fname.replacen(LogKind::Reg.prefix(), "", 1))
    }

    /// Is this run one of the uncertain variants?
    ///
    pub fn is_uncertain(&self, name: &str) -> bool {
        self.uncertain.iter().any(|t| name.contains(t.as_str()))
    }

    /// Scenario name, used for the intention file.
    ///
    pub fn scenario_name(&self, reglog: &Path) -> Result<String, FormatError> {
        let name = self.log_name(reglog)?;
        let cut = if self.is_uncertain(&name) {
            SUFFIX_LEN + TAG_LEN
        } else {
            SUFFIX_LEN
        };
        let base = name
            .len()
            .checked_sub(cut)
            .filter(|&n| n > 0)
            .and_then(|n| name.get(..n))
            .map(String::from);
        base.ok_or(FormatError::BadScenarioName(name))
    }

    /// Path of the `kind` companion of `reglog`.  Logs live next to the registration log,
    /// intention files in their own directory.
    ///
    #[tracing::instrument(skip(self))]
    pub fn companion(&self, reglog: &Path, kind: LogKind) -> Result<PathBuf, FormatError> {
        let path = match kind {
            LogKind::Intention => {
                let base = self.scenario_name(reglog)?;
                self.intentions.join(format!("{base}.csv"))
            }
            _ => {
                let name = format!("{}{}", kind.prefix(), self.log_name(reglog)?);
                reglog.with_file_name(name)
            }
        };
        trace!("{kind} -> {path:?}");
        Ok(path)
    }
}
