//! Scenarios are grouped by concept, one directory each.  Every registration log found there
//! is one scenario run.
//!

use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use reglog_formats::{Intentions, LogKind, Naming, RegLog, REGLOG_MARKER};
use serde::Serialize;
use strum::{EnumIter, EnumString, IntoEnumIterator, VariantNames};
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::{debug, info, trace, warn};

use crate::classify::classify;
use crate::config::Context;
use crate::error::Status;
use crate::summary::Summary;

/// Separation management concept, also the name of the directory holding its runs.
///
#[derive(
    Clone,
    Copy,
    Debug,
    EnumIter,
    EnumString,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    strum::Display,
    VariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum Concept {
    Centralised,
    Decentralised,
    Hybrid,
}

impl Concept {
    /// Short label used in reports.
    ///
    pub fn label(&self) -> char {
        match self {
            Concept::Centralised => 'C',
            Concept::Decentralised => 'D',
            Concept::Hybrid => 'H',
        }
    }
}

/// One scenario run, identified by its registration log.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    pub concept: Concept,
    pub reglog: PathBuf,
}

impl Display for Scenario {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fname = self
            .reglog
            .file_name()
            .map(|f| f.to_string_lossy())
            .unwrap_or_default();
        write!(f, "{}/{}", self.concept, fname)
    }
}

impl Scenario {
    pub fn new(concept: Concept, reglog: &Path) -> Self {
        Scenario {
            concept,
            reglog: reglog.to_path_buf(),
        }
    }

    /// Load the intentions & the registration log then classify.
    ///
    #[tracing::instrument(skip(self, ctx), fields(scenario = %self))]
    pub fn process(&self, ctx: &Context) -> Result<Summary> {
        let name = ctx.naming.log_name(&self.reglog)?;

        // No intentions means no scenario
        //
        let fname = ctx.naming.companion(&self.reglog, LogKind::Intention)?;
        let intentions = Intentions::from_path(&fname)
            .wrap_err_with(|| format!("scenario {self}: can not load intentions"))?;
        debug!("{} aircraft declared", intentions.len());

        let log = RegLog::from_path(&self.reglog)?;
        let mut steps = log.timesteps(&ctx.layout);
        let anomalies = classify(steps.by_ref(), &intentions, &ctx.rules)
            .wrap_err_with(|| format!("scenario {self}"))?;
        trace!("{} blocks skipped", steps.skipped());

        for (ac, strikes) in &anomalies.bounces {
            debug!("D{ac} bouncing {} times: {:?}", strikes.count, strikes.times);
        }
        for (ac, stray) in &anomalies.strays {
            debug!("D{ac} outside {} times: {:?}", stray.times.len(), stray.times);
        }

        let summary = Summary::new(&name, self.concept, &anomalies);
        info!("{summary}");
        Ok(summary)
    }
}

/// Find all registration logs under `root/<concept>`, sorted by concept then name.
///
#[tracing::instrument]
pub fn discover(root: &Path) -> Result<Vec<Scenario>> {
    if !root.is_dir() {
        return Err(Status::NotADirectory(root.to_path_buf()).into());
    }

    let mut list = vec![];
    for concept in Concept::iter() {
        let dir = root.join(concept.to_string());
        if !dir.is_dir() {
            warn!("No {dir:?}, skipping {concept}");
            continue;
        }

        let mut logs = fs::read_dir(&dir)
            .wrap_err_with(|| format!("can not read {dir:?}"))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .filter(|p| {
                p.file_name()
                    .map(|f| f.to_string_lossy().contains(REGLOG_MARKER))
                    .unwrap_or(false)
            })
            .collect::<Vec<_>>();
        logs.sort();
        debug!("{} logs in {dir:?}", logs.len());

        list.extend(logs.iter().map(|p| Scenario::new(concept, p)));
    }
    info!("{} scenarios found", list.len());
    Ok(list)
}

/// List scenarios along with their intention files.
///
pub fn list_scenarios(list: &[Scenario], naming: &Naming) -> Result<String> {
    let header = vec!["Concept", "Scenario", "Intentions", "Found"];

    let mut builder = Builder::default();
    builder.push_record(header);

    for scen in list {
        let name = naming.log_name(&scen.reglog)?;
        let fname = naming.companion(&scen.reglog, LogKind::Intention)?;
        let found = if fname.exists() { "yes" } else { "no" };
        builder.push_record(vec![
            scen.concept.to_string(),
            name,
            fname.to_string_lossy().to_string(),
            found.to_string(),
        ]);
    }

    let allf = builder.build().with(Style::modern()).to_string();
    Ok(format!(
        "List all scenarios ({}: {}):\n{allf}",
        list.len(),
        Concept::VARIANTS.join(", ")
    ))
}
