//! Per-scenario summaries and how we print them.
//!

use std::fmt::{Display, Formatter};

use eyre::Result;
use serde::Serialize;
use strum::{EnumString, VariantNames};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::classify::Anomalies;
use crate::scenario::Concept;

/// What we report for each scenario.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    /// Log name, shared by all logs of the run
    pub scenario: String,
    pub concept: Concept,
    pub label: char,
    /// Number of bouncing aircraft
    pub bounces: usize,
    /// Number of aircraft seen outside the airspace
    pub strays: usize,
}

impl Summary {
    pub fn new(scenario: &str, concept: Concept, anomalies: &Anomalies) -> Self {
        Summary {
            scenario: scenario.to_string(),
            concept,
            label: concept.label(),
            bounces: anomalies.bounces.len(),
            strays: anomalies.strays.len(),
        }
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scenario {} of {} had {} bouncies and {} far aways.",
            self.scenario, self.label, self.bounces, self.strays
        )
    }
}

/// Output formats.
///
#[derive(Clone, Copy, Debug, Default, EnumString, PartialEq, strum::Display, VariantNames)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Format {
    /// One sentence per scenario
    #[default]
    Text,
    /// One JSON object per line
    Json,
    /// Single table
    Table,
}

/// Render all summaries in the given format.
///
pub fn render(list: &[Summary], fmt: Format) -> Result<String> {
    let out = match fmt {
        Format::Text => list
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        Format::Json => list
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?
            .join("\n"),
        Format::Table => {
            let header = vec!["Scenario", "Concept", "Bouncing", "Straying"];

            let mut builder = Builder::default();
            builder.push_record(header);
            list.iter().for_each(|s| {
                builder.push_record(vec![
                    s.scenario.clone(),
                    s.concept.to_string(),
                    s.bounces.to_string(),
                    s.strays.to_string(),
                ]);
            });
            builder.build().with(Style::modern()).to_string()
        }
    };
    Ok(out)
}
