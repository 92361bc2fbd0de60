//! Anomaly classification.
//!
//! We go through the timesteps in order and look at every tracked aircraft:
//!
//! - closer than `proximity` to its destination, it gets a strike (it should have been
//!   removed from the simulation by then),
//! - further than `boundary` from the airspace center, it is marked as straying.
//!
//! Aircraft with fewer than `min_strikes` strikes at the end are considered noise (they were
//! just landing) and dropped.
//!
//! XXX all distances are in meters.
//!

use std::collections::BTreeMap;

use eyre::Result;
use reglog_common::{kwikdist_from, kwikdist_matrix, LatLon};
use reglog_formats::{AircraftIndex, FormatError, Intentions, Timestep};
use serde::Serialize;
use tracing::{debug, trace, warn};

/// Center of the Vienna airspace.
pub const CENTER: LatLon = LatLon {
    lat: 48.20499787612939,
    lon: 16.362249993868282,
};

/// Thresholds and reference point for the classification.
///
#[derive(Clone, Debug)]
pub struct Rules {
    /// Distance to destination under which we count a strike
    pub proximity: f64,
    /// Distance to `center` over which an aircraft is straying
    pub boundary: f64,
    /// Strikes needed to be a real bouncer
    pub min_strikes: usize,
    /// Airspace center
    pub center: LatLon,
    /// Fail on aircraft missing from the intention file instead of ignoring them
    pub strict: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            proximity: 5.,
            boundary: 8_500.,
            min_strikes: 3,
            center: CENTER,
            strict: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Strikes {
    pub count: usize,
    pub times: Vec<u64>,
}

/// Every time the aircraft was seen outside.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Stray {
    pub times: Vec<u64>,
}

/// Result for one scenario.
///
#[derive(Clone, Debug, Default)]
pub struct Anomalies {
    pub bounces: BTreeMap<AircraftIndex, Strikes>,
    pub strays: BTreeMap<AircraftIndex, Stray>,
}

/// Accumulate anomalies over the timesteps of one scenario.
///
#[derive(Debug)]
pub struct Classifier<'a> {
    intentions: &'a Intentions,
    rules: &'a Rules,
    anomalies: Anomalies,
}

impl<'a> Classifier<'a> {
    pub fn new(intentions: &'a Intentions, rules: &'a Rules) -> Self {
        Classifier {
            intentions,
            rules,
            anomalies: Anomalies::default(),
        }
    }

    /// Current state, before filtering.
    ///
    pub fn anomalies(&self) -> &Anomalies {
        &self.anomalies
    }

    /// Apply the rules to a new timestep.
    ///
    pub fn feed(&mut self, ts: &Timestep) -> Result<()> {
        let n = ts.len();
        let mut indices = Vec::with_capacity(n);
        let mut lats = Vec::with_capacity(n);
        let mut lons = Vec::with_capacity(n);
        let mut dest_lats = Vec::with_capacity(n);
        let mut dest_lons = Vec::with_capacity(n);

        // Join with the intentions
        //
        for (i, &idx) in ts.indices.iter().enumerate() {
            let Some(intention) = self.intentions.get(idx) else {
                let err = FormatError::UnknownAircraft(ts.ids[i].clone(), self.intentions.len());
                if self.rules.strict {
                    return Err(err.into());
                }
                warn!("t={}: {err}, ignored", ts.time);
                continue;
            };
            indices.push(idx);
            lats.push(ts.lats[i]);
            lons.push(ts.lons[i]);
            dest_lats.push(intention.destination.lat);
            dest_lons.push(intention.destination.lon);
        }

        let to_dest = kwikdist_matrix(&lats, &lons, &dest_lats, &dest_lons)?;
        let to_center = kwikdist_from(&lats, &lons, self.rules.center)?;

        for ((&idx, &dd), &dc) in indices.iter().zip(&to_dest).zip(&to_center) {
            if dd < self.rules.proximity {
                trace!("t={}: {idx} at {dd:.2}m of destination", ts.time);
                let strikes = self.anomalies.bounces.entry(idx).or_default();
                strikes.count += 1;
                strikes.times.push(ts.time);
            }
            if dc > self.rules.boundary {
                trace!("t={}: {idx} at {dc:.0}m of center", ts.time);
                self.anomalies
                    .strays
                    .entry(idx)
                    .or_default()
                    .times
                    .push(ts.time);
            }
        }
        Ok(())
    }

    /// Drop the aircraft with too few strikes and return the final tables.
    ///
    pub fn finish(mut self) -> Anomalies {
        let min = self.rules.min_strikes;
        let before = self.anomalies.bounces.len();
        self.anomalies.bounces.retain(|_, s| s.count >= min);
        debug!(
            "{} bouncing aircraft, {} dropped",
            self.anomalies.bounces.len(),
            before - self.anomalies.bounces.len()
        );
        self.anomalies
    }
}

/// Run the whole sequence of timesteps through a `Classifier`.
///
pub fn classify<I>(steps: I, intentions: &Intentions, rules: &Rules) -> Result<Anomalies>
where
    I: IntoIterator<Item = Result<Timestep, FormatError>>,
{
    let mut classifier = Classifier::new(intentions, rules);
    for ts in steps {
        classifier.feed(&ts?)?;
    }
    Ok(classifier.finish())
}
