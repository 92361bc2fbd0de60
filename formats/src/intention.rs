//! Flight intention files.
//!
//! One row per aircraft, the row number being the aircraft number (first row is `D1`).  Origin
//! and destination are written as `"(lon, lat)"` pairs.  Rows are split on every comma, quotes
//! are *not* honoured, so a pair spans two fields:
//!
//! ```text
//! 0:00:00,D1,MP20,00:00:30,"(16.331, 48.164)","(16.352, 48.219)",...
//!                          ^4      ^5         ^6      ^7
//! ```
//!

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use reglog_common::LatLon;
use tracing::{debug, trace};

use crate::{AircraftIndex, FormatError};

/// Field holding the origin longitude, followed by the origin latitude then the destination pair.
const FIRST_COORD: usize = 4;

/// Origin & destination of one aircraft.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intention {
    pub origin: LatLon,
    pub destination: LatLon,
}

/// Intentions of all aircraft of a scenario, indexed by `AircraftIndex`.
///
#[derive(Clone, Debug, Default)]
pub struct Intentions(Vec<Intention>);

impl Intentions {
    /// Load and parse an intention file.
    ///
    #[tracing::instrument]
    pub fn from_path(fname: &Path) -> Result<Self, FormatError> {
        trace!("Loading intentions");
        let file = File::open(fname).map_err(|e| FormatError::Io(fname.to_path_buf(), e))?;
        Self::from_reader(file)
    }

    /// Parse intentions from anything readable.
    ///
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, FormatError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(rdr);

        let list = rdr
            .records()
            .enumerate()
            .map(|(n, rec)| parse_row(n + 1, &rec?))
            .collect::<Result<Vec<_>, FormatError>>()?;
        debug!("{} intentions", list.len());
        Ok(Intentions(list))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Intention of a given aircraft, `None` if the aircraft is not declared.
    ///
    #[inline]
    pub fn get(&self, idx: AircraftIndex) -> Option<&Intention> {
        self.0.get(idx.0)
    }
}

impl From<Vec<Intention>> for Intentions {
    fn from(value: Vec<Intention>) -> Self {
        Intentions(value)
    }
}

/// Parse one `"(lon` or `lat)"` half of a coordinate pair.
///
fn coordinate(rec: &StringRecord, row: usize, field: usize) -> Result<f64, FormatError> {
    let raw = rec.get(field).ok_or(FormatError::ShortRow {
        row,
        len: rec.len(),
    })?;
    raw.trim_matches(|c: char| c == '"' || c == '(' || c == ')' || c.is_whitespace())
        .parse::<f64>()
        .map_err(|_| FormatError::BadCoordinate {
            row,
            field,
            value: raw.to_string(),
        })
}

fn parse_row(row: usize, rec: &StringRecord) -> Result<Intention, FormatError> {
    if rec.len() < FIRST_COORD + 4 {
        return Err(FormatError::ShortRow {
            row,
            len: rec.len(),
        });
    }
    let origin = LatLon::new(
        coordinate(rec, row, FIRST_COORD + 1)?,
        coordinate(rec, row, FIRST_COORD)?,
    );
    let destination = LatLon::new(
        coordinate(rec, row, FIRST_COORD + 3)?,
        coordinate(rec, row, FIRST_COORD + 2)?,
    );
    Ok(Intention {
        origin,
        destination,
    })
}
