//! Registration logs.
//!
//! After a fixed-size header, the log is made of 4-line blocks, one per simulation step:
//!
//! ```text
//! <t>,D1,D2,R0,D7      aircraft identities
//! <t>,300,300,200,100  altitudes (unused)
//! <t>,48.2,48.3,...    latitudes
//! <t>,16.3,16.4,...    longitudes
//! ```
//!
//! The first field of every line is not data and is ignored.  Blocks are numbered from the
//! end of the header, block `n` being at `step * (n + 1)` seconds whether it is usable or not.
//!

use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, trace, warn};

use crate::FormatError;

/// Lines in one block.
const STRIDE: usize = 4;

/// Index into the intention table.  `D12` is row 11.
///
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AircraftIndex(pub usize);

impl AircraftIndex {
    /// Strip `prefix` from the identity token then convert the 1-based aircraft number.
    ///
    pub fn resolve(token: &str, prefix: char) -> Result<Self, FormatError> {
        let num = token
            .strip_prefix(prefix)
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n >= 1)
            .ok_or_else(|| FormatError::BadIdentity(token.to_string()))?;
        Ok(AircraftIndex(num - 1))
    }
}

impl Display for AircraftIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0 + 1)
    }
}

/// Describe how a registration log is laid out and which aircraft we keep.
///
#[derive(Clone, Debug)]
pub struct Layout {
    /// Header lines before the first block
    pub header: usize,
    /// Simulated seconds between two blocks
    pub step: u64,
    /// Rogue/background identities, never tracked
    pub rogues: Vec<String>,
    /// Prefix of tracked identities
    pub prefix: char,
    /// Fail on identities we can not resolve instead of dropping them
    pub strict: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            header: 9,
            step: 30,
            rogues: vec!["R0".to_string(), "R1".to_string(), "R2".to_string()],
            prefix: 'D',
            strict: true,
        }
    }
}

/// All tracked aircraft at a given time.  `ids`, `indices`, `lats` & `lons` are aligned.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timestep {
    /// Seconds since the start of the run
    pub time: u64,
    pub ids: Vec<String>,
    pub indices: Vec<AircraftIndex>,
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
}

impl Timestep {
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A registration log loaded in memory.
///
#[derive(Debug)]
pub struct RegLog {
    lines: Vec<String>,
}

impl RegLog {
    #[tracing::instrument]
    pub fn from_path(fname: &Path) -> Result<Self, FormatError> {
        let data = fs::read_to_string(fname).map_err(|e| FormatError::Io(fname.to_path_buf(), e))?;
        let log = Self::from(data.as_str());
        debug!("{} lines", log.lines.len());
        Ok(log)
    }

    /// Iterate over the usable blocks, see `Timesteps`.
    ///
    pub fn timesteps<'a>(&'a self, layout: &'a Layout) -> Timesteps<'a> {
        Timesteps {
            lines: &self.lines,
            layout,
            pos: layout.header,
            time: layout.step,
            skipped: 0,
        }
    }
}

impl From<&str> for RegLog {
    fn from(value: &str) -> Self {
        RegLog {
            lines: value.lines().map(String::from).collect(),
        }
    }
}

/// Lazy sequence of `Timestep`.
///
/// Unusable blocks (no identity at all, truncated or non-numeric positions, misaligned
/// arrays) are skipped and counted.  An identity that can not be resolved is an error when the
/// layout is strict.
///
#[derive(Debug)]
pub struct Timesteps<'a> {
    lines: &'a [String],
    layout: &'a Layout,
    pos: usize,
    time: u64,
    skipped: usize,
}

impl Timesteps<'_> {
    /// Number of blocks skipped so far.
    ///
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn block(&self, pos: usize, time: u64) -> Result<Option<Timestep>, FormatError> {
        let id_line = &self.lines[pos];
        if !id_line.contains(',') {
            trace!("t={time}: empty block");
            return Ok(None);
        }

        let (lats, lons) = match (
            self.lines.get(pos + 2).and_then(|l| values(l)),
            self.lines.get(pos + 3).and_then(|l| values(l)),
        ) {
            (Some(lats), Some(lons)) => (lats, lons),
            _ => {
                debug!("t={time}: bad or missing positions");
                return Ok(None);
            }
        };

        let tokens: Vec<&str> = id_line.split(',').skip(1).map(str::trim).collect();
        if tokens.len() != lats.len() || tokens.len() != lons.len() {
            debug!(
                "t={time}: {} ids, {} lats, {} lons",
                tokens.len(),
                lats.len(),
                lons.len()
            );
            return Ok(None);
        }

        // Single pass removing rogues (and unresolved ids if not strict), keeps everything aligned
        //
        let mut ts = Timestep {
            time,
            ..Timestep::default()
        };
        for ((token, lat), lon) in tokens.into_iter().zip(lats).zip(lons) {
            if self.layout.rogues.iter().any(|r| r == token) {
                continue;
            }
            let idx = match AircraftIndex::resolve(token, self.layout.prefix) {
                Ok(idx) => idx,
                Err(e) if self.layout.strict => return Err(e),
                Err(e) => {
                    warn!("t={time}: {e}, ignored");
                    continue;
                }
            };
            ts.ids.push(token.to_string());
            ts.indices.push(idx);
            ts.lats.push(lat);
            ts.lons.push(lon);
        }
        Ok(Some(ts))
    }
}

impl Iterator for Timesteps<'_> {
    type Item = Result<Timestep, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.pos >= self.lines.len() {
                return None;
            }
            let (pos, time) = (self.pos, self.time);

            // Time advances for every block, usable or not
            //
            self.pos += STRIDE;
            self.time += self.layout.step;

            match self.block(pos, time) {
                Ok(Some(ts)) => return Some(Ok(ts)),
                Ok(None) => self.skipped += 1,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Numeric values of a line, minus the first field.  `None` if any of them is not a number.
///
fn values(line: &str) -> Option<Vec<f64>> {
    line.split(',')
        .skip(1)
        .map(|v| f64::from_str(v.trim()).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const HEADER: &str = "# header 1
# header 2
# header 3
# header 4
# header 5
# header 6
# header 7
# header 8
# header 9
";

    fn log(blocks: &[&str]) -> RegLog {
        let mut s = String::from(HEADER);
        blocks.iter().for_each(|b| s.push_str(b));
        RegLog::from(s.as_str())
    }

    fn collect(log: &RegLog, layout: &Layout) -> Vec<Timestep> {
        log.timesteps(layout)
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[rstest]
    #[case("D1", 0)]
    #[case("D12", 11)]
    #[case("D0100", 99)]
    fn test_aircraft_index_resolve(#[case] token: &str, #[case] idx: usize) {
        assert_eq!(AircraftIndex(idx), AircraftIndex::resolve(token, 'D').unwrap());
    }

    #[rstest]
    #[case("D0")]
    #[case("D")]
    #[case("Dx1")]
    #[case("X12")]
    #[case("12")]
    #[case("")]
    fn test_aircraft_index_resolve_bad(#[case] token: &str) {
        assert!(AircraftIndex::resolve(token, 'D').is_err());
    }

    #[test]
    fn test_timesteps_simple() {
        let log = log(&[
            "30,D1,D2\n0,1,1\n0,48.1,48.2\n0,16.1,16.2\n",
            "60,D2\n0,1\n0,48.3\n0,16.3\n",
        ]);
        let layout = Layout::default();
        let all = collect(&log, &layout);

        assert_eq!(2, all.len());
        assert_eq!(30, all[0].time);
        assert_eq!(vec!["D1", "D2"], all[0].ids);
        assert_eq!(vec![AircraftIndex(0), AircraftIndex(1)], all[0].indices);
        assert_eq!(vec![48.1, 48.2], all[0].lats);
        assert_eq!(vec![16.1, 16.2], all[0].lons);
        assert_eq!(60, all[1].time);
        assert_eq!(vec![AircraftIndex(1)], all[1].indices);
    }

    #[test]
    fn test_timesteps_empty_block_advances_time() {
        let log = log(&[
            "30,D1\n0,1\n0,48.1\n0,16.1\n",
            "60\n0\n0\n0\n",
            "90,D1\n0,1\n0,48.3\n0,16.3\n",
        ]);
        let layout = Layout::default();
        let mut iter = log.timesteps(&layout);
        let all: Vec<_> = iter.by_ref().map(|t| t.unwrap()).collect();

        assert_eq!(2, all.len());
        assert_eq!(30, all[0].time);
        assert_eq!(90, all[1].time);
        assert_eq!(1, iter.skipped());
    }

    #[test]
    fn test_timesteps_bad_positions() {
        let log = log(&[
            "30,D1\n0,1\n0,48.1\n0,16.1\n",
            "60,D1\n0,1\n0,foo\n0,16.2\n",
            "90,D1\n0,1\n0,48.3\n0,16.3\n",
            "120,D1\n0,1\n0,48.4\n",
        ]);
        let layout = Layout::default();
        let all = collect(&log, &layout);

        let times: Vec<_> = all.iter().map(|t| t.time).collect();
        assert_eq!(vec![30, 90], times);
    }

    #[test]
    fn test_timesteps_misaligned() {
        let log = log(&[
            "30,D1,D2\n0,1,1\n0,48.1\n0,16.1\n",
            "60,D1\n0,1\n0,48.2\n0,16.2\n",
        ]);
        let layout = Layout::default();
        let all = collect(&log, &layout);

        assert_eq!(1, all.len());
        assert_eq!(60, all[0].time);
    }

    #[test]
    fn test_timesteps_rogues_removed() {
        let log = log(&["30,R0,D1,R1,D3,R2\n0,1,1,1,1,1\n0,1.,2.,3.,4.,5.\n0,6.,7.,8.,9.,10.\n"]);
        let layout = Layout::default();
        let all = collect(&log, &layout);

        assert_eq!(1, all.len());
        let ts = &all[0];
        assert_eq!(2, ts.len());
        assert_eq!(vec!["D1", "D3"], ts.ids);
        assert_eq!(vec![AircraftIndex(0), AircraftIndex(2)], ts.indices);
        assert_eq!(vec![2., 4.], ts.lats);
        assert_eq!(vec![7., 9.], ts.lons);
    }

    #[test]
    fn test_timesteps_only_rogues() {
        let log = log(&["30,R0\n0,1\n0,1.\n0,6.\n"]);
        let layout = Layout::default();
        let all = collect(&log, &layout);

        assert_eq!(1, all.len());
        assert!(all[0].is_empty());
    }

    #[test]
    fn test_timesteps_bad_identity_strict() {
        let log = log(&[
            "30,D1\n0,1\n0,48.1\n0,16.1\n",
            "60,X1\n0,1\n0,48.2\n0,16.2\n",
        ]);
        let layout = Layout::default();
        let all: Vec<_> = log.timesteps(&layout).collect();

        assert_eq!(2, all.len());
        assert!(all[0].is_ok());
        assert!(matches!(all[1], Err(FormatError::BadIdentity(_))));
    }

    #[test]
    fn test_timesteps_bad_identity_relaxed() {
        let log = log(&["30,D1,X1,D2\n0,1,1,1\n0,48.1,48.2,48.3\n0,16.1,16.2,16.3\n"]);
        let layout = Layout {
            strict: false,
            ..Layout::default()
        };
        let all = collect(&log, &layout);

        assert_eq!(vec!["D1", "D2"], all[0].ids);
        assert_eq!(vec![48.1, 48.3], all[0].lats);
        assert_eq!(vec![16.1, 16.3], all[0].lons);
    }

    #[test]
    fn test_timesteps_header_only() {
        let log = log(&[]);
        let layout = Layout::default();
        assert_eq!(0, log.timesteps(&layout).count());

        let log = RegLog::from("");
        assert_eq!(0, log.timesteps(&layout).count());
    }

    #[test]
    fn test_timesteps_crlf() {
        let log = log(&["30,D1 \r\n0,1\r\n0,48.1\r\n0,16.1\r\n"]);
        let layout = Layout::default();
        let all = collect(&log, &layout);

        assert_eq!(vec!["D1"], all[0].ids);
        assert_eq!(vec![16.1], all[0].lons);
    }
}
