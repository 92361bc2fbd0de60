//! Input formats for the simulation logs.
//!
//! A scenario run produces several correlated files; this crate knows how to read the two we
//! need for trajectory analysis:
//!
//! - the registration log (`REGLOG_*`), a time-stepped dump of every aircraft position,
//! - the flight intention file, giving origin & destination of every aircraft.
//!
//! It also holds the filename convention linking the different logs of a scenario together.
//!

pub use error::*;
pub use intention::*;
pub use naming::*;
pub use reglog::*;

mod error;
mod intention;
mod naming;
mod reglog;

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
