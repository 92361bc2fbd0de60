//! This library is there to share some common code amongst all reglog tools.
//!

pub use config::*;
pub use location::*;
pub use logging::*;

mod config;
mod location;
mod logging;
mod macros;

use clap::{crate_name, crate_version};

const NAME: &str = crate_name!();
const VERSION: &str = crate_version!();

pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}

/// Every configuration file carries a `version` attribute we check on load.
///
pub trait Versioned {
    fn version(&self) -> usize;
}
