//! This is the `ConfigFile` struct.
//!
//! This is for finding the right default location for the configuration files of the reglog
//! tools.  This is a configuration file/struct neutral loading engine, storing only the base
//! directory and with `load()` read the proper file or fall back to the defaults.
//!
//! This encapsulates the configuration, available with `.inner()`.
//!

use std::fmt::Debug;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use eyre::{eyre, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::Versioned;

/// Main name for the directory base
const TAG: &str = "reglog";

/// Holds the configuration for a given tool along with where it was (or would have been)
/// loaded from.
///
#[derive(Debug)]
pub struct ConfigFile<T: Debug + Default + DeserializeOwned + Versioned> {
    /// Tag is the project name.
    tag: String,
    /// This is the base directory for all files.
    basedir: PathBuf,
    /// Default filename inside `basedir`.
    fname: String,
    inner: T,
}

impl<T> ConfigFile<T>
where
    T: Debug + Default + DeserializeOwned + Versioned,
{
    #[tracing::instrument]
    fn new(tag: &str, fname: &str) -> Result<Self> {
        let basedir = match BaseDirs::new() {
            Some(base) => {
                #[cfg(unix)]
                let base = base.home_dir().join(".config");

                #[cfg(windows)]
                let base = base.data_local_dir().to_path_buf();

                debug!("base = {base:?}");
                crate::makepath!(base, tag)
            }
            None => {
                #[cfg(unix)]
                let homedir = std::env::var("HOME")
                    .map_err(|_| eyre!("No HOME variable defined, can not continue"))?;

                #[cfg(windows)]
                let homedir = std::env::var("LOCALAPPDATA")
                    .map_err(|_| eyre!("No LOCALAPPDATA variable defined, can not continue"))?;

                debug!("base = {homedir}");

                #[cfg(unix)]
                let base = crate::makepath!(homedir, ".config", tag);

                #[cfg(windows)]
                let base = crate::makepath!(homedir, tag);

                base
            }
        };
        Ok(ConfigFile {
            tag: String::from(tag),
            basedir,
            fname: String::from(fname),
            inner: T::default(),
        })
    }

    /// Returns the path of the default config directory
    ///
    pub fn config_path(&self) -> PathBuf {
        self.basedir.clone()
    }

    /// Returns the path of the default config file
    ///
    pub fn default_file(&self) -> PathBuf {
        let cfg = self.config_path().join(&self.fname);
        debug!("default = {cfg:?}");
        cfg
    }

    /// Load the file and return a struct T in the right format.
    ///
    /// - if `fname` is given, it must exist,
    /// - otherwise `$HOME/.config/reglog/<default>` is used if present, the defaults from
    ///   `T::default()` if not.
    ///
    /// The `version` attribute is checked against `expected`.
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&str>, default: &str, expected: usize) -> Result<ConfigFile<T>> {
        let mut cfg = ConfigFile::<T>::new(TAG, default)?;

        let fname = match fname {
            Some(fname) => {
                let fname = PathBuf::from(fname);
                if !fname.exists() {
                    return Err(eyre!("Unknown config file {:?}", fname));
                }
                fname
            }
            None => {
                let fname = cfg.default_file();
                if !fname.exists() {
                    trace!("No {:?}, using defaults", fname);
                    return Ok(cfg);
                }
                fname
            }
        };

        trace!("Loading config file {fname:?} for {}", cfg.tag);

        let data = fs::read_to_string(&fname)?;
        let data: T = hcl::from_str(&data)?;
        debug!("struct data = {data:?}");

        if data.version() != expected {
            return Err(eyre!(
                "Bad config file version {} in {:?}, expected {}",
                data.version(),
                fname,
                expected
            ));
        }
        cfg.inner = data;
        Ok(cfg)
    }

    /// Return the inner configuration
    ///
    pub fn inner(&self) -> &T {
        &self.inner
    }
}
