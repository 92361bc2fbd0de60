use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Status {
    #[error("Invalid number of workers {0}")]
    BadJobs(usize),
    #[error("Identity prefix must be a single character, not {0:?}")]
    BadPrefix(String),
    #[error("Time step must not be zero")]
    BadTimeStep,
    #[error("{0:?}: Not a directory!")]
    NotADirectory(PathBuf),
}
