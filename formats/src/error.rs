use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Can not read {0:?}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("Bad intention record: {0}")]
    Csv(#[from] csv::Error),
    #[error("Intention row {row}: only {len} fields")]
    ShortRow { row: usize, len: usize },
    #[error("Intention row {row}, field {field}: bad coordinate {value:?}")]
    BadCoordinate {
        row: usize,
        field: usize,
        value: String,
    },
    #[error("Bad aircraft identity {0:?}")]
    BadIdentity(String),
    #[error("Aircraft {0:?} is not in the intention file ({1} aircraft)")]
    UnknownAircraft(String, usize),
    #[error("Not a registration log: {0:?}")]
    NotARegLog(PathBuf),
    #[error("Scenario name {0:?} too short for the naming convention")]
    BadScenarioName(String),
}
