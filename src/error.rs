use std::fmt::{self, Debug, Display};
use std::io;

/// Provides `VaccinateError` and maps to other errors to
/// convert to a `VaccinateError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum VaccinateError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
    #[cfg(feature = "repl")]
    ReadlineError(rustyline::error::ReadlineError),
    /// A population could not be built from the supplied configuration.
    ConstructionError(String),
    ConfigError(String),
    ReportError(String),
    VaccinateError(String),
}

impl From<io::Error> for VaccinateError {
    fn from(error: io::Error) -> Self {
        VaccinateError::IoError(error)
    }
}

impl From<serde_json::Error> for VaccinateError {
    fn from(error: serde_json::Error) -> Self {
        VaccinateError::JsonError(error)
    }
}

impl From<csv::Error> for VaccinateError {
    fn from(error: csv::Error) -> Self {
        VaccinateError::CsvError(error)
    }
}

#[cfg(feature = "repl")]
impl From<rustyline::error::ReadlineError> for VaccinateError {
    fn from(error: rustyline::error::ReadlineError) -> Self {
        VaccinateError::ReadlineError(error)
    }
}

impl From<String> for VaccinateError {
    fn from(error: String) -> Self {
        VaccinateError::VaccinateError(error)
    }
}

impl From<&str> for VaccinateError {
    fn from(error: &str) -> Self {
        VaccinateError::VaccinateError(error.to_string())
    }
}

impl std::error::Error for VaccinateError {}

impl Display for VaccinateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error: {self:?}")?;
        Ok(())
    }
}
