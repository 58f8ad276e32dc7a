use std::fmt::{self, Debug, Display};
use std::io;

/// Provides `SirError` and maps to other errors to
/// convert to a `SirError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum SirError {
    /// A simulation parameter is outside its documented range. Raised by
    /// `SimulationEngine::reset`, which leaves the previous run untouched.
    ConfigurationError(String),
    IoError(io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
}

impl SirError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        SirError::ConfigurationError(message.into())
    }
}

impl From<io::Error> for SirError {
    fn from(error: io::Error) -> Self {
        SirError::IoError(error)
    }
}

impl From<serde_json::Error> for SirError {
    fn from(error: serde_json::Error) -> Self {
        SirError::JsonError(error)
    }
}

impl From<csv::Error> for SirError {
    fn from(error: csv::Error) -> Self {
        SirError::CsvError(error)
    }
}

impl std::error::Error for SirError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SirError::ConfigurationError(_) => None,
            SirError::IoError(e) => Some(e),
            SirError::JsonError(e) => Some(e),
            SirError::CsvError(e) => Some(e),
        }
    }
}

impl Display for SirError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SirError::ConfigurationError(msg) => write!(f, "invalid configuration: {msg}"),
            SirError::IoError(e) => write!(f, "io error: {e}"),
            SirError::JsonError(e) => write!(f, "json error: {e}"),
            SirError::CsvError(e) => write!(f, "csv error: {e}"),
        }
    }
}
