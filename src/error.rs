//! Error type for the few fallible edges of the crate.
//!
//! The rendering core itself never fails: unknown pollutants, missing
//! coordinates and empty filters all degrade to a reduced display. Errors only
//! come from decoding input (readings, configuration) and from acquiring the
//! browser surfaces.

use std::fmt;

/// Errors surfaced by ingestion, configuration and surface setup.
#[derive(Debug)]
pub enum Error {
    /// Readings or configuration JSON could not be decoded.
    Json(serde_json::Error),
    /// Valid JSON that is neither a row array nor a `results` envelope.
    Payload(String),
    /// A configuration value is out of its allowed range.
    Config(String),
    /// A display surface (map container, canvas, 2D context) is unavailable.
    Surface(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Json(e) => write!(f, "Failed to decode JSON: {}", e),
            Error::Payload(msg) => write!(f, "Unexpected measurements payload: {}", msg),
            Error::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::Surface(msg) => write!(f, "Display surface unavailable: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_keep_their_source() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("Failed to decode JSON"));
    }

    #[test]
    fn config_error_message() {
        let err = Error::Config("damping must be finite".into());
        assert_eq!(err.to_string(), "Invalid configuration: damping must be finite");
        assert!(std::error::Error::source(&err).is_none());
    }
}
