//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
///
/// Per-feature geometry problems never surface here; they degrade to safe
/// defaults inside the engine. Only dataset-level conditions are reported.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The query was run against an empty feature collection
    #[error("no features")]
    NoFeatures,

    /// Site ranking produced no candidate site
    #[error("no suitable site")]
    NoSuitableSite,

    /// Invalid coordinate values
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Geometry that cannot be represented (e.g. unsupported GeoJSON type)
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Engine configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Error code for integration with host tooling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Empty dataset
    NoFeatures = 10001,
    /// No site could be selected
    NoSuitableSite = 10002,
    /// Invalid coordinate values
    InvalidCoordinate = 10003,
    /// Invalid geometry
    InvalidGeometry = 10004,
    /// Invalid configuration
    Config = 10005,
    /// JSON parsing error
    JsonParsing = 10006,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::NoFeatures => GeoErrorCode::NoFeatures,
            GeoError::NoSuitableSite => GeoErrorCode::NoSuitableSite,
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
            GeoError::InvalidGeometry(_) => GeoErrorCode::InvalidGeometry,
            GeoError::Config(_) => GeoErrorCode::Config,
            GeoError::JsonError(_) => GeoErrorCode::JsonParsing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_level_messages() {
        assert_eq!(GeoError::NoFeatures.to_string(), "no features");
        assert_eq!(GeoError::NoSuitableSite.to_string(), "no suitable site");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(GeoError::NoFeatures.code() as u32, 10001);
        assert_eq!(GeoError::NoSuitableSite.code(), GeoErrorCode::NoSuitableSite);
        assert_eq!(GeoError::Config("x".into()).code(), GeoErrorCode::Config);
    }
}
