use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum HeartError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Startup errors
    #[error(transparent)]
    ArtifactLoad(#[from] ArtifactLoadError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    // Request errors
    #[error(transparent)]
    Prediction(#[from] PredictionError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for HeartError
pub type Result<T> = std::result::Result<T, HeartError>;

/// Which of the three startup artifacts failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Classifier,
    Scaler,
    Threshold,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Classifier => "classifier",
            Self::Scaler => "scaler",
            Self::Threshold => "threshold",
        };
        f.write_str(name)
    }
}

/// Underlying reason an artifact could not be used.
#[derive(Error, Debug)]
pub enum ArtifactLoadCause {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(String),
}

/// Fatal startup error: one of classifier/scaler/threshold is unusable.
#[derive(Error, Debug)]
#[error("failed to load {kind} artifact from {}: {source}", path.display())]
pub struct ArtifactLoadError {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    #[source]
    pub source: ArtifactLoadCause,
}

impl ArtifactLoadError {
    pub fn new(kind: ArtifactKind, path: impl Into<PathBuf>, source: impl Into<ArtifactLoadCause>) -> Self {
        Self {
            kind,
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn invalid(kind: ArtifactKind, path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::new(kind, path, ArtifactLoadCause::Invalid(reason.into()))
    }
}

/// Client-caused request error. Never coerced, always reported.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    #[error("{field} must be one of {allowed:?}, got {value}")]
    NotAllowed {
        field: &'static str,
        allowed: &'static [i64],
        value: i64,
    },

    #[error("Diastolic pressure (ap_lo) must be lower than systolic pressure (ap_hi), got ap_lo={ap_lo} ap_hi={ap_hi}")]
    DiastolicNotBelowSystolic { ap_hi: i64, ap_lo: i64 },

    #[error("Invalid input data: {0}")]
    InvalidInput(String),
}

impl ValidationError {
    /// Offending field, when the failure is tied to a named clinical field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::OutOfRange { field, .. } | Self::NotAllowed { field, .. } => Some(field),
            Self::DiastolicNotBelowSystolic { .. } => Some("ap_lo"),
            Self::InvalidInput(_) => None,
        }
    }
}

/// Failure raised by a scaler or classifier artifact at call time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("{model} is expecting {expected} features as input, got {got}")]
    Shape {
        model: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("numeric failure: {0}")]
    Numeric(String),

    #[error("model backend failure: {0}")]
    Backend(String),
}

/// Outcome of a failed prediction request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Prediction failed: {0}")]
    Inference(String),
}

impl PredictionError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<ModelError> for PredictionError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Shape { .. } => {
                PredictionError::Validation(ValidationError::InvalidInput(err.to_string()))
            }
            ModelError::Numeric(_) | ModelError::Backend(_) => {
                PredictionError::Inference(err.to_string())
            }
        }
    }
}

/// Errors while loading the analytics dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to open dataset {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset {} has no rows left after filtering", .0.display())]
    Empty(PathBuf),
}
