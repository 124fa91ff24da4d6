pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod ml;
pub mod prediction;
pub mod server;
pub mod validation;

pub use analytics::CardioAnalytics;
pub use config::AppConfig;
pub use error::{HeartError, Result};
pub use prediction::{InferencePipeline, PatientObservation, PredictionResult, RawInput};
