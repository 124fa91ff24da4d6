//! Cardiovascular-disease inference pipeline.
//!
//! raw input → validation → feature derivation → partial scaling →
//! classifier → threshold → `{probability, prediction}`.

pub mod artifacts;
pub mod features;
pub mod observation;
pub mod pipeline;

pub use artifacts::Artifacts;
pub use features::{derive_features, DerivedFeatures, FeatureSchema};
pub use observation::{CholesterolLevel, PatientObservation, ValidObservation};
pub use pipeline::{InferencePipeline, PredictionResult, RawInput};
