//! Startup loading of the classifier, scaler and threshold.
//!
//! Loading happens once. Any failure is fatal: without all three artifacts
//! there is no [`Artifacts`] value, and without one no
//! [`InferencePipeline`](crate::prediction::InferencePipeline) can exist.

use std::fmt;

use tracing::info;

use crate::config::{ArtifactConfig, ClassifierFormat};
use crate::error::{ArtifactKind, ArtifactLoadError};
use crate::ml::{Classifier, MlpClassifier, Scaler, StandardScaler, Threshold};
use crate::prediction::features::FeatureSchema;

/// Read-only handles shared by every request.
pub struct Artifacts {
    classifier: Box<dyn Classifier>,
    scaler: Box<dyn Scaler>,
    threshold: Threshold,
}

impl fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifacts")
            .field("classifier_features", &self.classifier.n_features())
            .field("scaler_features", &self.scaler.n_features())
            .field("threshold", &self.threshold.value())
            .finish()
    }
}

impl Artifacts {
    /// Assemble from already-built parts (alternative backends, tests).
    pub fn new(
        classifier: Box<dyn Classifier>,
        scaler: Box<dyn Scaler>,
        threshold: Threshold,
    ) -> Self {
        Self {
            classifier,
            scaler,
            threshold,
        }
    }

    /// Load all three artifacts and check them against `schema`.
    pub fn load(config: &ArtifactConfig, schema: &FeatureSchema) -> Result<Self, ArtifactLoadError> {
        let scaler_path = config.scaler_path();
        let scaler = StandardScaler::from_file(&scaler_path)?;
        if scaler.n_features() != schema.scaled_prefix {
            return Err(ArtifactLoadError::invalid(
                ArtifactKind::Scaler,
                &scaler_path,
                format!(
                    "fitted on {} features, schema {} scales {}",
                    scaler.n_features(),
                    schema.id,
                    schema.scaled_prefix
                ),
            ));
        }
        if let Some(names) = &scaler.feature_names {
            if names.iter().map(String::as_str).ne(schema.scaled_names().iter().copied()) {
                return Err(ArtifactLoadError::invalid(
                    ArtifactKind::Scaler,
                    &scaler_path,
                    format!(
                        "fitted on columns {names:?}, schema {} expects {:?}",
                        schema.id,
                        schema.scaled_names()
                    ),
                ));
            }
        }

        let classifier_path = config.classifier_path();
        let classifier = load_classifier(config, schema)?;
        if classifier.n_features() != schema.len() {
            return Err(ArtifactLoadError::invalid(
                ArtifactKind::Classifier,
                &classifier_path,
                format!(
                    "expects {} features, schema {} has {}",
                    classifier.n_features(),
                    schema.id,
                    schema.len()
                ),
            ));
        }

        let threshold = Threshold::from_file(config.threshold_path())?;

        info!(
            schema = schema.id,
            dir = %config.dir.display(),
            threshold = threshold.value(),
            format = ?config.classifier_format,
            "model artifacts loaded"
        );

        Ok(Self::new(classifier, Box::new(scaler), threshold))
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn scaler(&self) -> &dyn Scaler {
        self.scaler.as_ref()
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }
}

fn load_classifier(
    config: &ArtifactConfig,
    schema: &FeatureSchema,
) -> Result<Box<dyn Classifier>, ArtifactLoadError> {
    let path = config.classifier_path();
    match config.classifier_format {
        ClassifierFormat::Json => Ok(Box::new(MlpClassifier::from_file(&path)?)),
        #[cfg(feature = "onnx")]
        ClassifierFormat::Onnx => Ok(Box::new(crate::ml::OnnxClassifier::load(
            &path,
            schema.len(),
        )?)),
        #[cfg(not(feature = "onnx"))]
        ClassifierFormat::Onnx => {
            let _ = schema;
            Err(ArtifactLoadError::invalid(
                ArtifactKind::Classifier,
                &path,
                "ONNX classifiers require building with the `onnx` feature",
            ))
        }
    }
}
