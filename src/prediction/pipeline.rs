//! Validate → derive → partially scale → score → threshold.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::config::ArtifactConfig;
use crate::error::{ArtifactLoadError, ModelError, PredictionError, ValidationError};
use crate::ml::check_proba;
use crate::prediction::artifacts::Artifacts;
use crate::prediction::features::{derive_features, FeatureSchema};
use crate::prediction::observation::PatientObservation;
use crate::validation::validate_finite;

/// Decimal places kept in the returned probability.
pub const PROBABILITY_DECIMALS: i32 = 4;

/// The two shapes a prediction request can take.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Pre-encoded vector in schema order, for callers that know the layout.
    Features(Vec<f64>),
    /// Clinical fields, validated and derived server-side.
    Observation(PatientObservation),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Positive-class probability, rounded to 4 decimals
    pub probability: f64,
    /// 1 when the unrounded probability reaches the threshold
    pub prediction: u8,
}

/// Stateless per request; cloning shares the same artifacts.
#[derive(Debug, Clone)]
pub struct InferencePipeline {
    artifacts: Arc<Artifacts>,
    schema: FeatureSchema,
}

impl InferencePipeline {
    pub fn new(artifacts: Artifacts) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
            schema: FeatureSchema::CARDIO_V3,
        }
    }

    /// Load artifacts from disk. The only way to a serving pipeline.
    pub fn load(config: &ArtifactConfig) -> Result<Self, ArtifactLoadError> {
        let schema = FeatureSchema::CARDIO_V3;
        let artifacts = Artifacts::load(config, &schema)?;
        Ok(Self {
            artifacts: Arc::new(artifacts),
            schema,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    pub fn predict(&self, input: RawInput) -> Result<PredictionResult, PredictionError> {
        let outcome = match &input {
            RawInput::Features(features) => self.predict_features(features),
            RawInput::Observation(obs) => self.predict_observation(obs),
        };

        match &outcome {
            Ok(result) => debug!(
                probability = result.probability,
                prediction = result.prediction,
                "prediction served"
            ),
            Err(PredictionError::Validation(e)) => warn!(error = %e, "rejected prediction input"),
            Err(PredictionError::Inference(e)) => error!(error = %e, ?input, "prediction failed"),
        }
        outcome
    }

    pub fn predict_features(&self, features: &[f64]) -> Result<PredictionResult, PredictionError> {
        validate_finite(features)?;
        self.score(features)
    }

    pub fn predict_observation(
        &self,
        obs: &PatientObservation,
    ) -> Result<PredictionResult, PredictionError> {
        let valid = obs.validate()?;
        let derived = derive_features(&valid);
        self.score(derived.as_slice())
    }

    /// Pass the leading `scaled_prefix` columns through the scaler and copy
    /// the rest unchanged.
    pub fn normalize(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError> {
        let k = self.schema.scaled_prefix.min(features.len());
        let (head, tail) = features.split_at(k);

        let scaled = self.artifacts.scaler().transform(&[head.to_vec()])?;
        let row = match scaled.as_slice() {
            [row] if row.len() == head.len() => row,
            _ => {
                return Err(ModelError::Backend(format!(
                    "scaler returned {} rows for 1 input row of width {}",
                    scaled.len(),
                    head.len()
                ))
                .into())
            }
        };

        let mut normalized = Vec::with_capacity(features.len());
        normalized.extend_from_slice(row);
        normalized.extend_from_slice(tail);
        Ok(normalized)
    }

    fn score(&self, features: &[f64]) -> Result<PredictionResult, PredictionError> {
        if features.is_empty() {
            return Err(ValidationError::InvalidInput("feature vector is empty".to_string()).into());
        }

        let normalized = self.normalize(features)?;
        let proba = check_proba(self.artifacts.classifier().predict_proba(&normalized)?)?;
        let probability = proba[1];

        Ok(PredictionResult {
            probability: round_probability(probability),
            prediction: self.artifacts.threshold().label(probability),
        })
    }
}

fn round_probability(p: f64) -> f64 {
    let factor = 10f64.powi(PROBABILITY_DECIMALS);
    (p * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::{MockClassifier, MockScaler, StandardScaler, Threshold};
    use mockall::predicate::always;
    use std::sync::Mutex;

    fn observation() -> PatientObservation {
        PatientObservation {
            age: 50,
            ap_hi: 120,
            ap_lo: 80,
            cholesterol: 1,
            active: 1,
        }
    }

    fn identity_scaler() -> Box<StandardScaler> {
        Box::new(StandardScaler::new(vec![0.0; 3], vec![1.0; 3]))
    }

    fn fixed_classifier(p1: f64) -> MockClassifier {
        let mut classifier = MockClassifier::new();
        classifier.expect_n_features().return_const(5usize);
        classifier
            .expect_predict_proba()
            .returning(move |_| Ok([1.0 - p1, p1]));
        classifier
    }

    fn pipeline(p1: f64, threshold: f64) -> InferencePipeline {
        InferencePipeline::new(Artifacts::new(
            Box::new(fixed_classifier(p1)),
            identity_scaler(),
            Threshold::new(threshold).unwrap(),
        ))
    }

    #[test]
    fn scenario_above_threshold() {
        let result = pipeline(0.7, 0.5)
            .predict(RawInput::Observation(observation()))
            .unwrap();
        assert_eq!(
            result,
            PredictionResult {
                probability: 0.7,
                prediction: 1
            }
        );
    }

    #[test]
    fn scenario_below_threshold() {
        let result = pipeline(0.7, 0.8)
            .predict(RawInput::Observation(observation()))
            .unwrap();
        assert_eq!(
            result,
            PredictionResult {
                probability: 0.7,
                prediction: 0
            }
        );
    }

    #[test]
    fn probability_equal_to_threshold_is_positive() {
        let t = 0.63219;
        let result = pipeline(t, t).predict_observation(&observation()).unwrap();
        assert_eq!(result.prediction, 1);
        assert_eq!(result.probability, 0.6322);
    }

    #[test]
    fn threshold_uses_unrounded_probability() {
        // 0.49996 rounds to 0.5 but is still below a 0.5 threshold.
        let result = pipeline(0.49996, 0.5)
            .predict_observation(&observation())
            .unwrap();
        assert_eq!(result.probability, 0.5);
        assert_eq!(result.prediction, 0);
    }

    #[test]
    fn invalid_blood_pressure_never_reaches_models() {
        let mut classifier = MockClassifier::new();
        classifier.expect_predict_proba().never();
        let mut scaler = MockScaler::new();
        scaler.expect_transform().never();

        let pipeline = InferencePipeline::new(Artifacts::new(
            Box::new(classifier),
            Box::new(scaler),
            Threshold::new(0.5).unwrap(),
        ));

        let obs = PatientObservation {
            ap_lo: 130,
            ..observation()
        };
        let err = pipeline.predict(RawInput::Observation(obs)).unwrap_err();
        assert!(matches!(
            err,
            PredictionError::Validation(ValidationError::DiastolicNotBelowSystolic { .. })
        ));
    }

    #[test]
    fn scaler_sees_only_the_prefix_and_tail_passes_through() {
        let seen_by_scaler = Arc::new(Mutex::new(Vec::new()));
        let seen_by_classifier = Arc::new(Mutex::new(Vec::new()));

        let mut scaler = MockScaler::new();
        scaler.expect_n_features().return_const(3usize);
        let record = Arc::clone(&seen_by_scaler);
        scaler.expect_transform().with(always()).returning(move |rows| {
            record.lock().unwrap().extend(rows.iter().cloned());
            Ok(rows
                .iter()
                .map(|r| r.iter().map(|v| v * 10.0).collect())
                .collect())
        });

        let mut classifier = MockClassifier::new();
        classifier.expect_n_features().return_const(5usize);
        let record = Arc::clone(&seen_by_classifier);
        classifier.expect_predict_proba().returning(move |x| {
            *record.lock().unwrap() = x.to_vec();
            Ok([0.4, 0.6])
        });

        let pipeline = InferencePipeline::new(Artifacts::new(
            Box::new(classifier),
            Box::new(scaler),
            Threshold::new(0.5).unwrap(),
        ));
        let obs = PatientObservation {
            cholesterol: 3,
            active: 0,
            ..observation()
        };
        pipeline.predict_observation(&obs).unwrap();

        assert_eq!(*seen_by_scaler.lock().unwrap(), vec![vec![50.0, 120.0, 80.0]]);
        assert_eq!(
            *seen_by_classifier.lock().unwrap(),
            vec![500.0, 1200.0, 800.0, 3.0, 0.0]
        );
    }

    #[test]
    fn short_vector_is_validation_error() {
        let pipeline = InferencePipeline::new(Artifacts::new(
            Box::new(fixed_classifier(0.7)),
            identity_scaler(),
            Threshold::new(0.5).unwrap(),
        ));
        let err = pipeline.predict(RawInput::Features(vec![1.0, 2.0])).unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("StandardScaler is expecting 3 features"));

        let err = pipeline.predict(RawInput::Features(vec![])).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn classifier_shape_error_is_validation_error() {
        let mut classifier = MockClassifier::new();
        classifier.expect_predict_proba().returning(|x| {
            Err(ModelError::Shape {
                model: "MlpClassifier",
                expected: 5,
                got: x.len(),
            })
        });
        let pipeline = InferencePipeline::new(Artifacts::new(
            Box::new(classifier),
            identity_scaler(),
            Threshold::new(0.5).unwrap(),
        ));

        let err = pipeline
            .predict(RawInput::Features(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]))
            .unwrap_err();
        assert!(matches!(
            err,
            PredictionError::Validation(ValidationError::InvalidInput(_))
        ));
    }

    #[test]
    fn numeric_failure_is_inference_error() {
        let mut classifier = MockClassifier::new();
        classifier
            .expect_predict_proba()
            .returning(|_| Ok([f64::NAN, f64::NAN]));
        let pipeline = InferencePipeline::new(Artifacts::new(
            Box::new(classifier),
            identity_scaler(),
            Threshold::new(0.5).unwrap(),
        ));

        let err = pipeline
            .predict(RawInput::Features(vec![1.0, 2.0, 3.0, 4.0, 5.0]))
            .unwrap_err();
        assert!(matches!(err, PredictionError::Inference(_)));
    }

    #[test]
    fn non_finite_features_are_rejected_before_scaling() {
        let mut scaler = MockScaler::new();
        scaler.expect_transform().never();
        let pipeline = InferencePipeline::new(Artifacts::new(
            Box::new(fixed_classifier(0.7)),
            Box::new(scaler),
            Threshold::new(0.5).unwrap(),
        ));

        let err = pipeline
            .predict_features(&[1.0, f64::NAN, 3.0, 4.0, 5.0])
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn repeated_predictions_are_bit_identical() {
        let pipeline = InferencePipeline::new(Artifacts::new(
            Box::new(crate::ml::MlpClassifier {
                input_dim: 5,
                layers: vec![crate::ml::MlpLayer {
                    weights: vec![vec![0.41, 0.93, 0.22, 0.35, -0.18]],
                    bias: vec![-0.05],
                    activation: crate::ml::Activation::Sigmoid,
                }],
                metadata: serde_json::Value::Null,
            }),
            Box::new(StandardScaler::new(
                vec![53.3, 126.6, 81.3],
                vec![6.76, 16.7, 9.4],
            )),
            Threshold::new(0.5).unwrap(),
        ));

        let a = pipeline.predict_observation(&observation()).unwrap();
        let b = pipeline.predict_observation(&observation()).unwrap();
        assert_eq!(a.probability.to_bits(), b.probability.to_bits());
        assert_eq!(a.prediction, b.prediction);
    }
}
