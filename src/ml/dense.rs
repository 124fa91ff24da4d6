//! Dense neural network classifier (CPU-only).
//!
//! Small MLPs exported from training as JSON:
//! - hidden layers with `relu`/`tanh`/`sigmoid`/`linear` activations
//! - an output layer of either one `sigmoid` unit (`P(1)`) or two units
//!   (`[P(0), P(1)]`, usually `softmax`)
//!
//! Shapes are validated when the file is loaded so a bad export fails the
//! service at startup instead of on the first request.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ArtifactKind, ArtifactLoadError, ModelError};
use crate::ml::{check_proba, Classifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Tanh,
    Sigmoid,
    /// Applied across the whole layer output, not per unit.
    Softmax,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpLayer {
    /// Weights shape: [out_dim][in_dim]
    pub weights: Vec<Vec<f64>>,
    /// Bias shape: [out_dim]
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

impl MlpLayer {
    fn out_dim(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, x: &[f64]) -> Vec<f64> {
        let mut y: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(x).fold(*b, |acc, (w, v)| acc + w * v))
            .collect();

        match self.activation {
            Activation::Softmax => softmax(&mut y),
            act => y.iter_mut().for_each(|v| *v = apply_activation(*v, act)),
        }
        y
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpClassifier {
    /// Expected input dimension.
    pub input_dim: usize,

    pub layers: Vec<MlpLayer>,

    /// Optional free-form metadata (training run, f1 score, etc).
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl MlpClassifier {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactLoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ArtifactLoadError::new(ArtifactKind::Classifier, path, e))?;
        let model: Self = serde_json::from_str(&content)
            .map_err(|e| ArtifactLoadError::new(ArtifactKind::Classifier, path, e))?;
        model
            .validate()
            .map_err(|reason| ArtifactLoadError::invalid(ArtifactKind::Classifier, path, reason))?;
        Ok(model)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.input_dim == 0 {
            return Err("input_dim must be > 0".to_string());
        }
        if self.layers.is_empty() {
            return Err("layers must not be empty".to_string());
        }

        let mut expected_in = self.input_dim;
        let last = self.layers.len() - 1;
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.out_dim() == 0 {
                return Err(format!("layer[{idx}] out_dim must be > 0"));
            }
            if layer.bias.len() != layer.out_dim() {
                return Err(format!(
                    "layer[{idx}] bias len {} != out_dim {}",
                    layer.bias.len(),
                    layer.out_dim()
                ));
            }
            for (r, row) in layer.weights.iter().enumerate() {
                if row.len() != expected_in {
                    return Err(format!(
                        "layer[{idx}] weights row {r} len {} != expected in_dim {expected_in}",
                        row.len()
                    ));
                }
                if row.iter().any(|v| !v.is_finite()) {
                    return Err(format!("layer[{idx}] weights contain non-finite values"));
                }
            }
            if layer.bias.iter().any(|v| !v.is_finite()) {
                return Err(format!("layer[{idx}] bias contain non-finite values"));
            }
            if layer.activation == Activation::Softmax && idx != last {
                return Err(format!("layer[{idx}] softmax is only allowed on the output layer"));
            }
            expected_in = layer.out_dim();
        }

        match self.output_dim() {
            1 | 2 => Ok(()),
            n => Err(format!("output layer must have 1 or 2 units, got {n}")),
        }
    }

    pub fn output_dim(&self) -> usize {
        self.layers.last().map(|l| l.out_dim()).unwrap_or(0)
    }

    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        if input.len() != self.input_dim {
            return Err(ModelError::Shape {
                model: "MlpClassifier",
                expected: self.input_dim,
                got: input.len(),
            });
        }

        let mut x = input.to_vec();
        for layer in &self.layers {
            x = layer.forward(&x);
        }
        Ok(x)
    }
}

impl Classifier for MlpClassifier {
    fn n_features(&self) -> usize {
        self.input_dim
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ModelError> {
        let out = self.forward(features)?;
        let proba = match out.as_slice() {
            [p1] => [1.0 - p1, *p1],
            [p0, p1] => [*p0, *p1],
            other => {
                return Err(ModelError::Backend(format!(
                    "classifier emitted {} outputs",
                    other.len()
                )))
            }
        };
        check_proba(proba)
    }
}

fn apply_activation(x: f64, act: Activation) -> f64 {
    match act {
        Activation::Linear | Activation::Softmax => x,
        Activation::Relu => x.max(0.0),
        Activation::Tanh => x.tanh(),
        Activation::Sigmoid => sigmoid(x),
    }
}

fn sigmoid(x: f64) -> f64 {
    // Numerically-stable sigmoid.
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

fn softmax(values: &mut [f64]) {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    for v in values.iter_mut() {
        *v /= sum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logistic(weights: Vec<f64>) -> MlpClassifier {
        MlpClassifier {
            input_dim: weights.len(),
            layers: vec![MlpLayer {
                weights: vec![weights],
                bias: vec![0.0],
                activation: Activation::Sigmoid,
            }],
            metadata: serde_json::json!({}),
        }
    }

    #[test]
    fn single_sigmoid_unit_is_positive_class() {
        let net = logistic(vec![1.0, 2.0]);
        net.validate().unwrap();

        let p0 = net.predict_proba(&[0.0, 0.0]).unwrap();
        assert!((p0[1] - 0.5).abs() < 1e-12);
        assert!((p0[0] + p0[1] - 1.0).abs() < 1e-12);

        let p1 = net.predict_proba(&[1.0, 0.0]).unwrap();
        assert!(p1[1] > 0.5);
    }

    #[test]
    fn softmax_output_sums_to_one() {
        let net = MlpClassifier {
            input_dim: 2,
            layers: vec![
                MlpLayer {
                    weights: vec![vec![1.0, -1.0], vec![0.5, 0.5], vec![-1.0, 2.0]],
                    bias: vec![0.0, 0.1, -0.1],
                    activation: Activation::Relu,
                },
                MlpLayer {
                    weights: vec![vec![1.0, 0.0, -1.0], vec![-1.0, 1.0, 1.0]],
                    bias: vec![0.0, 0.0],
                    activation: Activation::Softmax,
                },
            ],
            metadata: serde_json::Value::Null,
        };
        net.validate().unwrap();

        let proba = net.predict_proba(&[0.3, 1.2]).unwrap();
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn validates_shapes() {
        let bad = MlpClassifier {
            input_dim: 3,
            layers: vec![MlpLayer {
                weights: vec![vec![1.0, 2.0]], // in_dim mismatch
                bias: vec![0.0],
                activation: Activation::Linear,
            }],
            metadata: serde_json::json!({}),
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn rejects_wide_output_layer() {
        let bad = MlpClassifier {
            input_dim: 1,
            layers: vec![MlpLayer {
                weights: vec![vec![1.0], vec![1.0], vec![1.0]],
                bias: vec![0.0, 0.0, 0.0],
                activation: Activation::Softmax,
            }],
            metadata: serde_json::json!({}),
        };
        assert!(bad.validate().unwrap_err().contains("1 or 2 units"));
    }

    #[test]
    fn input_width_mismatch_is_shape_error() {
        let net = logistic(vec![1.0, 1.0, 1.0, 1.0, 1.0]);
        let err = net.predict_proba(&[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            ModelError::Shape {
                model: "MlpClassifier",
                expected: 5,
                got: 2
            }
        );
    }

    #[test]
    fn loads_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classifier.json");
        std::fs::write(
            &path,
            r#"{"input_dim": 2, "layers": [{"weights": [[0.5, -0.5]], "bias": [0.1], "activation": "sigmoid"}]}"#,
        )
        .unwrap();

        let net = MlpClassifier::from_file(&path).unwrap();
        assert_eq!(net.n_features(), 2);
        assert_eq!(net.output_dim(), 1);
    }

    #[test]
    fn malformed_file_is_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classifier.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = MlpClassifier::from_file(&path).unwrap_err();
        assert_eq!(err.kind, ArtifactKind::Classifier);
    }
}
