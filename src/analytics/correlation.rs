//! Pearson correlation between dataset columns.

use serde::{Deserialize, Serialize};

use crate::analytics::dataset::{Column, Dataset};
use crate::analytics::stats::{mean, round_to};

/// Columns of the correlation matrix, in matrix order. `cardio` is last.
pub const CORRELATION_COLUMNS: [Column; 10] = [
    Column::Age,
    Column::Imc,
    Column::ApHi,
    Column::ApLo,
    Column::Cholesterol,
    Column::Gluc,
    Column::Smoke,
    Column::Alco,
    Column::Active,
    Column::Cardio,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCorrelation {
    pub feature: String,
    pub correlation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationAnalysis {
    pub correlation_matrix: Vec<Vec<f64>>,
    pub feature_names: Vec<String>,
    /// Correlation of every other feature with `cardio`, strongest first.
    pub top_correlations: Vec<FeatureCorrelation>,
}

/// Pearson's r. A zero-variance input yields 0 rather than NaN.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let (mx, my) = (mean(x), mean(y));

    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let (dx, dy) = (a - mx, b - my);
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }

    let denom = (vx * vy).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    (cov / denom).clamp(-1.0, 1.0)
}

pub fn correlation_analysis(dataset: &Dataset) -> CorrelationAnalysis {
    let columns: Vec<Vec<f64>> = CORRELATION_COLUMNS
        .iter()
        .map(|c| dataset.column(*c))
        .collect();

    let n = columns.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = round_to(pearson(&columns[i], &columns[j]), 2);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    let cardio = n - 1;
    let mut top_correlations: Vec<FeatureCorrelation> = CORRELATION_COLUMNS[..cardio]
        .iter()
        .enumerate()
        .map(|(i, c)| FeatureCorrelation {
            feature: c.name().to_string(),
            correlation: matrix[i][cardio],
        })
        .collect();
    // Stable sort keeps matrix order among ties.
    top_correlations.sort_by(|a, b| b.correlation.total_cmp(&a.correlation));

    CorrelationAnalysis {
        correlation_matrix: matrix,
        feature_names: CORRELATION_COLUMNS
            .iter()
            .map(|c| c.name().to_string())
            .collect(),
        top_correlations,
    }
}
