//! Summary statistics over the preprocessed dataset.

use serde::{Deserialize, Serialize};

use crate::analytics::dataset::{Column, Dataset};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl Summary {
    /// All fields are 0 for an empty column.
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                median: 0.0,
            };
        }
        Self {
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean: mean(values),
            median: median(values),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodPressureRange {
    pub systolic: Summary,
    pub diastolic: Summary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStatistics {
    pub total_records: usize,
    pub cardio_positive: usize,
    pub cardio_negative: usize,
    pub age_range: Summary,
    pub bmi_range: Summary,
    pub blood_pressure_range: BloodPressureRange,
}

pub fn dataset_statistics(dataset: &Dataset) -> DatasetStatistics {
    let cardio_positive = dataset.records().iter().filter(|r| r.cardio == 1).count();
    let cardio_negative = dataset.records().iter().filter(|r| r.cardio == 0).count();

    DatasetStatistics {
        total_records: dataset.len(),
        cardio_positive,
        cardio_negative,
        age_range: Summary::of(&dataset.column(Column::Age)),
        bmi_range: Summary::of(&dataset.column(Column::Imc)),
        blood_pressure_range: BloodPressureRange {
            systolic: Summary::of(&dataset.column(Column::ApHi)),
            diastolic: Summary::of(&dataset.column(Column::ApLo)),
        },
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Midpoint of the two central values for even-length input.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
