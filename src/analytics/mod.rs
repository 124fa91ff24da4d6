//! Descriptive analytics over the cardio dataset backing the dashboard.

pub mod charts;
pub mod correlation;
pub mod dataset;
pub mod stats;

use serde::Serialize;
use std::sync::Arc;

pub use charts::{all_charts, ChartData, ChartType, Sampling};
pub use correlation::{correlation_analysis, pearson, CorrelationAnalysis, FeatureCorrelation};
pub use dataset::{Column, Dataset, PatientRecord};
pub use stats::{dataset_statistics, DatasetStatistics, Summary};

use crate::config::DatasetConfig;
use crate::error::DatasetError;

/// Whole preprocessed dataset as served to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteDataset<'a> {
    pub data: &'a [PatientRecord],
    pub total_records: usize,
}

/// Read-only analytics service shared across requests.
#[derive(Debug, Clone)]
pub struct CardioAnalytics {
    dataset: Arc<Dataset>,
    sampling: Sampling,
}

impl CardioAnalytics {
    pub fn new(dataset: Dataset, sampling: Sampling) -> Self {
        Self {
            dataset: Arc::new(dataset),
            sampling,
        }
    }

    pub fn load(config: &DatasetConfig) -> Result<Self, DatasetError> {
        let dataset = Dataset::load(&config.path)?;
        Ok(Self::new(
            dataset,
            Sampling {
                size: config.sample_size,
                seed: config.sample_seed,
            },
        ))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn sampling(&self) -> Sampling {
        self.sampling
    }

    pub fn complete(&self) -> CompleteDataset<'_> {
        CompleteDataset {
            data: self.dataset.records(),
            total_records: self.dataset.len(),
        }
    }

    pub fn statistics(&self) -> DatasetStatistics {
        dataset_statistics(&self.dataset)
    }

    pub fn correlations(&self) -> CorrelationAnalysis {
        correlation_analysis(&self.dataset)
    }

    pub fn charts(&self) -> Vec<ChartData> {
        all_charts(&self.dataset, self.sampling)
    }

    /// Single chart by its route name, `None` when unknown.
    pub fn chart(&self, name: &str) -> Option<ChartData> {
        let ds = self.dataset.as_ref();
        let chart = match name {
            "age" => charts::age_distribution(ds),
            "gender" => charts::gender_distribution(ds),
            "blood-pressure" => charts::blood_pressure(ds, self.sampling),
            "blood-pressure-correlation" => charts::blood_pressure_correlation(ds, self.sampling),
            "bmi-age" => charts::bmi_by_age(ds, self.sampling),
            "cholesterol" => charts::cholesterol(ds),
            "glucose" => charts::glucose(ds),
            "physical-activity" => charts::physical_activity(ds),
            "smoking" => charts::smoking(ds),
            "alcohol" => charts::alcohol(ds),
            "risk-factors-radar" => charts::risk_factors_radar(ds),
            _ => return None,
        };
        Some(chart)
    }
}

/// Names accepted by [`CardioAnalytics::chart`], in dashboard order.
pub const CHART_NAMES: [&str; 11] = [
    "age",
    "gender",
    "blood-pressure",
    "blood-pressure-correlation",
    "bmi-age",
    "cholesterol",
    "glucose",
    "physical-activity",
    "smoking",
    "alcohol",
    "risk-factors-radar",
];
