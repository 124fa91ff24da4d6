//! Preprocessed `cardio_train.csv`.
//!
//! Rows are read once at startup and never mutated. Preprocessing:
//! - age converted from days to whole years (truncated)
//! - `IMC = weight / (height / 100)^2`, height and weight then dropped
//! - rows outside `ap_hi ∈ [90, 200]`, `ap_lo ∈ [60, 140]`,
//!   `IMC ∈ [10, 80]` removed

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::error::DatasetError;

const DAYS_PER_YEAR: f64 = 365.25;
const AP_HI_KEEP: (i64, i64) = (90, 200);
const AP_LO_KEEP: (i64, i64) = (60, 140);
const IMC_KEEP: (f64, f64) = (10.0, 80.0);

/// One CSV row as published (age in days, height in cm, weight in kg).
#[derive(Debug, Deserialize)]
struct CsvRow {
    age: f64,
    gender: f64,
    height: f64,
    weight: f64,
    ap_hi: f64,
    ap_lo: f64,
    cholesterol: f64,
    gluc: f64,
    smoke: f64,
    alco: f64,
    active: f64,
    cardio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PatientRecord {
    /// Whole years
    pub age: i64,
    /// 1 = female, 2 = male
    pub gender: i64,
    pub ap_hi: i64,
    pub ap_lo: i64,
    pub cholesterol: i64,
    pub gluc: i64,
    pub smoke: i64,
    pub alco: i64,
    pub active: i64,
    pub cardio: i64,
    #[serde(rename = "IMC")]
    pub imc: f64,
}

impl PatientRecord {
    fn from_row(row: &CsvRow) -> Self {
        let height_m = row.height / 100.0;
        Self {
            age: (row.age / DAYS_PER_YEAR) as i64,
            gender: row.gender as i64,
            ap_hi: row.ap_hi as i64,
            ap_lo: row.ap_lo as i64,
            cholesterol: row.cholesterol as i64,
            gluc: row.gluc as i64,
            smoke: row.smoke as i64,
            alco: row.alco as i64,
            active: row.active as i64,
            cardio: row.cardio as i64,
            imc: row.weight / (height_m * height_m),
        }
    }

    fn within_filters(&self) -> bool {
        (AP_HI_KEEP.0..=AP_HI_KEEP.1).contains(&self.ap_hi)
            && (AP_LO_KEEP.0..=AP_LO_KEEP.1).contains(&self.ap_lo)
            && (IMC_KEEP.0..=IMC_KEEP.1).contains(&self.imc)
    }

    pub fn value(&self, column: Column) -> f64 {
        match column {
            Column::Age => self.age as f64,
            Column::Gender => self.gender as f64,
            Column::Imc => self.imc,
            Column::ApHi => self.ap_hi as f64,
            Column::ApLo => self.ap_lo as f64,
            Column::Cholesterol => self.cholesterol as f64,
            Column::Gluc => self.gluc as f64,
            Column::Smoke => self.smoke as f64,
            Column::Alco => self.alco as f64,
            Column::Active => self.active as f64,
            Column::Cardio => self.cardio as f64,
        }
    }

    pub fn has_disease(&self) -> bool {
        self.cardio == 1
    }
}

/// Columns of the preprocessed dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Age,
    Gender,
    Imc,
    ApHi,
    ApLo,
    Cholesterol,
    Gluc,
    Smoke,
    Alco,
    Active,
    Cardio,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Gender => "gender",
            Self::Imc => "IMC",
            Self::ApHi => "ap_hi",
            Self::ApLo => "ap_lo",
            Self::Cholesterol => "cholesterol",
            Self::Gluc => "gluc",
            Self::Smoke => "smoke",
            Self::Alco => "alco",
            Self::Active => "active",
            Self::Cardio => "cardio",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<PatientRecord>,
}

impl Dataset {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_reader(file)?;
        if dataset.is_empty() {
            return Err(DatasetError::Empty(path.to_path_buf()));
        }
        info!(path = %path.display(), records = dataset.len(), "dataset loaded");
        Ok(dataset)
    }

    /// Parse semicolon-separated CSV with a header row and preprocess it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for row in csv.deserialize::<CsvRow>() {
            let record = PatientRecord::from_row(&row?);
            if record.within_filters() {
                records.push(record);
            }
        }
        Ok(Self { records })
    }

    pub fn from_records(records: Vec<PatientRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column(&self, column: Column) -> Vec<f64> {
        self.records.iter().map(|r| r.value(column)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
id;age;gender;height;weight;ap_hi;ap_lo;cholesterol;gluc;smoke;alco;active;cardio
0;18393;2;168;62.0;110;80;1;1;0;0;1;0
1;20228;1;156;85.0;140;90;3;1;0;0;1;1
2;18857;1;165;64.0;130;70;3;1;0;0;0;1
3;17623;2;169;82.0;150;100;1;1;0;0;1;1
4;17474;1;156;56.0;100;60;1;1;0;0;0;0
5;21914;1;151;67.0;120;80;2;2;0;0;0;0
6;22113;1;157;93.0;16020;80;1;1;0;0;1;0
";

    #[test]
    fn converts_and_filters_rows() {
        let ds = Dataset::from_reader(CSV.as_bytes()).unwrap();
        // Row 6 has ap_hi out of range.
        assert_eq!(ds.len(), 6);

        let first = ds.records()[0];
        assert_eq!(first.age, 50); // 18393 / 365.25 = 50.36
        assert!((first.imc - 62.0 / (1.68 * 1.68)).abs() < 1e-9);
        assert_eq!(first.gender, 2);
        assert!(!first.has_disease());
    }

    #[test]
    fn serializes_with_imc_key() {
        let ds = Dataset::from_reader(CSV.as_bytes()).unwrap();
        let json = serde_json::to_value(ds.records()[1]).unwrap();
        assert!(json.get("IMC").is_some());
        assert!(json.get("height").is_none());
        assert_eq!(json["cardio"], 1);
    }

    #[test]
    fn missing_column_is_csv_error() {
        let bad = "id;age;gender\n0;18393;2\n";
        assert!(matches!(
            Dataset::from_reader(bad.as_bytes()),
            Err(DatasetError::Csv(_))
        ));
    }

    #[test]
    fn missing_file_is_open_error() {
        let err = Dataset::load("/nonexistent/cardio_train.csv").unwrap_err();
        assert!(matches!(err, DatasetError::Open { .. }));
    }

    #[test]
    fn fully_filtered_file_is_empty_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cardio.csv");
        std::fs::write(
            &path,
            "id;age;gender;height;weight;ap_hi;ap_lo;cholesterol;gluc;smoke;alco;active;cardio\n\
             0;18393;2;168;62.0;20;10;1;1;0;0;1;0\n",
        )
        .unwrap();
        assert!(matches!(Dataset::load(&path), Err(DatasetError::Empty(_))));
    }
}
