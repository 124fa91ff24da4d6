//! Chart payloads consumed by the dashboard.
//!
//! Titles and descriptions are shown to end users as-is (French UI).

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::analytics::correlation::pearson;
use crate::analytics::dataset::{Column, Dataset, PatientRecord};
use crate::analytics::stats::{mean, round_to};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Histogram,
    Scatter,
    Box,
    Radar,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartData {
    pub chart_type: ChartType,
    pub title: String,
    pub description: String,
    pub x_label: String,
    pub y_label: Option<String>,
    pub data: Vec<Value>,
}

impl ChartData {
    fn new(chart_type: ChartType, title: &str, description: String, x_label: &str, y_label: &str) -> Self {
        Self {
            chart_type,
            title: title.to_string(),
            description,
            x_label: x_label.to_string(),
            y_label: Some(y_label.to_string()),
            data: Vec::new(),
        }
    }

    fn with_data(mut self, data: Vec<Value>) -> Self {
        self.data = data;
        self
    }
}

/// Scatter charts plot a deterministic subset of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampling {
    pub size: usize,
    pub seed: u64,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            size: 5000,
            seed: 42,
        }
    }
}

impl Sampling {
    /// `min(size, len)` rows, identical for identical seeds.
    pub fn sample<'a>(&self, dataset: &'a Dataset) -> Vec<&'a PatientRecord> {
        let records = dataset.records();
        let amount = self.size.min(records.len());
        let mut rng = StdRng::seed_from_u64(self.seed);
        rand::seq::index::sample(&mut rng, records.len(), amount)
            .into_iter()
            .map(|i| &records[i])
            .collect()
    }
}

/// Healthy / sick counts per distinct value of `column`, ordered by value.
fn counts_by(dataset: &Dataset, column: Column) -> BTreeMap<i64, (u64, u64)> {
    let mut counts = BTreeMap::new();
    for record in dataset.records() {
        let entry: &mut (u64, u64) = counts.entry(record.value(column) as i64).or_default();
        if record.has_disease() {
            entry.1 += 1;
        } else {
            entry.0 += 1;
        }
    }
    counts
}

fn count_rows(dataset: &Dataset, column: Column, label: impl Fn(i64) -> Value) -> Vec<Value> {
    counts_by(dataset, column)
        .into_iter()
        .map(|(value, (healthy, sick))| {
            json!({
                column.name(): label(value),
                "num_healthy_people": healthy,
                "num_sick_people": sick,
            })
        })
        .collect()
}

fn gender_label(code: i64) -> Value {
    match code {
        1 => json!("Femme"),
        2 => json!("Homme"),
        other => json!(other.to_string()),
    }
}

pub fn age_distribution(dataset: &Dataset) -> ChartData {
    ChartData::new(
        ChartType::Histogram,
        "Distribution des maladies cardiovasculaires selon l'âge",
        "Ce graphique montre la répartition des individus atteints ou non de maladies cardiovasculaires en fonction de leur âge.".to_string(),
        "Âge",
        "Nombre de cas",
    )
    .with_data(count_rows(dataset, Column::Age, |v| json!(v)))
}

pub fn gender_distribution(dataset: &Dataset) -> ChartData {
    ChartData::new(
        ChartType::Histogram,
        "Répartition des maladies cardiovasculaires selon le genre",
        "Ce graphique montre la répartition des cas de maladies cardiovasculaires entre les femmes et les hommes.".to_string(),
        "Genre",
        "Nombre de cas",
    )
    .with_data(count_rows(dataset, Column::Gender, gender_label))
}

pub fn blood_pressure(dataset: &Dataset, sampling: Sampling) -> ChartData {
    let data = sampling
        .sample(dataset)
        .into_iter()
        .map(|r| {
            json!({
                "ap_hi": r.ap_hi,
                "ap_lo": r.ap_lo,
                "cardio": r.cardio,
                "age": r.age,
                "gender": r.gender,
            })
        })
        .collect();

    ChartData::new(
        ChartType::Scatter,
        "Pression artérielle (Systolique vs Diastolique)",
        "Ce graphique en nuage de points montre la relation entre la pression systolique (ap_hi) et la pression diastolique (ap_lo) pour chaque individu.".to_string(),
        "Pression Systolique",
        "Pression Diastolique",
    )
    .with_data(data)
}

pub fn blood_pressure_correlation(dataset: &Dataset, sampling: Sampling) -> ChartData {
    let sample = sampling.sample(dataset);
    let ap_hi: Vec<f64> = sample.iter().map(|r| r.ap_hi as f64).collect();
    let ap_lo: Vec<f64> = sample.iter().map(|r| r.ap_lo as f64).collect();
    let correlation = round_to(pearson(&ap_hi, &ap_lo), 2);

    let data = sample
        .into_iter()
        .map(|r| json!({ "ap_hi": r.ap_hi, "ap_lo": r.ap_lo, "cardio": r.cardio }))
        .collect();

    ChartData::new(
        ChartType::Scatter,
        "Corrélation entre pression systolique et diastolique",
        format!(
            "Ce nuage de points montre la relation entre la pression artérielle systolique (ap_hi) et la pression diastolique (ap_lo) pour chaque individu du dataset. La corrélation entre ces deux variables est de {correlation}."
        ),
        "Pression Systolique",
        "Pression Diastolique",
    )
    .with_data(data)
}

pub fn bmi_by_age(dataset: &Dataset, sampling: Sampling) -> ChartData {
    let data = sampling
        .sample(dataset)
        .into_iter()
        .map(|r| json!({ "age": r.age, "IMC": r.imc, "cardio": r.cardio }))
        .collect();

    ChartData::new(
        ChartType::Scatter,
        "IMC selon l'âge et présence de maladie cardiovasculaire",
        "Ce nuage de points présente la distribution de l'indice de masse corporelle (IMC) en fonction de l'âge, avec un code couleur indiquant la présence ou non de maladies cardiovasculaires.".to_string(),
        "Âge",
        "Indice de Masse Corporelle",
    )
    .with_data(data)
}

pub fn cholesterol(dataset: &Dataset) -> ChartData {
    ChartData::new(
        ChartType::Box,
        "Distribution du cholestérol selon la présence de maladies cardiovasculaires",
        "Ce boxplot compare la répartition des niveaux de cholestérol entre les individus avec et sans maladie cardiovasculaire.".to_string(),
        "Maladie Cardio (0=Non, 1=Oui)",
        "Cholestérol",
    )
    .with_data(count_rows(dataset, Column::Cholesterol, |v| json!(v)))
}

pub fn glucose(dataset: &Dataset) -> ChartData {
    ChartData::new(
        ChartType::Box,
        "Distribution du glucose selon la présence de maladies cardiovasculaires",
        "Ce boxplot compare la répartition des niveaux de glucose entre les individus avec et sans maladie cardiovasculaire.".to_string(),
        "Maladie Cardio (0=Non, 1=Oui)",
        "Glucose",
    )
    .with_data(count_rows(dataset, Column::Gluc, |v| json!(v)))
}

pub fn physical_activity(dataset: &Dataset) -> ChartData {
    ChartData::new(
        ChartType::Histogram,
        "Lien entre activité physique et maladies cardiovasculaires",
        "Ce graphique compare le nombre de personnes atteintes ou non de maladies cardiovasculaires selon qu'elles déclarent pratiquer une activité physique régulière".to_string(),
        "Activité Physique",
        "Nombre de cas",
    )
    .with_data(count_rows(dataset, Column::Active, |v| json!(v)))
}

pub fn smoking(dataset: &Dataset) -> ChartData {
    ChartData::new(
        ChartType::Histogram,
        "Tabagisme et maladies cardiovasculaires",
        "Ce graphique compare le nombre de personnes atteintes ou non de maladies cardiovasculaires selon qu'elles fument.".to_string(),
        "Tabagisme",
        "Nombre de cas",
    )
    .with_data(count_rows(dataset, Column::Smoke, |v| json!(v)))
}

pub fn alcohol(dataset: &Dataset) -> ChartData {
    ChartData::new(
        ChartType::Histogram,
        "Consommation d'alcool et maladies cardiovasculaires",
        "Ce graphique compare le nombre de personnes atteintes ou non de maladies cardiovasculaires selon qu'elles consomment de l'alcool.".to_string(),
        "Consommation d'alcool (0=Non, 1=Oui)",
        "Nombre de cas",
    )
    .with_data(count_rows(dataset, Column::Alco, |v| json!(v)))
}

pub fn risk_factors_radar(dataset: &Dataset) -> ChartData {
    let factors = [
        ("Âge moyen", Column::Age),
        ("IMC moyen", Column::Imc),
        ("Pression Systolique moyenne", Column::ApHi),
        ("Cholestérol moyen", Column::Cholesterol),
        ("Glucose moyen", Column::Gluc),
    ];
    let data = factors
        .iter()
        .map(|(factor, column)| {
            json!({
                "factor": factor,
                "value": round_to(mean(&dataset.column(*column)), 2),
            })
        })
        .collect();

    ChartData::new(
        ChartType::Radar,
        "Facteurs moyens associés au risque cardiovasculaire",
        "Ce graphique radar met en lumière les valeurs moyennes de plusieurs facteurs de risque cardiovasculaire parmi les individus atteints de maladies cardio.".to_string(),
        "Facteur",
        "Valeur moyenne",
    )
    .with_data(data)
}

/// Every chart, in dashboard order.
pub fn all_charts(dataset: &Dataset, sampling: Sampling) -> Vec<ChartData> {
    vec![
        age_distribution(dataset),
        gender_distribution(dataset),
        blood_pressure(dataset, sampling),
        blood_pressure_correlation(dataset, sampling),
        bmi_by_age(dataset, sampling),
        cholesterol(dataset),
        glucose(dataset),
        physical_activity(dataset),
        smoking(dataset),
        alcohol(dataset),
        risk_factors_radar(dataset),
    ]
}
