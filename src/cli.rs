use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::prediction::{PatientObservation, RawInput};

#[derive(Parser)]
#[command(name = "heartai")]
#[command(version = "0.1.0")]
#[command(about = "Cardiovascular risk prediction API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration directory (default.toml, $HEARTAI_ENV)
    #[arg(short, long, global = true, default_value = "config")]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API (default)
    Serve {
        /// Override server.port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Score one input with the configured artifacts and print the result
    Predict(PredictArgs),
    /// Load the artifacts and print a summary
    Inspect,
}

#[derive(clap::Args, Debug, Clone)]
pub struct PredictArgs {
    /// Pre-encoded feature vector, comma separated, in schema order
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub features: Option<Vec<f64>>,

    /// Age in years
    #[arg(long, required_unless_present = "features", conflicts_with = "features")]
    pub age: Option<i64>,

    /// Systolic blood pressure
    #[arg(long, required_unless_present = "features", conflicts_with = "features")]
    pub ap_hi: Option<i64>,

    /// Diastolic blood pressure
    #[arg(long, required_unless_present = "features", conflicts_with = "features")]
    pub ap_lo: Option<i64>,

    /// 1 = normal, 2 = above normal, 3 = well above normal
    #[arg(long, required_unless_present = "features", conflicts_with = "features")]
    pub cholesterol: Option<i64>,

    /// 1 when physically active
    #[arg(long, required_unless_present = "features", conflicts_with = "features")]
    pub active: Option<i64>,
}

impl PredictArgs {
    /// `None` when neither a vector nor all five clinical fields were given.
    pub fn into_input(self) -> Option<RawInput> {
        if let Some(features) = self.features {
            return Some(RawInput::Features(features));
        }
        Some(RawInput::Observation(PatientObservation {
            age: self.age?,
            ap_hi: self.ap_hi?,
            ap_lo: self.ap_lo?,
            cholesterol: self.cholesterol?,
            active: self.active?,
        }))
    }
}
