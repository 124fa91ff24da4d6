use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Serialization format of the classifier artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierFormat {
    /// Dense MLP exported as JSON
    #[default]
    Json,
    /// ONNX graph (requires the `onnx` feature)
    Onnx,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    /// Directory holding the classifier, scaler and threshold files
    #[serde(default = "default_artifact_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_classifier_file")]
    pub classifier_file: String,
    #[serde(default = "default_scaler_file")]
    pub scaler_file: String,
    #[serde(default = "default_threshold_file")]
    pub threshold_file: String,
    #[serde(default)]
    pub classifier_format: ClassifierFormat,
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_classifier_file() -> String {
    "classifier.json".to_string()
}

fn default_scaler_file() -> String {
    "scaler.json".to_string()
}

fn default_threshold_file() -> String {
    "threshold.json".to_string()
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: default_artifact_dir(),
            classifier_file: default_classifier_file(),
            scaler_file: default_scaler_file(),
            threshold_file: default_threshold_file(),
            classifier_format: ClassifierFormat::default(),
        }
    }
}

impl ArtifactConfig {
    /// Artifact files relative to `dir`
    pub fn with_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn classifier_path(&self) -> PathBuf {
        self.dir.join(&self.classifier_file)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.dir.join(&self.scaler_file)
    }

    pub fn threshold_path(&self) -> PathBuf {
        self.dir.join(&self.threshold_file)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Semicolon-separated cardio_train.csv
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,
    /// Maximum number of points in scatter charts
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    /// Seed for the scatter-chart sample, fixed so responses are stable
    #[serde(default = "default_sample_seed")]
    pub sample_seed: u64,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("dataset/cardio_train.csv")
}

fn default_sample_size() -> usize {
    5000
}

fn default_sample_seed() -> u64 {
    42
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            sample_size: default_sample_size(),
            sample_seed: default_sample_seed(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
    /// Directory for daily rotating log files (console only when unset)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("server.port", 8000)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("HEARTAI_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (HEARTAI_ARTIFACTS__DIR, etc.)
            .add_source(
                Environment::with_prefix("HEARTAI")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("server.port must be non-zero".to_string());
        }

        for (key, name) in [
            ("artifacts.classifier_file", &self.artifacts.classifier_file),
            ("artifacts.scaler_file", &self.artifacts.scaler_file),
            ("artifacts.threshold_file", &self.artifacts.threshold_file),
        ] {
            if name.trim().is_empty() {
                errors.push(format!("{key} must not be empty"));
            }
        }

        if self.dataset.sample_size == 0 {
            errors.push("dataset.sample_size must be positive".to_string());
        }

        if tracing_subscriber::EnvFilter::try_new(&self.logging.level).is_err() {
            errors.push(format!("logging.level is not a valid filter: {}", self.logging.level));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(dir.path()).unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.artifacts.classifier_format, ClassifierFormat::Json);
        assert_eq!(
            config.artifacts.scaler_path(),
            PathBuf::from("artifacts").join("scaler.json")
        );
        assert_eq!(config.dataset.sample_size, 5000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            r#"
[server]
port = 9100

[artifacts]
dir = "/opt/models"
classifier_file = "mlp.onnx"
classifier_format = "onnx"

[dataset]
sample_size = 100
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.artifacts.classifier_format, ClassifierFormat::Onnx);
        assert_eq!(
            config.artifacts.classifier_path(),
            PathBuf::from("/opt/models/mlp.onnx")
        );
        assert_eq!(config.artifacts.threshold_file, "threshold.json");
        assert_eq!(config.dataset.sample_size, 100);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut config = AppConfig::load_from(tempfile::tempdir().unwrap().path()).unwrap();
        config.artifacts.scaler_file = " ".to_string();
        config.dataset.sample_size = 0;

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
