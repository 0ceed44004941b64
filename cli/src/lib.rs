use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use signature::{
    DebugImageWriter, DigitRecognizer, Pipeline, PipelineBuilder, SignatureError, TemplateSet,
    algorithms::SignatureReader,
};
use thiserror::Error;
use tracing::warn;

/// Sampling rates outside this range are accepted but give poor results
pub const RECOMMENDED_SAMPLING_RATES: std::ops::RangeInclusive<u32> = 90..=360;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Signature(#[from] SignatureError),
    #[error("max_thinning_iterations must be at least 1, got {0}")]
    InvalidThinningIterations(usize),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Application settings for digit recognition
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Number of sampling lines of the signature
    #[schemars(range(min = 4, max = 360))]
    pub signature_sampling_rate: u32,
    /// Save every intermediate image to `output_dir`
    pub write_processed_images_to_disk: bool,
    pub output_dir: PathBuf,
    /// Directory holding `signTemplate_0.png` .. `signTemplate_9.png`
    pub templates_dir: PathBuf,
    #[schemars(range(min = 1))]
    pub max_thinning_iterations: usize,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            signature_sampling_rate: 180,
            write_processed_images_to_disk: false,
            output_dir: PathBuf::from("processed"),
            templates_dir: PathBuf::from("templates"),
            max_thinning_iterations: 35,
        }
    }
}

impl RecognitionConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(ConfigError::UnsupportedFileFormat),
        }
    }

    /// Save configuration to a TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    /// Convert configuration to JSON string
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// JSON schema of the configuration file
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RecognitionConfig)
    }

    /// Reject sampling rates outside 4..=360 and a zero thinning cap, and warn
    /// about rates outside 90..=360
    pub fn validate(&self) -> Result<(), ConfigError> {
        SignatureReader::new(self.signature_sampling_rate)?;
        if self.max_thinning_iterations == 0 {
            return Err(ConfigError::InvalidThinningIterations(self.max_thinning_iterations));
        }
        if !RECOMMENDED_SAMPLING_RATES.contains(&self.signature_sampling_rate) {
            warn!(
                "Sampling rate {} is outside the recommended range {:?}",
                self.signature_sampling_rate, RECOMMENDED_SAMPLING_RATES
            );
        }
        Ok(())
    }

    pub fn build_pipeline(&self) -> Result<Pipeline, ConfigError> {
        self.validate()?;
        let pipeline = PipelineBuilder::new()
            .with_sampling_rate(self.signature_sampling_rate)
            .with_standard_stages(self.max_thinning_iterations)
            .build()?;
        Ok(pipeline)
    }

    /// Pipeline plus templates loaded from `templates_dir`
    pub fn build_recognizer(&self) -> Result<DigitRecognizer, ConfigError> {
        let pipeline = self.build_pipeline()?;
        let templates = TemplateSet::load_dir(&self.templates_dir, pipeline.binarizer())?;
        Ok(DigitRecognizer::new(pipeline, templates))
    }

    /// Writer for intermediate images when enabled, rooted at `output_dir/<name>`
    pub fn debug_writer(&self, name: &str) -> Result<Option<DebugImageWriter>, ConfigError> {
        if !self.write_processed_images_to_disk {
            return Ok(None);
        }
        Ok(Some(DebugImageWriter::new(self.output_dir.join(name))?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config = RecognitionConfig::from_toml("signature_sampling_rate = 90\n").expect("Should parse TOML");
        assert_eq!(config.signature_sampling_rate, 90);
        assert!(!config.write_processed_images_to_disk);
        assert_eq!(config.max_thinning_iterations, 35);
        assert_eq!(config.templates_dir, PathBuf::from("templates"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = RecognitionConfig {
            signature_sampling_rate: 360,
            write_processed_images_to_disk: true,
            ..RecognitionConfig::default()
        };
        let toml = config.to_toml().expect("Should serialize");
        assert_eq!(RecognitionConfig::from_toml(&toml).expect("Should parse"), config);
    }

    #[test]
    fn test_from_file_detects_format() {
        let dir = tempfile::tempdir().expect("Should create temp dir");

        let json_path = dir.path().join("config.json");
        fs::write(&json_path, r#"{ "signature_sampling_rate": 120 }"#).expect("Should write config");
        let config = RecognitionConfig::from_file(&json_path).expect("Should load JSON");
        assert_eq!(config.signature_sampling_rate, 120);

        let toml_path = dir.path().join("config.toml");
        RecognitionConfig::default().to_toml_file(&toml_path).expect("Should write TOML");
        assert_eq!(
            RecognitionConfig::from_file(&toml_path).expect("Should load TOML"),
            RecognitionConfig::default()
        );

        let other = dir.path().join("config.yaml");
        fs::write(&other, "").expect("Should write file");
        assert!(matches!(
            RecognitionConfig::from_file(&other),
            Err(ConfigError::UnsupportedFileFormat)
        ));
    }

    #[test]
    fn test_validate_enforces_hard_range() {
        let mut config = RecognitionConfig::default();
        assert!(config.validate().is_ok());

        config.signature_sampling_rate = 16;
        assert!(config.validate().is_ok(), "Low rates only warn");

        config.signature_sampling_rate = 361;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Signature(SignatureError::InvalidSamplingRate { value: 361 }))
        ));
    }

    #[test]
    fn test_zero_thinning_iterations_is_rejected() {
        let config = RecognitionConfig::from_json(r#"{ "max_thinning_iterations": 0 }"#).expect("Should parse JSON");
        assert!(matches!(config.validate(), Err(ConfigError::InvalidThinningIterations(0))));
        assert!(config.build_pipeline().is_err());

        let config = RecognitionConfig {
            max_thinning_iterations: 1,
            ..RecognitionConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_writer_follows_flag() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let mut config = RecognitionConfig {
            output_dir: dir.path().to_path_buf(),
            ..RecognitionConfig::default()
        };
        assert!(config.debug_writer("digit").expect("Should not fail").is_none());

        config.write_processed_images_to_disk = true;
        let writer = config.debug_writer("digit").expect("Should create writer").expect("Should be enabled");
        assert!(writer.dir().is_dir());
    }

    #[test]
    fn test_schema_lists_fields() {
        let schema = serde_json::to_value(RecognitionConfig::schema()).expect("Should serialize schema");
        let properties = &schema["properties"];
        assert!(properties.get("signature_sampling_rate").is_some());
        assert!(properties.get("write_processed_images_to_disk").is_some());
    }
}
