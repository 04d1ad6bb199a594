use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

mod loader;
mod logging;

pub use loader::{load_config, load_config_from_path, parse_config, ConfigError, CONFIG_PATH_ENV};
pub use logging::setup_logging;

pub type AppConfig = SpeechPrepConfig;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct SpeechPrepConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    #[validate(nested)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    #[validate(nested)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub ansi: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_url")]
    #[validate(url)]
    pub url: String,
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
    #[serde(default = "default_dataset_name")]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default = "default_chunk_size")]
    #[validate(range(min = 1))]
    pub chunk_size: usize,
    #[serde(default = "default_true")]
    pub require_completion_marker: bool,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl DatasetConfig {
    /// Directory whose presence means the dataset was already fetched.
    pub fn destination(&self) -> PathBuf {
        self.root_dir.join(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    #[serde(default = "default_pipeline_name")]
    #[validate(length(min = 1))]
    pub selected: String,
    #[serde(default = "default_pipeline_definitions")]
    pub definitions: HashMap<String, PipelineDefinitionConfig>,
    #[serde(default)]
    #[validate(nested)]
    pub plugins: PipelinePluginsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDefinitionConfig {
    #[serde(default)]
    pub steps: Vec<PipelineStepRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PipelineStepRef {
    Name(String),
    WithName { name: String },
}

impl PipelineStepRef {
    pub fn name(&self) -> &str {
        match self {
            PipelineStepRef::Name(name) => name,
            PipelineStepRef::WithName { name } => name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct PipelinePluginsConfig {
    #[serde(default)]
    #[validate(nested)]
    pub label_indexer: LabelIndexerPluginConfig,
    #[serde(default)]
    #[validate(nested)]
    pub label_padding: LabelPaddingPluginConfig,
    #[serde(default)]
    #[validate(nested)]
    pub spectrogram_padding: SpectrogramPaddingPluginConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LabelIndexerPluginConfig {
    #[serde(default = "default_vocab")]
    #[validate(length(min = 1))]
    pub vocab: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LabelPaddingPluginConfig {
    #[serde(default = "default_max_word_length")]
    #[validate(range(min = 1))]
    pub max_word_length: usize,
    /// Falls back to the vocabulary size, the CTC blank index.
    #[serde(default)]
    pub padding_value: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SpectrogramPaddingPluginConfig {
    #[serde(default = "default_max_spectrogram_length")]
    #[validate(range(min = 1))]
    pub max_spectrogram_length: usize,
    #[serde(default)]
    pub padding_value: f32,
}

impl SpeechPrepConfig {
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;

        let vocab = &self.pipeline.plugins.label_indexer.vocab;
        let mut seen = HashSet::with_capacity(vocab.len());
        if let Some(duplicate) = vocab.chars().find(|symbol| !seen.insert(*symbol)) {
            return Err(ConfigError::Invalid(format!(
                "pipeline.plugins.label_indexer.vocab repeats symbol {duplicate:?}"
            )));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            ansi: default_true(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            url: default_dataset_url(),
            root_dir: default_root_dir(),
            name: default_dataset_name(),
            chunk_size: default_chunk_size(),
            require_completion_marker: default_true(),
            timeout_secs: None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            selected: default_pipeline_name(),
            definitions: default_pipeline_definitions(),
            plugins: PipelinePluginsConfig::default(),
        }
    }
}

impl Default for PipelineDefinitionConfig {
    fn default() -> Self {
        Self {
            steps: vec![
                PipelineStepRef::Name("label_indexer".to_string()),
                PipelineStepRef::Name("label_padding".to_string()),
                PipelineStepRef::Name("spectrogram_padding".to_string()),
            ],
        }
    }
}

impl Default for LabelIndexerPluginConfig {
    fn default() -> Self {
        Self {
            vocab: default_vocab(),
        }
    }
}

impl Default for LabelPaddingPluginConfig {
    fn default() -> Self {
        Self {
            max_word_length: default_max_word_length(),
            padding_value: None,
        }
    }
}

impl Default for SpectrogramPaddingPluginConfig {
    fn default() -> Self {
        Self {
            max_spectrogram_length: default_max_spectrogram_length(),
            padding_value: 0.0,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_dataset_url() -> String {
    "https://data.keithito.com/data/speech/LJSpeech-1.1.tar.bz2".to_string()
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("Datasets")
}

fn default_dataset_name() -> String {
    "LJSpeech-1.1".to_string()
}

fn default_chunk_size() -> usize {
    1024 * 1024
}

fn default_pipeline_name() -> String {
    "default".to_string()
}

fn default_pipeline_definitions() -> HashMap<String, PipelineDefinitionConfig> {
    let mut definitions = HashMap::new();
    definitions.insert(default_pipeline_name(), PipelineDefinitionConfig::default());
    definitions
}

fn default_vocab() -> String {
    "abcdefghijklmnopqrstuvwxyz'?! ".to_string()
}

fn default_max_word_length() -> usize {
    186
}

fn default_max_spectrogram_length() -> usize {
    1392
}
