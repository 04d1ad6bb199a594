use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::AppConfig;

/// Explicit path to a TOML config file; wins over `config/<RUN_ENV>.toml`.
pub const CONFIG_PATH_ENV: &str = "SPEECHPREP_CONFIG";
const RUN_ENV: &str = "RUN_ENV";
const DEFAULT_RUN_ENV: &str = "development";
const CONFIG_DIR: &str = "config";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub fn load_config() -> Result<AppConfig, ConfigError> {
    let lookup = |key: &str| env::var(key).ok();
    let mut config = match resolve_config_path(Path::new(CONFIG_DIR), lookup) {
        Some(path) => load_config_from_path(&path)?,
        None => AppConfig::default(),
    };
    apply_env_overrides(&mut config, lookup);
    config.check()?;
    Ok(config)
}

pub fn load_config_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_config(contents: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(contents)
}

fn resolve_config_path<F>(config_dir: &Path, lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    let run_env = lookup(RUN_ENV).unwrap_or_else(|| DEFAULT_RUN_ENV.to_string());
    let candidate = config_dir.join(format!("{run_env}.toml"));
    candidate.is_file().then_some(candidate)
}

fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(level) = lookup("SPEECHPREP_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(url) = lookup("SPEECHPREP_DATASET_URL") {
        config.dataset.url = url;
    }
    if let Some(root_dir) = lookup("SPEECHPREP_DATASET_ROOT") {
        config.dataset.root_dir = PathBuf::from(root_dir);
    }
    if let Some(selected) = lookup("SPEECHPREP_PIPELINE") {
        config.pipeline.selected = selected;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;
    use std::path::PathBuf;

    use super::{
        apply_env_overrides, load_config_from_path, parse_config, resolve_config_path,
        ConfigError, CONFIG_PATH_ENV,
    };
    use crate::AppConfig;

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let config = parse_config(
            r#"
            [dataset]
            root_dir = "/data/speech"
            chunk_size = 4096

            [pipeline.plugins.label_padding]
            max_word_length = 32
            padding_value = -1
            "#,
        )
        .expect("parse");

        assert_eq!(config.dataset.root_dir, PathBuf::from("/data/speech"));
        assert_eq!(config.dataset.chunk_size, 4096);
        assert_eq!(config.dataset.name, "LJSpeech-1.1");
        assert_eq!(config.pipeline.plugins.label_padding.max_word_length, 32);
        assert_eq!(config.pipeline.plugins.label_padding.padding_value, Some(-1));
        assert_eq!(
            config
                .pipeline
                .plugins
                .spectrogram_padding
                .max_spectrogram_length,
            1392
        );
    }

    #[test]
    fn custom_pipeline_definitions_accept_both_step_forms() {
        let config = parse_config(
            r#"
            [pipeline]
            selected = "labels-only"

            [pipeline.definitions.labels-only]
            steps = ["label_indexer", { name = "label_padding" }]
            "#,
        )
        .expect("parse");

        let steps: Vec<&str> = config.pipeline.definitions["labels-only"]
            .steps
            .iter()
            .map(|step| step.name())
            .collect();
        assert_eq!(steps, vec!["label_indexer", "label_padding"]);
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = AppConfig::default();
        let vars = HashMap::from([
            ("SPEECHPREP_LOG_LEVEL", "debug"),
            ("SPEECHPREP_DATASET_ROOT", "/mnt/datasets"),
            ("SPEECHPREP_PIPELINE", "custom"),
        ]);

        apply_env_overrides(&mut config, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.dataset.root_dir, PathBuf::from("/mnt/datasets"));
        assert_eq!(config.pipeline.selected, "custom");
        assert_eq!(config.dataset.name, "LJSpeech-1.1");
    }

    #[test]
    fn malformed_file_reports_parse_error_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[dataset\nchunk_size = ").expect("write config");

        let err = load_config_from_path(&path).expect_err("must fail");

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");

        let err = load_config_from_path(&dir.path().join("absent.toml")).expect_err("must fail");

        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn explicit_config_path_wins_over_run_env_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("production.toml"), "").expect("write config");
        let vars = HashMap::from([
            (CONFIG_PATH_ENV, "/etc/speechprep/custom.toml"),
            ("RUN_ENV", "production"),
        ]);

        let path = resolve_config_path(dir.path(), |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(path, Some(PathBuf::from("/etc/speechprep/custom.toml")));
    }

    #[test]
    fn run_env_selects_file_in_config_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("development.toml"), "").expect("write config");
        fs::write(dir.path().join("production.toml"), "").expect("write config");
        let vars = HashMap::from([("RUN_ENV", "production")]);

        let path = resolve_config_path(dir.path(), |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(path, Some(dir.path().join("production.toml")));
    }

    #[test]
    fn run_env_defaults_to_development() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("development.toml"), "").expect("write config");

        let path = resolve_config_path(dir.path(), |_| None);

        assert_eq!(path, Some(dir.path().join("development.toml")));
    }

    #[test]
    fn missing_env_file_falls_back_to_builtin_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let vars = HashMap::from([("RUN_ENV", "staging")]);

        let path = resolve_config_path(dir.path(), |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(path, None);
    }
}
