use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Error};
use speechprep_application::{
    FetchDatasetRequest, FetchDatasetResponse, FetchDatasetUseCase, FetchDatasetUseCaseImpl,
    TransformPipeline,
};
use speechprep_configuration::AppConfig;
use speechprep_domain::{ArchiveExtractor, ArchiveSource};
use speechprep_infra_dataset::{Bzip2TarExtractor, HttpArchiveSource};

use crate::pipeline_loader::PipelinePluginLoader;

pub fn build_and_run(config: AppConfig) -> Result<FetchDatasetResponse, Error> {
    let app = Application::new(config)?;
    app.prepare_dataset()
}

pub struct Application {
    pub config: AppConfig,
    pub fetch_dataset: Arc<dyn FetchDatasetUseCase>,
    pub pipeline: TransformPipeline,
}

impl Application {
    pub fn new(config: AppConfig) -> Result<Self, Error> {
        tracing::info!(
            dataset_url = %config.dataset.url,
            destination = %config.dataset.destination().display(),
            chunk_size = config.dataset.chunk_size,
            require_completion_marker = config.dataset.require_completion_marker,
            pipeline_selected = %config.pipeline.selected,
            "initializing speech dataset preparation"
        );

        let source: Arc<dyn ArchiveSource> = Arc::new(HttpArchiveSource::new(
            config.dataset.timeout_secs.map(Duration::from_secs),
        )?);
        let extractor: Arc<dyn ArchiveExtractor> = Arc::new(Bzip2TarExtractor::new());
        let fetch_dataset: Arc<dyn FetchDatasetUseCase> = Arc::new(FetchDatasetUseCaseImpl::new(
            source,
            extractor,
            config.dataset.require_completion_marker,
        ));

        let pipeline = PipelinePluginLoader::new(config.clone()).build_pipeline()?;
        tracing::info!(stages = ?pipeline.stage_names(), "transform pipeline ready");

        Ok(Self {
            config,
            fetch_dataset,
            pipeline,
        })
    }

    pub fn prepare_dataset(&self) -> Result<FetchDatasetResponse, Error> {
        let dataset = &self.config.dataset;
        let request = FetchDatasetRequest {
            url: dataset.url.clone(),
            destination: dataset.destination(),
            extract_to: Some(dataset.root_dir.clone()),
            chunk_size: dataset.chunk_size,
        };

        self.fetch_dataset
            .fetch(request)
            .map_err(|err| anyhow!("dataset preparation failed: {err}"))
    }

    pub fn pipeline(&self) -> &TransformPipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use speechprep_application::COMPLETION_MARKER;
    use speechprep_configuration::AppConfig;
    use speechprep_domain::FetchOutcome;

    use super::{build_and_run, Application};

    #[test]
    fn complete_dataset_is_not_downloaded_again() {
        let root = tempfile::tempdir().expect("tempdir");
        let mut config = AppConfig::default();
        config.dataset.root_dir = root.path().to_path_buf();
        config.dataset.url = "http://127.0.0.1:9/unreachable.tar.bz2".to_string();
        let destination = config.dataset.destination();
        fs::create_dir_all(&destination).expect("dataset dir");
        fs::write(destination.join(COMPLETION_MARKER), b"").expect("marker");

        let app = Application::new(config).expect("application");
        let response = app.prepare_dataset().expect("prepare");

        assert_eq!(response.outcome, FetchOutcome::AlreadyPresent);
        assert_eq!(response.extract_to, root.path());
    }

    #[test]
    fn unreachable_host_surfaces_as_error() {
        let root = tempfile::tempdir().expect("tempdir");
        let mut config = AppConfig::default();
        config.dataset.root_dir = root.path().to_path_buf();
        config.dataset.url = "http://127.0.0.1:9/unreachable.tar.bz2".to_string();

        let app = Application::new(config).expect("application");
        let err = app.prepare_dataset().expect_err("must fail");

        assert!(err.to_string().contains("dataset preparation failed"));
        assert!(!app.config.dataset.destination().join(COMPLETION_MARKER).exists());
    }

    #[test]
    fn application_exposes_configured_pipeline() {
        let app = Application::new(AppConfig::default()).expect("application");

        assert_eq!(app.pipeline().len(), 3);
    }

    #[test]
    fn build_and_run_skips_a_complete_dataset() {
        let root = tempfile::tempdir().expect("tempdir");
        let mut config = AppConfig::default();
        config.dataset.root_dir = root.path().to_path_buf();
        config.dataset.url = "http://127.0.0.1:9/unreachable.tar.bz2".to_string();
        let destination = config.dataset.destination();
        fs::create_dir_all(&destination).expect("dataset dir");
        fs::write(destination.join(COMPLETION_MARKER), b"").expect("marker");

        let response = build_and_run(config).expect("run");

        assert_eq!(response.destination, destination);
        assert_eq!(response.outcome, FetchOutcome::AlreadyPresent);
    }
}
