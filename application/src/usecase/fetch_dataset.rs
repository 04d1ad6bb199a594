use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use validator::Validate;

use speechprep_domain::{
    ArchiveDownloadRequest, ArchiveExtractor, ArchiveSource, DomainError, FetchOutcome,
};

use crate::{ApplicationError, FetchDatasetRequest, FetchDatasetResponse};

/// Empty file written into the destination once extraction has finished.
pub const COMPLETION_MARKER: &str = ".speechprep-complete";

pub trait FetchDatasetUseCase: Send + Sync {
    fn fetch(&self, request: FetchDatasetRequest)
        -> Result<FetchDatasetResponse, ApplicationError>;
}

pub struct FetchDatasetUseCaseImpl {
    source: Arc<dyn ArchiveSource>,
    extractor: Arc<dyn ArchiveExtractor>,
    require_completion_marker: bool,
}

impl FetchDatasetUseCaseImpl {
    pub fn new(
        source: Arc<dyn ArchiveSource>,
        extractor: Arc<dyn ArchiveExtractor>,
        require_completion_marker: bool,
    ) -> Self {
        Self {
            source,
            extractor,
            require_completion_marker,
        }
    }

    fn is_present(&self, destination: &Path) -> bool {
        if !destination.exists() {
            return false;
        }
        !self.require_completion_marker || destination.join(COMPLETION_MARKER).is_file()
    }
}

impl FetchDatasetUseCase for FetchDatasetUseCaseImpl {
    fn fetch(
        &self,
        request: FetchDatasetRequest,
    ) -> Result<FetchDatasetResponse, ApplicationError> {
        request
            .validate()
            .map_err(|err| ApplicationError::Validation(err.to_string()))?;

        let FetchDatasetRequest {
            url,
            destination,
            extract_to,
            chunk_size,
        } = request;
        let extract_to = extract_to.unwrap_or_else(|| destination.clone());

        if self.is_present(&destination) {
            tracing::info!(
                destination = %destination.display(),
                "dataset already present, skipping download"
            );
            return Ok(FetchDatasetResponse {
                destination,
                extract_to,
                outcome: FetchOutcome::AlreadyPresent,
            });
        }

        if destination.exists() {
            tracing::warn!(
                destination = %destination.display(),
                marker = COMPLETION_MARKER,
                "dataset directory exists without completion marker, fetching again"
            );
        }

        tracing::info!(
            url = %url,
            destination = %destination.display(),
            extract_to = %extract_to.display(),
            chunk_size,
            "fetching dataset archive"
        );

        let download = self
            .source
            .download(&ArchiveDownloadRequest { url, chunk_size })?;
        let archive_bytes = download.bytes.len();

        self.extractor.extract(&download.bytes, &extract_to)?;
        if !destination.is_dir() {
            tracing::error!(
                destination = %destination.display(),
                extract_to = %extract_to.display(),
                "archive did not produce the dataset directory"
            );
            return Err(DomainError::decode(
                "locate extracted dataset",
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("archive did not produce {}", destination.display()),
                ),
            )
            .into());
        }
        write_completion_marker(&destination)?;

        tracing::info!(
            destination = %destination.display(),
            archive_bytes,
            "dataset fetched and extracted"
        );

        Ok(FetchDatasetResponse {
            destination,
            extract_to,
            outcome: FetchOutcome::Fetched { archive_bytes },
        })
    }
}

fn write_completion_marker(destination: &Path) -> Result<(), DomainError> {
    fs::write(destination.join(COMPLETION_MARKER), b"")
        .map_err(|err| DomainError::io("write completion marker", err))
}
