use std::path::Path;

use crate::{ArchiveDownload, ArchiveDownloadRequest, DomainError, Sample};

pub trait Transform: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, sample: Sample) -> Result<Sample, DomainError>;
}

pub trait ArchiveSource: Send + Sync {
    fn download(&self, request: &ArchiveDownloadRequest) -> Result<ArchiveDownload, DomainError>;
}

pub trait ArchiveExtractor: Send + Sync {
    fn extract(&self, archive: &[u8], extract_to: &Path) -> Result<(), DomainError>;
}
