use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

use speechprep_domain::FetchOutcome;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FetchDatasetRequest {
    #[validate(url)]
    pub url: String,
    pub destination: PathBuf,
    /// Where archive members are unpacked. Defaults to `destination`.
    pub extract_to: Option<PathBuf>,
    #[validate(range(min = 1))]
    pub chunk_size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchDatasetResponse {
    pub destination: PathBuf,
    pub extract_to: PathBuf,
    pub outcome: FetchOutcome,
}
