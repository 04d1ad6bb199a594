mod fetch_dataset;

pub use fetch_dataset::{FetchDatasetRequest, FetchDatasetResponse};
