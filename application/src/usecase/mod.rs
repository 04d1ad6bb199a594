mod fetch_dataset;

pub use fetch_dataset::{FetchDatasetUseCase, FetchDatasetUseCaseImpl, COMPLETION_MARKER};
