pub mod dto;
pub mod error;
pub mod pipeline;
pub mod usecase;

pub use dto::*;
pub use error::*;
pub use pipeline::{PipelineDefinition, PipelineStepLoader, PipelineStepSpec, TransformPipeline};
pub use usecase::{FetchDatasetUseCase, FetchDatasetUseCaseImpl, COMPLETION_MARKER};
