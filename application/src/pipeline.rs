use std::sync::Arc;

use speechprep_domain::{DomainError, Sample, Transform};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStepSpec {
    pub name: String,
}

impl PipelineStepSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineDefinition {
    pub steps: Vec<PipelineStepSpec>,
}

impl PipelineDefinition {
    pub fn new(steps: Vec<PipelineStepSpec>) -> Self {
        Self { steps }
    }
}

pub trait PipelineStepLoader: Send + Sync {
    fn load_step(&self, step: &PipelineStepSpec) -> Result<Arc<dyn Transform>, DomainError>;
}

/// Ordered chain of per-sample transforms.
///
/// Stages run in insertion order. Anything that shortens a label must come
/// before the stage that pads it.
#[derive(Default, Clone)]
pub struct TransformPipeline {
    stages: Vec<Arc<dyn Transform>>,
}

impl TransformPipeline {
    pub fn new(stages: Vec<Arc<dyn Transform>>) -> Self {
        Self { stages }
    }

    pub fn push_stage(&mut self, stage: Arc<dyn Transform>) {
        self.stages.push(stage);
    }

    pub fn from_definition(
        definition: &PipelineDefinition,
        loader: &dyn PipelineStepLoader,
    ) -> Result<Self, DomainError> {
        let mut stages = Vec::with_capacity(definition.steps.len());
        for step in &definition.steps {
            stages.push(loader.load_step(step)?);
        }
        Ok(Self::new(stages))
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn run(&self, sample: Sample) -> Result<Sample, DomainError> {
        let mut sample = sample;
        for stage in &self.stages {
            tracing::trace!("executing stage={}", stage.name());
            sample = stage.apply(sample).map_err(|err| {
                tracing::debug!(stage = stage.name(), error = %err, "transform failed");
                err
            })?;
        }
        Ok(sample)
    }

    pub fn run_all<I>(&self, samples: I) -> Result<Vec<Sample>, DomainError>
    where
        I: IntoIterator<Item = Sample>,
    {
        samples.into_iter().map(|sample| self.run(sample)).collect()
    }
}
