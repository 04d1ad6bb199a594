use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use speechprep_application::{
    PipelineDefinition, PipelineStepLoader, PipelineStepSpec, TransformPipeline,
};
use speechprep_configuration::{AppConfig, PipelineDefinitionConfig, PipelineStepRef};
use speechprep_domain::{DomainError, Transform, Vocabulary};
use speechprep_infra_transforms::{LabelIndexer, LabelPadding, SpectrogramPadding};

pub trait PipelineStepPlugin: Send + Sync {
    fn name(&self) -> &'static str;
    fn build(&self, config: &AppConfig) -> Result<Arc<dyn Transform>>;
}

pub struct PipelinePluginLoader {
    config: AppConfig,
    plugins: HashMap<String, Arc<dyn PipelineStepPlugin>>,
}

impl PipelinePluginLoader {
    pub fn new(config: AppConfig) -> Self {
        let mut loader = Self {
            config,
            plugins: HashMap::new(),
        };
        loader.register_builtin_plugins();
        loader
    }

    pub fn register_plugin(&mut self, plugin: Arc<dyn PipelineStepPlugin>) {
        self.plugins.insert(plugin.name().to_string(), plugin);
    }

    pub fn build_pipeline(&self) -> Result<TransformPipeline> {
        let definition = resolve_pipeline_definition(&self.config)?;
        let runtime_definition = to_runtime_definition(&definition)?;
        TransformPipeline::from_definition(&runtime_definition, self)
            .map_err(|err| anyhow!("failed to build transform pipeline: {err}"))
    }

    fn register_builtin_plugins(&mut self) {
        self.register_plugin(Arc::new(LabelIndexerPlugin));
        self.register_plugin(Arc::new(LabelPaddingPlugin));
        self.register_plugin(Arc::new(SpectrogramPaddingPlugin));
    }
}

impl PipelineStepLoader for PipelinePluginLoader {
    fn load_step(&self, step: &PipelineStepSpec) -> Result<Arc<dyn Transform>, DomainError> {
        let plugin = self.plugins.get(step.name.as_str()).ok_or_else(|| {
            DomainError::pipeline(format!("unknown pipeline step plugin `{}`", step.name))
        })?;

        plugin.build(&self.config).map_err(|err| {
            DomainError::pipeline(format!(
                "failed to build pipeline step `{}`: {err}",
                step.name
            ))
        })
    }
}

fn resolve_pipeline_definition(config: &AppConfig) -> Result<PipelineDefinitionConfig> {
    let selected = config.pipeline.selected.trim();
    if selected.is_empty() {
        return Err(anyhow!("`pipeline.selected` cannot be empty"));
    }
    config
        .pipeline
        .definitions
        .get(selected)
        .cloned()
        .ok_or_else(|| anyhow!("pipeline `{selected}` not found in `pipeline.definitions`"))
}

fn to_runtime_definition(config: &PipelineDefinitionConfig) -> Result<PipelineDefinition> {
    let steps = config
        .steps
        .iter()
        .map(to_step_spec)
        .collect::<Result<Vec<_>>>()?;
    Ok(PipelineDefinition::new(steps))
}

fn to_step_spec(step: &PipelineStepRef) -> Result<PipelineStepSpec> {
    let name = step.name().trim();
    if name.is_empty() {
        return Err(anyhow!("pipeline step name cannot be empty"));
    }
    Ok(PipelineStepSpec::new(name.to_string()))
}

fn load_vocabulary(config: &AppConfig) -> Result<Vocabulary> {
    Vocabulary::from_chars(&config.pipeline.plugins.label_indexer.vocab)
        .map_err(|err| anyhow!("invalid `pipeline.plugins.label_indexer.vocab`: {err}"))
}

struct LabelIndexerPlugin;

impl PipelineStepPlugin for LabelIndexerPlugin {
    fn name(&self) -> &'static str {
        "label_indexer"
    }

    fn build(&self, config: &AppConfig) -> Result<Arc<dyn Transform>> {
        let vocab = load_vocabulary(config)?;
        Ok(Arc::new(LabelIndexer::new(Arc::new(vocab))))
    }
}

struct LabelPaddingPlugin;

impl PipelineStepPlugin for LabelPaddingPlugin {
    fn name(&self) -> &'static str {
        "label_padding"
    }

    fn build(&self, config: &AppConfig) -> Result<Arc<dyn Transform>> {
        let padding = &config.pipeline.plugins.label_padding;
        let padding_value = match padding.padding_value {
            Some(value) => value,
            None => load_vocabulary(config)?.len() as i64,
        };
        Ok(Arc::new(LabelPadding::new(
            padding.max_word_length,
            padding_value,
        )))
    }
}

struct SpectrogramPaddingPlugin;

impl PipelineStepPlugin for SpectrogramPaddingPlugin {
    fn name(&self) -> &'static str {
        "spectrogram_padding"
    }

    fn build(&self, config: &AppConfig) -> Result<Arc<dyn Transform>> {
        let padding = &config.pipeline.plugins.spectrogram_padding;
        Ok(Arc::new(SpectrogramPadding::new(
            padding.max_spectrogram_length,
            padding.padding_value,
        )))
    }
}
