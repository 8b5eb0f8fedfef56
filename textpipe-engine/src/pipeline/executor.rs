//! Pipeline reducer
//!
//! Folds the steps of a pipeline over the input text, left to right. A disabled step, or a
//! step whose operation has no executor, leaves the text untouched.

use super::{PipelineStep, TransformationPipeline};
use crate::operations::{ExecutionContext, ExecutorRegistry};
use crate::settings::EngineSettings;
use once_cell::sync::Lazy;
use rand::RngCore;

static DEFAULT_EXECUTOR: Lazy<PipelineExecutor> = Lazy::new(PipelineExecutor::new);

/// Apply a pipeline with the built-in operations and default settings
///
/// `shuffle-lines` draws from the thread local generator; use
/// [`PipelineExecutor::apply_with_rng`] for reproducible output.
pub fn apply_pipeline(text: &str, pipeline: &TransformationPipeline) -> String {
    DEFAULT_EXECUTOR.apply(text, pipeline)
}

pub struct PipelineExecutor {
    registry: ExecutorRegistry,
    settings: EngineSettings,
}

impl PipelineExecutor {
    pub fn new() -> Self {
        PipelineExecutor {
            registry: ExecutorRegistry::with_defaults(),
            settings: EngineSettings::default(),
        }
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        PipelineExecutor {
            registry: ExecutorRegistry::with_defaults(),
            settings,
        }
    }

    pub fn with_registry(registry: ExecutorRegistry, settings: EngineSettings) -> Self {
        PipelineExecutor { registry, settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn apply(&self, text: &str, pipeline: &TransformationPipeline) -> String {
        self.apply_with_rng(text, pipeline, &mut rand::thread_rng())
    }

    pub fn apply_with_rng(
        &self,
        text: &str,
        pipeline: &TransformationPipeline,
        rng: &mut dyn RngCore,
    ) -> String {
        log::debug!(
            "applying pipeline '{}' ({} steps)",
            pipeline.name,
            pipeline.steps.len()
        );
        pipeline
            .steps
            .iter()
            .fold(text.to_string(), |acc, step| self.apply_step(&acc, step, rng))
    }

    /// Run a single step; returns the input unchanged when the step is skipped
    pub fn apply_step(&self, text: &str, step: &PipelineStep, rng: &mut dyn RngCore) -> String {
        if !step.enabled {
            log::debug!("skipping disabled step {} ({})", step.id, step.operation_id);
            return text.to_string();
        }
        let mut ctx = ExecutionContext::new(&self.settings, rng);
        match self
            .registry
            .execute(step.operation_id, text, &step.config, &mut ctx)
        {
            Some(output) => {
                log::debug!("applied step {} ({})", step.id, step.operation_id);
                output
            }
            None => {
                log::debug!(
                    "skipping step {}: no executor for {}",
                    step.id,
                    step.operation_id
                );
                text.to_string()
            }
        }
    }
}

impl Default for PipelineExecutor {
    fn default() -> Self {
        Self::new()
    }
}
