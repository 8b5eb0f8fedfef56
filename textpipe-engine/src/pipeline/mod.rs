//! Pipeline model
//!
//! A [`TransformationPipeline`] is a named, ordered list of [`PipelineStep`]s. List order is
//! execution order. Every editing operation here is pure: it takes the pipeline by reference
//! and returns a new value, leaving storage of the result to the caller.
//!
//! Editing an unknown step id, or reordering with an out of range index, returns an unchanged
//! copy.

pub mod executor;
pub mod validation;

use crate::error::ValidationError;
use crate::operation::OperationId;
use crate::operations::config::{ConfigMap, StepConfig};
use crate::registry::OperationRegistry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Icon given to pipelines created without one
pub const DEFAULT_PIPELINE_ICON: &str = "🪄";

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// One configured operation inside a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStep {
    pub id: String,
    pub operation_id: OperationId,
    /// Free-form: keys the operation does not know are kept but ignored
    pub config: ConfigMap,
    pub enabled: bool,
}

impl PipelineStep {
    /// A fresh, enabled step with a copy of the operation's default config
    pub fn new(operation: OperationId) -> Self {
        let config = OperationRegistry::global()
            .lookup(operation)
            .map(|definition| definition.default_config.clone())
            .unwrap_or_default();
        PipelineStep {
            id: fresh_id(),
            operation_id: operation,
            config,
            enabled: true,
        }
    }

    /// The config as its typed variant
    pub fn typed_config(&self) -> StepConfig {
        StepConfig::parse(self.operation_id, &self.config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationPipeline {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub steps: Vec<PipelineStep>,
}

impl TransformationPipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn step(&self, step_id: &str) -> Option<&PipelineStep> {
        self.steps.iter().find(|step| step.id == step_id)
    }

    /// Steps that will run, in execution order
    pub fn enabled_steps(&self) -> impl Iterator<Item = &PipelineStep> {
        self.steps.iter().filter(|step| step.enabled)
    }

    /// Append a new step for `operation`
    pub fn add_step(&self, operation: OperationId) -> TransformationPipeline {
        let mut next = self.clone();
        next.steps.push(PipelineStep::new(operation));
        next
    }

    /// Replace the whole config of one step
    pub fn update_step_config(&self, step_id: &str, config: ConfigMap) -> TransformationPipeline {
        self.map_step(step_id, |step| step.config = config)
    }

    pub fn toggle_step(&self, step_id: &str) -> TransformationPipeline {
        self.map_step(step_id, |step| step.enabled = !step.enabled)
    }

    pub fn set_step_enabled(&self, step_id: &str, enabled: bool) -> TransformationPipeline {
        self.map_step(step_id, |step| step.enabled = enabled)
    }

    pub fn remove_step(&self, step_id: &str) -> TransformationPipeline {
        let mut next = self.clone();
        next.steps.retain(|step| step.id != step_id);
        next
    }

    /// Move the step at `from` so that it ends up at index `to`
    pub fn reorder_steps(&self, from: usize, to: usize) -> TransformationPipeline {
        let mut next = self.clone();
        if from < next.steps.len() && to < next.steps.len() {
            let step = next.steps.remove(from);
            next.steps.insert(to, step);
        }
        next
    }

    fn map_step<F>(&self, step_id: &str, f: F) -> TransformationPipeline
    where
        F: FnOnce(&mut PipelineStep),
    {
        let mut next = self.clone();
        if let Some(step) = next.steps.iter_mut().find(|step| step.id == step_id) {
            f(step);
        }
        next
    }
}

/// Builder for new pipelines
///
/// `build` requires a non blank name, generates an id when none was given and falls back to
/// the default icon when the icon is blank.
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    id: Option<String>,
    name: String,
    icon: String,
    default_icon: Option<String>,
    steps: Vec<PipelineStep>,
}

impl PipelineBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Icon used when none is set, instead of [`DEFAULT_PIPELINE_ICON`]
    pub fn default_icon(mut self, icon: impl Into<String>) -> Self {
        self.default_icon = Some(icon.into());
        self
    }

    /// Append a step created from the operation's defaults
    pub fn step(mut self, operation: OperationId) -> Self {
        self.steps.push(PipelineStep::new(operation));
        self
    }

    /// Append a step created from the operation's defaults with `config` merged on top
    pub fn step_with(mut self, operation: OperationId, config: ConfigMap) -> Self {
        let mut step = PipelineStep::new(operation);
        step.config.extend(config);
        self.steps.push(step);
        self
    }

    pub fn build(self) -> Result<TransformationPipeline, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        let icon = if self.icon.trim().is_empty() {
            self.default_icon
                .filter(|icon| !icon.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PIPELINE_ICON.to_string())
        } else {
            self.icon
        };

        Ok(TransformationPipeline {
            id: self
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(fresh_id),
            name: name.to_string(),
            icon,
            steps: self.steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> TransformationPipeline {
        TransformationPipeline::builder()
            .name("Tidy")
            .step(OperationId::Trim)
            .step(OperationId::SortLines)
            .step(OperationId::DedupeLines)
            .build()
            .unwrap()
    }

    fn ids(pipeline: &TransformationPipeline) -> Vec<OperationId> {
        pipeline.steps.iter().map(|s| s.operation_id).collect()
    }

    #[test]
    fn test_builder_defaults() {
        let pipeline = TransformationPipeline::builder()
            .name("  My pipeline ")
            .build()
            .unwrap();
        assert_eq!(pipeline.name, "My pipeline");
        assert_eq!(pipeline.icon, DEFAULT_PIPELINE_ICON);
        assert!(!pipeline.id.is_empty());
        assert!(pipeline.steps.is_empty());
    }

    #[test]
    fn test_builder_keeps_explicit_values() {
        let pipeline = TransformationPipeline::builder()
            .id("p1")
            .name("X")
            .icon("🔤")
            .default_icon("🧹")
            .build()
            .unwrap();
        assert_eq!(pipeline.id, "p1");
        assert_eq!(pipeline.icon, "🔤");

        let fallback = TransformationPipeline::builder()
            .name("X")
            .default_icon("🧹")
            .build()
            .unwrap();
        assert_eq!(fallback.icon, "🧹");
    }

    #[test]
    fn test_builder_requires_name() {
        assert_eq!(
            TransformationPipeline::builder().name("   ").build(),
            Err(ValidationError::MissingName)
        );
    }

    #[test]
    fn test_builder_step_with_merges_over_defaults() {
        let config = match json!({ "mode": "lower", "extra": 1 }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let pipeline = TransformationPipeline::builder()
            .name("X")
            .step_with(OperationId::ChangeCase, config)
            .build()
            .unwrap();
        let step = &pipeline.steps[0];
        assert_eq!(step.config.get("mode"), Some(&json!("lower")));
        assert_eq!(step.config.get("lines"), Some(&json!(true)));
        assert_eq!(step.config.get("extra"), Some(&json!(1)));
    }

    #[test]
    fn test_new_step_copies_defaults() {
        let step = PipelineStep::new(OperationId::NumberLines);
        assert!(step.enabled);
        assert_eq!(step.config.get("start"), Some(&json!(1)));
        assert_eq!(step.config.get("separator"), Some(&json!(". ")));
        assert_eq!(step.typed_config(), StepConfig::default_for(OperationId::NumberLines));
    }

    #[test]
    fn test_step_ids_are_unique() {
        let pipeline = sample().add_step(OperationId::Trim);
        let mut ids: Vec<&str> = pipeline.steps.iter().map(|s| s.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_add_step_appends_and_leaves_original() {
        let original = sample();
        let next = original.add_step(OperationId::Quote);
        assert_eq!(original.steps.len(), 3);
        assert_eq!(next.steps.len(), 4);
        assert_eq!(next.steps[3].operation_id, OperationId::Quote);
    }

    #[test]
    fn test_update_step_config() {
        let pipeline = sample();
        let id = pipeline.steps[1].id.clone();
        let config = match json!({ "direction": "desc" }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let next = pipeline.update_step_config(&id, config.clone());
        assert_eq!(next.step(&id).unwrap().config, config);
        assert_eq!(pipeline.update_step_config("missing", config), pipeline);
    }

    #[test]
    fn test_toggle_and_enabled_steps() {
        let pipeline = sample();
        let id = pipeline.steps[0].id.clone();
        let toggled = pipeline.toggle_step(&id);
        assert!(!toggled.step(&id).unwrap().enabled);
        assert_eq!(toggled.enabled_steps().count(), 2);
        assert_eq!(toggled.toggle_step(&id), pipeline);
        assert_eq!(pipeline.set_step_enabled(&id, true), pipeline);
    }

    #[test]
    fn test_remove_step() {
        let pipeline = sample();
        let id = pipeline.steps[1].id.clone();
        let next = pipeline.remove_step(&id);
        assert_eq!(ids(&next), vec![OperationId::Trim, OperationId::DedupeLines]);
        assert_eq!(pipeline.remove_step("missing"), pipeline);
    }

    #[test]
    fn test_reorder_steps() {
        let pipeline = sample();
        assert_eq!(
            ids(&pipeline.reorder_steps(0, 2)),
            vec![OperationId::SortLines, OperationId::DedupeLines, OperationId::Trim]
        );
        assert_eq!(
            ids(&pipeline.reorder_steps(2, 0)),
            vec![OperationId::DedupeLines, OperationId::Trim, OperationId::SortLines]
        );
        assert_eq!(pipeline.reorder_steps(0, 3), pipeline);
        assert_eq!(pipeline.reorder_steps(1, 1), pipeline);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let pipeline = TransformationPipeline::builder()
            .id("p")
            .name("N")
            .icon("i")
            .build()
            .unwrap()
            .add_step(OperationId::ReverseLines);
        let value = serde_json::to_value(&pipeline).unwrap();
        let step = &value["steps"][0];
        assert_eq!(step["operationId"], json!("reverse-lines"));
        assert_eq!(step["enabled"], json!(true));
        assert!(step["config"].is_object());
    }
}
