//! Checks run before a pipeline is saved or applied

use super::TransformationPipeline;
use crate::error::ValidationError;
use std::collections::HashSet;

/// What the user is about to do with a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineAction {
    Save,
    Apply,
    SaveAndApply,
}

impl PipelineAction {
    /// Gerund used in user facing messages
    pub fn verb(&self) -> &'static str {
        match self {
            PipelineAction::Save => "saving",
            PipelineAction::Apply => "applying",
            PipelineAction::SaveAndApply => "saving and applying",
        }
    }

    fn persists(&self) -> bool {
        matches!(self, PipelineAction::Save | PipelineAction::SaveAndApply)
    }
}

impl TransformationPipeline {
    /// Check that the pipeline is ready for `action`
    ///
    /// A name is only needed to persist; an unsaved pipeline can still be applied.
    pub fn validate(&self, action: PipelineAction) -> Result<(), ValidationError> {
        if action.persists() && self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.steps.is_empty() {
            return Err(ValidationError::NoSteps(action));
        }
        let mut seen = HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.id.as_str()) {
                return Err(ValidationError::DuplicateStepId(step.id.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationId;

    fn unnamed() -> TransformationPipeline {
        TransformationPipeline {
            id: "p".to_string(),
            name: " ".to_string(),
            icon: String::new(),
            steps: Vec::new(),
        }
    }

    #[test]
    fn test_name_is_checked_before_steps() {
        let pipeline = unnamed();
        assert_eq!(
            pipeline.validate(PipelineAction::Save),
            Err(ValidationError::MissingName)
        );
        assert_eq!(
            pipeline.validate(PipelineAction::SaveAndApply),
            Err(ValidationError::MissingName)
        );
    }

    #[test]
    fn test_apply_does_not_need_a_name() {
        let pipeline = unnamed();
        assert_eq!(
            pipeline.validate(PipelineAction::Apply),
            Err(ValidationError::NoSteps(PipelineAction::Apply))
        );
        assert_eq!(
            pipeline.add_step(OperationId::Trim).validate(PipelineAction::Apply),
            Ok(())
        );
    }

    #[test]
    fn test_empty_steps_message_per_action() {
        let mut pipeline = unnamed();
        pipeline.name = "Named".to_string();
        let messages: Vec<String> = [
            PipelineAction::Save,
            PipelineAction::Apply,
            PipelineAction::SaveAndApply,
        ]
        .iter()
        .map(|action| pipeline.validate(*action).unwrap_err().to_string())
        .collect();
        assert_eq!(
            messages,
            vec![
                "Add at least one step before saving",
                "Add at least one step before applying",
                "Add at least one step before saving and applying",
            ]
        );
    }

    #[test]
    fn test_duplicate_step_ids() {
        let mut pipeline = unnamed().add_step(OperationId::Trim).add_step(OperationId::Quote);
        pipeline.name = "Named".to_string();
        assert_eq!(pipeline.validate(PipelineAction::Save), Ok(()));

        pipeline.steps[1].id = pipeline.steps[0].id.clone();
        assert_eq!(
            pipeline.validate(PipelineAction::Save),
            Err(ValidationError::DuplicateStepId(pipeline.steps[0].id.clone()))
        );
    }
}
