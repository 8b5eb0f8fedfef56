//! Subcommand implementations
//!
//! Each command returns the text to print, or a message for stderr. `main` owns the process
//! exit code.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::io::Read;
use textpipe_config::TextpipeConfig;
use textpipe_engine::{
    export_json, import_json, Category, OperationId, OperationRegistry, PipelineAction,
    PipelineExecutor, TransformationPipeline,
};

pub struct ApplyArgs<'a> {
    pub export_file: &'a str,
    pub pipeline: &'a str,
    pub input: Option<&'a str>,
    pub seed: Option<u64>,
}

/// Run one pipeline from an export file over a file or stdin
pub fn apply(config: &TextpipeConfig, args: ApplyArgs<'_>) -> Result<String, String> {
    let pipelines = load_export(args.export_file)?;
    let pipeline = find_pipeline(&pipelines, args.pipeline).ok_or_else(|| {
        let names: Vec<&str> = pipelines.iter().map(|p| p.name.as_str()).collect();
        format!(
            "No pipeline named '{}' in {} (available: {})",
            args.pipeline,
            args.export_file,
            names.join(", ")
        )
    })?;
    pipeline
        .validate(PipelineAction::Apply)
        .map_err(|e| e.to_string())?;

    let text = read_input(args.input)?;
    let executor = PipelineExecutor::with_settings(config.engine_settings());
    let output = match args.seed.or(config.engine.shuffle_seed) {
        Some(seed) => {
            log::debug!("seeding shuffle with {}", seed);
            executor.apply_with_rng(&text, pipeline, &mut StdRng::seed_from_u64(seed))
        }
        None => executor.apply(&text, pipeline),
    };
    Ok(output)
}

/// Catalog listing, grouped by category
pub fn list_operations(category: Option<&str>) -> Result<String, String> {
    let categories = match category {
        Some(name) => vec![name.parse::<Category>()?],
        None => Category::ALL.to_vec(),
    };

    let registry = OperationRegistry::global();
    let mut out = String::new();
    for category in categories {
        out.push_str(&format!("{}:\n", category));
        for definition in registry.by_category(category) {
            out.push_str(&format!(
                "  {:<18} {}\n",
                definition.id.as_str(),
                definition.description
            ));
        }
        out.push('\n');
    }
    Ok(out)
}

/// Check an export file and summarize what it holds
pub fn validate(path: &str) -> Result<String, String> {
    let pipelines = load_export(path)?;
    let mut out = format!("{}: {} pipeline(s)\n", path, pipelines.len());
    for pipeline in &pipelines {
        let enabled = pipeline.enabled_steps().count();
        out.push_str(&format!(
            "  {} {} ({} steps, {} enabled)\n",
            pipeline.icon,
            pipeline.name,
            pipeline.steps.len(),
            enabled
        ));
    }
    Ok(out)
}

pub struct NewArgs<'a> {
    pub name: &'a str,
    pub steps: Vec<&'a str>,
    pub icon: Option<&'a str>,
}

/// Export envelope with one pipeline built from default step configs
pub fn new_pipeline(config: &TextpipeConfig, args: NewArgs<'_>) -> Result<String, String> {
    let mut builder = TransformationPipeline::builder()
        .name(args.name)
        .default_icon(config.pipeline.default_icon.as_str());
    if let Some(icon) = args.icon {
        builder = builder.icon(icon);
    }
    for step in args.steps {
        let operation = step.parse::<OperationId>().map_err(|e| e.to_string())?;
        builder = builder.step(operation);
    }

    let pipeline = builder.build().map_err(|e| e.to_string())?;
    pipeline
        .validate(PipelineAction::Save)
        .map_err(|e| e.to_string())?;
    export_json(&[pipeline], config.export.pretty).map_err(|e| e.to_string())
}

fn load_export(path: &str) -> Result<Vec<TransformationPipeline>, String> {
    let json =
        fs::read_to_string(path).map_err(|e| format!("Could not read {}: {}", path, e))?;
    import_json(&json).map_err(|e| format!("{}: {}", path, e))
}

/// Match by id first, then by name ignoring case and surrounding whitespace
fn find_pipeline<'a>(
    pipelines: &'a [TransformationPipeline],
    key: &str,
) -> Option<&'a TransformationPipeline> {
    let key = key.trim();
    pipelines
        .iter()
        .find(|p| p.id == key)
        .or_else(|| pipelines.iter().find(|p| p.name.trim().eq_ignore_ascii_case(key)))
}

fn read_input(path: Option<&str>) -> Result<String, String> {
    match path {
        Some("-") | None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("Could not read stdin: {}", e))?;
            Ok(text)
        }
        Some(path) => {
            fs::read_to_string(path).map_err(|e| format!("Could not read {}: {}", path, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipelines() -> Vec<TransformationPipeline> {
        ["Tidy", "Shout"]
            .iter()
            .map(|name| {
                TransformationPipeline::builder()
                    .name(*name)
                    .step(OperationId::Trim)
                    .build()
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_find_pipeline_by_id_or_name() {
        let all = pipelines();
        assert_eq!(find_pipeline(&all, &all[1].id).unwrap().name, "Shout");
        assert_eq!(find_pipeline(&all, " tidy ").unwrap().name, "Tidy");
        assert!(find_pipeline(&all, "missing").is_none());
    }

    #[test]
    fn test_list_operations_filters_by_category() {
        let listing = list_operations(Some("data")).unwrap();
        assert!(listing.starts_with("Data:\n"));
        assert!(listing.contains("encode-decode"));
        assert!(!listing.contains("trim"));
        assert_eq!(
            list_operations(Some("misc")).unwrap_err(),
            "Unknown category 'misc'"
        );
    }

    #[test]
    fn test_new_pipeline_rejects_unknown_operation() {
        let config = textpipe_config::load_defaults().unwrap();
        let err = new_pipeline(
            &config,
            NewArgs {
                name: "X",
                steps: vec!["trim", "explode"],
                icon: None,
            },
        )
        .unwrap_err();
        assert_eq!(err, "Unknown operation 'explode'");
    }

    #[test]
    fn test_new_pipeline_needs_steps() {
        let config = textpipe_config::load_defaults().unwrap();
        let err = new_pipeline(
            &config,
            NewArgs {
                name: "X",
                steps: Vec::new(),
                icon: None,
            },
        )
        .unwrap_err();
        assert_eq!(err, "Add at least one step before saving");
    }
}
