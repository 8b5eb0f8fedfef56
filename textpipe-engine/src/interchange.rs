//! Import and export of saved pipelines
//!
//! Pipelines travel in a versioned envelope:
//!
//! ```json
//! { "version": 1, "exportedAt": "2024-05-01T12:00:00.000Z", "pipelines": [ ... ] }
//! ```
//!
//! Import is strict. The file must be JSON ([`InterchangeError::InvalidJson`] otherwise) and
//! must match the envelope exactly: same version, a parseable timestamp, every step with its
//! `id`, a known `operationId`, an object `config` and a boolean `enabled`, and no step id
//! used twice within a pipeline. Any violation rejects the whole file with
//! [`InterchangeError::InvalidFormat`].

use crate::error::InterchangeError;
use crate::pipeline::TransformationPipeline;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Envelope version written by this build and the only one accepted on import
pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarExport {
    pub version: u32,
    /// ISO-8601 timestamp
    pub exported_at: String,
    pub pipelines: Vec<TransformationPipeline>,
}

impl ToolbarExport {
    /// Wrap pipelines in an envelope stamped with the current time
    pub fn new(pipelines: Vec<TransformationPipeline>) -> Self {
        ToolbarExport {
            version: CURRENT_VERSION,
            exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            pipelines,
        }
    }

    pub fn exported_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.exported_at)
    }
}

pub fn export_json(
    pipelines: &[TransformationPipeline],
    pretty: bool,
) -> Result<String, InterchangeError> {
    let envelope = ToolbarExport::new(pipelines.to_vec());
    let json = if pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    Ok(json)
}

/// Parse and validate an export file, returning its pipelines
pub fn import_json(json: &str) -> Result<Vec<TransformationPipeline>, InterchangeError> {
    let value: Value = serde_json::from_str(json).map_err(|e| {
        log::warn!("import rejected, not JSON: {}", e);
        InterchangeError::InvalidJson
    })?;
    let envelope: ToolbarExport = serde_json::from_value(value).map_err(|e| {
        log::warn!("import rejected, envelope mismatch: {}", e);
        InterchangeError::InvalidFormat
    })?;

    if envelope.version != CURRENT_VERSION {
        log::warn!(
            "import rejected, version {} (expected {})",
            envelope.version,
            CURRENT_VERSION
        );
        return Err(InterchangeError::InvalidFormat);
    }
    if envelope.exported_at().is_none() {
        log::warn!("import rejected, bad timestamp {:?}", envelope.exported_at);
        return Err(InterchangeError::InvalidFormat);
    }
    for pipeline in &envelope.pipelines {
        let mut seen = HashSet::new();
        if let Some(step) = pipeline.steps.iter().find(|step| !seen.insert(&step.id)) {
            log::warn!(
                "import rejected, step id {} repeated in pipeline {}",
                step.id,
                pipeline.id
            );
            return Err(InterchangeError::InvalidFormat);
        }
    }

    Ok(envelope.pipelines)
}

/// RFC 3339, or the date-only and zone-less forms, read as UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
