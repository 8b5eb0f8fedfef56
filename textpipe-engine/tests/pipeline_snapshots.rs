//! Snapshot tests for multi-step pipelines on realistic editor selections

use serde_json::{json, Value};
use textpipe_engine::{apply_pipeline, ConfigMap, OperationId, TransformationPipeline};

fn pipeline(steps: &[(OperationId, Value)]) -> TransformationPipeline {
    let mut builder = TransformationPipeline::builder().name("snapshot");
    for (op, overrides) in steps {
        let config = match overrides {
            Value::Object(map) => map.clone(),
            _ => ConfigMap::new(),
        };
        builder = builder.step_with(*op, config);
    }
    builder.build().unwrap()
}

#[test]
fn test_clean_and_number_a_list() {
    let input = "  banana\n\ncherry  \napple\nBanana\n   \napple";
    let p = pipeline(&[
        (OperationId::Trim, json!({ "lines": true })),
        (OperationId::FilterLines, json!({})),
        (OperationId::DedupeLines, json!({ "caseSensitive": false })),
        (OperationId::SortLines, json!({})),
        (OperationId::NumberLines, json!({})),
    ]);
    insta::assert_snapshot!(apply_pipeline(input, &p), @r"
1. apple
2. banana
3. cherry
");
}

#[test]
fn test_markdown_bullets_from_csv() {
    let input = "red, green,blue";
    let p = pipeline(&[
        (OperationId::SplitLines, json!({ "separator": "," })),
        (OperationId::Trim, json!({ "lines": true })),
        (OperationId::ChangeCase, json!({ "mode": "title" })),
        (OperationId::WrapLines, json!({ "prefix": "- [ ] " })),
    ]);
    insta::assert_snapshot!(apply_pipeline(input, &p), @r"
- [ ] Red
- [ ] Green
- [ ] Blue
");
}

#[test]
fn test_table_column_alignment() {
    let input = "id\nname\ncreated_at";
    let p = pipeline(&[
        (OperationId::ChangeCase, json!({ "mode": "camel" })),
        (OperationId::PadAlign, json!({ "width": 12, "char": "." })),
        (OperationId::Quote, json!({ "char": "|" })),
    ]);
    insta::assert_snapshot!(apply_pipeline(input, &p), @r"
|id..........|
|name........|
|createdAt...|
");
}

#[test]
fn test_word_wrap_into_a_blockquote() {
    let input = "The quick brown fox jumps over the lazy dog near the riverbank.";
    let p = pipeline(&[
        (OperationId::WordWrap, json!({ "width": 20 })),
        (OperationId::WrapLines, json!({ "prefix": "> " })),
    ]);
    insta::assert_snapshot!(apply_pipeline(input, &p), @r"
> The quick brown fox
> jumps over the lazy
> dog near the
> riverbank.
");
}

#[test]
fn test_extract_and_format_prices() {
    let input = "Order: 3 x widget @ 1234.5\nShipping 12\nTotal due 3715.5 today";
    let p = pipeline(&[
        (OperationId::ExtractMatches, json!({ "pattern": r"\d+\.\d+" })),
        (OperationId::FormatNumbers, json!({})),
    ]);
    insta::assert_snapshot!(apply_pipeline(input, &p), @r"
1,234.50
3,715.50
");
}
