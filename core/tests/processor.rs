//! End-to-end processor tests: config → validate → process → exporter.
//!
//! Each test builds a processor from YAML, pushes a batch through `export`, and
//! inspects what the recording exporter received.

use attrproc::prelude::*;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

/// Exporter that keeps every batch it receives.
#[derive(Default)]
struct RecordingExporter {
    batches: Mutex<Vec<Vec<Span>>>,
}

impl RecordingExporter {
    fn last(&self) -> Vec<Span> {
        self.batches
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no batch exported")
    }

    fn count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

impl SpanExporter for RecordingExporter {
    fn export(&self, batch: Vec<Span>) -> ExportResult {
        self.batches.lock().unwrap().push(batch);
        ExportResult::Success
    }
}

fn build(yaml: &str) -> (AttributeProcessor<Arc<RecordingExporter>>, Arc<RecordingExporter>) {
    let exporter = Arc::new(RecordingExporter::default());
    let config = ProcessorConfig::from_yaml(yaml).unwrap();
    let processor = AttributeProcessor::from_config(config, Arc::clone(&exporter)).unwrap();
    (processor, exporter)
}

fn run(yaml: &str, batch: Vec<Span>) -> Vec<Span> {
    let (processor, exporter) = build(yaml);
    assert_eq!(processor.export(batch), ExportResult::Success);
    exporter.last()
}

fn build_err(yaml: &str) -> ConfigError {
    let config = ProcessorConfig::from_yaml(yaml).unwrap();
    validate(config).unwrap_err()
}

/// The span most action tests start from.
fn my_span() -> Span {
    Span::new("my span")
        .with("one", "1")
        .with("two", 2)
        .with("testKey", "testValue")
        .with("TESTKEY", "testValue2")
}

fn svc(name: &str) -> Span {
    Span::new(name)
        .with("one", "1")
        .with("two", 2)
        .with("testKey", "testValue")
        .with("testKey2", "testValue2")
}

/// String value of `key`, or `None` if absent or not a string.
fn attr<'a>(span: &'a Span, key: &str) -> Option<&'a str> {
    span.get(key).and_then(AttributeValue::as_str)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Invalid configs
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn no_action_is_rejected() {
    let err = build_err("type: attribute\nname: noAction\n");
    assert!(matches!(err, ConfigError::NoActions { .. }));
}

#[test]
fn update_without_value_is_rejected() {
    let err = build_err(
        r#"
type: attribute
name: inValidConfigTestWithNoValueInAction
include:
  matchType: strict
  spanNames: [svcA, svcB]
actions:
  - key: testKey
    action: update
"#,
    );
    assert!(matches!(err, ConfigError::MissingValue { .. }));
}

#[test]
fn invalid_regex_is_rejected_before_any_batch() {
    let err = build_err(
        r#"
type: attribute
name: invalidRegex
include:
  matchType: regexp
  spanNames: ["***"]
actions:
  - key: testKey
    action: update
    value: redacted
"#,
    );
    assert!(matches!(err, ConfigError::InvalidPattern { .. }));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Actions
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn delete() {
    let out = run(
        "name: actionDelete\nactions:\n  - key: testKey\n    action: delete\n",
        vec![my_span()],
    );
    assert_eq!(out[0].get("testKey"), None);
    assert!(out[0].get("one").is_some());
    assert!(out[0].get("TESTKEY").is_some());
}

#[test]
fn insert() {
    let out = run(
        r#"
name: actionInsert
actions:
  - key: testNewKey
    action: insert
    value: testNewValue
"#,
        vec![my_span()],
    );
    assert_eq!(attr(&out[0], "testNewKey"), Some("testNewValue"));
}

#[test]
fn insert_and_update() {
    let out = run(
        r#"
name: actionInsertAndUpdate
actions:
  - key: testNewKey
    action: insert
    value: testNewValue
  - key: testKey
    action: update
    value: testNewValue2
"#,
        vec![my_span()],
    );
    assert_eq!(attr(&out[0], "testNewKey"), Some("testNewValue"));
    assert_eq!(attr(&out[0], "testKey"), Some("testNewValue2"));
}

#[test]
fn insert_then_update_same_key() {
    let out = run(
        r#"
name: actionInsertAndUpdateSameAttribute
actions:
  - key: testNewKey
    action: insert
    value: testNewValue
  - key: testNewKey
    action: update
    value: testNewValue2
"#,
        vec![my_span()],
    );
    assert_eq!(attr(&out[0], "testNewKey"), Some("testNewValue2"));
}

#[test]
fn insert_does_not_overwrite() {
    let out = run(
        r#"
name: actionInsertWithDuplicate
actions:
  - key: testKey
    action: insert
    value: testNewValue
"#,
        vec![my_span()],
    );
    assert_eq!(out[0], my_span());
}

#[test]
fn insert_from_attribute() {
    let out = run(
        r#"
name: actionInsertFromAttribute
actions:
  - key: testKey3
    action: insert
    fromAttribute: testKey2
"#,
        vec![my_span().with("testKey2", "testValue2")],
    );
    assert_eq!(attr(&out[0], "testKey"), Some("testValue"));
    assert_eq!(attr(&out[0], "testKey3"), Some("testValue2"));
    assert_eq!(attr(&out[0], "one"), Some("1"));
}

#[test]
fn simple_update() {
    let out = run(
        r#"
name: actionSimpleUpdate
actions:
  - key: testKey
    action: update
    value: redacted
"#,
        vec![my_span()],
    );
    assert_eq!(attr(&out[0], "testKey"), Some("redacted"));
}

#[test]
fn update_from_attribute() {
    let out = run(
        r#"
name: actionUpdateFromAttribute
actions:
  - key: testKey
    action: update
    fromAttribute: testKey2
"#,
        vec![Span::new("my span")
            .with("one", "1")
            .with("two", 2)
            .with("testKey", "testValue")
            .with("testKey2", "testValue2")],
    );
    assert_eq!(attr(&out[0], "testKey"), Some("testValue2"));
}

#[test]
fn update_and_delete() {
    let out = run(
        r#"
name: complexAction
actions:
  - key: testKey
    action: update
    value: redacted
  - key: testKey2
    action: delete
"#,
        vec![svc("my span")],
    );
    assert_eq!(attr(&out[0], "testKey"), Some("redacted"));
    assert_eq!(out[0].get("testKey2"), None);
}

#[test]
fn numeric_literal_keeps_type() {
    let out = run(
        r#"
name: numeric
actions:
  - key: two
    action: update
    value: 3
"#,
        vec![my_span()],
    );
    assert_eq!(out[0].get("two"), Some(&AttributeValue::Int(3)));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Scope
// ═══════════════════════════════════════════════════════════════════════════════

const REDACT: &str = r#"
actions:
  - key: testKey
    action: update
    value: redacted
"#;

#[test]
fn simple_include() {
    let yaml = format!(
        "name: simpleInclude\ninclude:\n  matchType: strict\n  spanNames: [svcA, svcB]\n{REDACT}"
    );
    let out = run(&yaml, vec![svc("svcA"), svc("svcB"), svc("svcC"), svc("svcD")]);
    assert_eq!(attr(&out[0], "testKey"), Some("redacted"));
    assert_eq!(attr(&out[1], "testKey"), Some("redacted"));
    assert_eq!(attr(&out[2], "testKey"), Some("testValue"));
    assert_eq!(attr(&out[3], "testKey"), Some("testValue"));
}

#[test]
fn simple_include_regex() {
    let yaml = format!(
        "name: simpleIncludeRegex\ninclude:\n  matchType: regexp\n  spanNames: [\"svc.*\", \"test.*\"]\n{REDACT}"
    );
    let out = run(
        &yaml,
        vec![svc("svcA"), svc("svcB"), svc("serviceC"), svc("serviceD")],
    );
    assert_eq!(attr(&out[0], "testKey"), Some("redacted"));
    assert_eq!(attr(&out[1], "testKey"), Some("redacted"));
    assert_eq!(attr(&out[2], "testKey"), Some("testValue"));
    assert_eq!(attr(&out[3], "testKey"), Some("testValue"));
}

#[test]
fn simple_include_regex_value() {
    let yaml = format!(
        r#"
name: simpleIncludeRegexValue
include:
  matchType: regexp
  spanNames: ["svc.*", "test.*"]
  attributes:
    - key: testKey
      value: "Value.*"
{REDACT}"#
    );
    let out = run(
        &yaml,
        vec![
            svc("svcA").with("testKey", "testValue1"),
            svc("svcB").with("testKey", "testValue2"),
            svc("serviceC"),
            svc("serviceD"),
            svc("svcE").with("testKey", "testV1"),
        ],
    );
    assert_eq!(attr(&out[0], "testKey"), Some("redacted"));
    assert_eq!(attr(&out[1], "testKey"), Some("redacted"));
    assert_eq!(attr(&out[2], "testKey"), Some("testValue"));
    assert_eq!(attr(&out[3], "testKey"), Some("testValue"));
    assert_eq!(attr(&out[4], "testKey"), Some("testV1"));
}

#[test]
fn simple_include_hash() {
    let out = run(
        r#"
name: simpleIncludeHash
include:
  matchType: strict
  spanNames: [svcA, svcB, svcC]
actions:
  - key: testKey
    action: hash
"#,
        vec![
            svc("svcA"),
            svc("svcB").with("testKey", 2),
            svc("svcC").with("testKey", 123),
            svc("svcD"),
        ],
    );
    // sha256("testValue"), sha256("2"), sha256("123")
    assert_eq!(
        attr(&out[0], "testKey"),
        Some("82fe0c834cbea069013c5eb7828e599a693e0d2411887e2ab273271662973082")
    );
    assert_eq!(
        attr(&out[1], "testKey"),
        Some("d4735e3a265e16eee03f59718b9b5d03019c07d8b6c51f90da3a666eec13ab35")
    );
    assert_eq!(
        attr(&out[2], "testKey"),
        Some("a665a45920422f9d417e4867efdc4fb8a04a1f3fff1fa07e998e86f7f7a27ae3")
    );
    assert_eq!(attr(&out[1], "testKey2"), Some("testValue2"));
    assert_eq!(attr(&out[3], "testKey"), Some("testValue"));
}

#[test]
fn simple_exclude() {
    let yaml = format!(
        "name: simpleExclude\nexclude:\n  matchType: strict\n  spanNames: [svcA, svcB]\n{REDACT}"
    );
    let out = run(&yaml, vec![svc("svcA"), svc("svcB"), svc("svcC"), svc("svcD")]);
    assert_eq!(attr(&out[0], "testKey"), Some("testValue"));
    assert_eq!(attr(&out[1], "testKey"), Some("testValue"));
    assert_eq!(attr(&out[2], "testKey"), Some("redacted"));
    assert_eq!(attr(&out[3], "testKey"), Some("redacted"));
}

#[test]
fn simple_exclude_regex() {
    let yaml = format!(
        "name: simpleExcludeRegex\nexclude:\n  matchType: regexp\n  spanNames: [\"svc.*\"]\n{REDACT}"
    );
    let out = run(
        &yaml,
        vec![svc("svcA"), svc("svcB"), svc("serviceC"), svc("serviceD")],
    );
    assert_eq!(attr(&out[0], "testKey"), Some("testValue"));
    assert_eq!(attr(&out[1], "testKey"), Some("testValue"));
    assert_eq!(attr(&out[2], "testKey"), Some("redacted"));
    assert_eq!(attr(&out[3], "testKey"), Some("redacted"));
}

const MULTI_CRITERION: &str = r#"
  matchType: strict
  spanNames: [svcA, svcB]
  attributes:
    - key: testKey
      value: testValue
    - key: testKey2
actions:
  - key: testKey
    action: delete
"#;

fn multi_batch() -> Vec<Span> {
    vec![
        svc("svcA"),
        Span::new("svcB")
            .with("one", "1")
            .with("testKey", "testValue")
            .with("testKey3", "testValue3"),
        svc("svcC"),
        svc("svcD"),
    ]
}

#[test]
fn multi_include() {
    let out = run(
        &format!("name: multiInclude\ninclude:{MULTI_CRITERION}"),
        multi_batch(),
    );
    assert_eq!(out[0].get("testKey"), None);
    assert_eq!(attr(&out[1], "testKey"), Some("testValue"));
    assert_eq!(attr(&out[2], "testKey"), Some("testValue"));
    assert_eq!(attr(&out[3], "testKey"), Some("testValue"));
}

#[test]
fn multi_exclude() {
    let out = run(
        &format!("name: multiExclude\nexclude:{MULTI_CRITERION}"),
        multi_batch(),
    );
    assert_eq!(attr(&out[0], "testKey"), Some("testValue"));
    assert_eq!(out[1].get("testKey"), None);
    assert_eq!(out[2].get("testKey"), None);
    assert_eq!(out[3].get("testKey"), None);
}

#[test]
fn selective_processing() {
    let out = run(
        r#"
name: selectiveProcessing
include:
  matchType: strict
  spanNames: [svcA, svcB]
exclude:
  matchType: strict
  attributes:
    - key: testKey
      value: testValue
actions:
  - key: testKey2
    action: delete
"#,
        vec![
            svc("svcA"),
            svc("svcB").with("testKey", "testValue1"),
            svc("svcC"),
            svc("svcD"),
        ],
    );
    assert_eq!(attr(&out[0], "testKey2"), Some("testValue2"));
    assert_eq!(out[1].get("testKey2"), None);
    assert_eq!(attr(&out[2], "testKey2"), Some("testValue2"));
    assert_eq!(attr(&out[3], "testKey2"), Some("testValue2"));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Batch handling
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn every_batch_is_forwarded_once() {
    let (processor, exporter) = build(REDACT.trim_start());
    processor.export(vec![svc("a")]);
    processor.export(Vec::new());
    processor.export(vec![svc("b"), svc("c")]);
    assert_eq!(exporter.count(), 3);
    assert!(exporter.last().iter().all(|s| attr(s, "testKey") == Some("redacted")));
}

#[test]
fn exporter_failure_is_returned_unchanged() {
    struct Rejecting;
    impl SpanExporter for Rejecting {
        fn export(&self, _batch: Vec<Span>) -> ExportResult {
            ExportResult::Failure("queue full".into())
        }
    }

    let config = ProcessorConfig::from_yaml(REDACT.trim_start()).unwrap();
    let processor = AttributeProcessor::from_config(config, Rejecting).unwrap();
    assert_eq!(
        processor.export(vec![svc("a")]),
        ExportResult::Failure("queue full".into())
    );
}

#[test]
fn concurrent_batches_share_one_processor() {
    let (processor, exporter) = build(
        r#"
name: concurrent
include:
  matchType: regexp
  spanNames: ["svc.*"]
actions:
  - key: testKey
    action: hash
"#,
    );
    let processor = Arc::new(processor);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let processor = Arc::clone(&processor);
            std::thread::spawn(move || {
                processor.export(vec![svc(&format!("svc{i}")), svc(&format!("other{i}"))])
            })
        })
        .collect();
    for h in handles {
        assert!(h.join().unwrap().is_success());
    }

    assert_eq!(exporter.count(), 4);
    for batch in exporter.batches.lock().unwrap().iter() {
        assert_ne!(attr(&batch[0], "testKey"), Some("testValue"));
        assert_eq!(attr(&batch[1], "testKey"), Some("testValue"));
    }
}

#[test]
fn untouched_fields_survive() {
    let span: Span = serde_json::from_str(
        r#"{"name": "svcA", "traceId": "abc", "attributes": {"testKey": "testValue"}}"#,
    )
    .unwrap();
    let out = run(REDACT.trim_start(), vec![span]);
    assert_eq!(attr(&out[0], "testKey"), Some("redacted"));
    assert_eq!(
        out[0].other.get("traceId"),
        Some(&serde_json::Value::from("abc"))
    );
}
