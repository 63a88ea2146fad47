//! End-to-end behaviour of the translation pipeline.

use pretty_assertions::assert_eq;
use rstest::rstest;
use shellbridge_core::{
    BridgeConfig, FormatSelector, NormalizedPosition, OutputFormat, ResultTranslator, Severity,
    TextDocument, apply_actions, apply_edits,
};

const SCRIPT: &str = "#!/bin/bash\nunused=1\nfor f in *.txt; do\n\tcp $f /tmp\ndone\n";

fn legacy_output() -> String {
    r#"[
  {"file":"-","line":2,"endLine":2,"column":1,"endColumn":7,"level":"warning","code":2034,"message":"unused appears unused. Verify use (or export if used externally)."},
  null,
  {"file":"-","line":4,"endLine":4,"column":12,"endColumn":14,"level":"info","code":2086,"message":"Double quote to prevent globbing and word splitting.",
   "fix":{"replacements":[
     {"precedence":7,"line":4,"endLine":4,"column":12,"endColumn":12,"insertionPoint":"afterEnd","replacement":"\""},
     {"precedence":7,"line":4,"endLine":4,"column":14,"endColumn":14,"insertionPoint":"beforeStart","replacement":"\""}
   ]}}
]"#
    .to_string()
}

fn capability_output() -> String {
    r#"{"comments":[
  {"file":"-","line":2,"endLine":2,"column":1,"endColumn":7,"level":"warning","code":2034,"message":"unused appears unused. Verify use (or export if used externally)."},
  {"file":"-","line":4,"endLine":4,"column":5,"endColumn":7,"level":"info","code":2086,"message":"Double quote to prevent globbing and word splitting.",
   "fix":{"replacements":[
     {"precedence":7,"line":4,"endLine":4,"column":5,"endColumn":5,"insertionPoint":"afterEnd","replacement":"\""},
     {"precedence":7,"line":4,"endLine":4,"column":7,"endColumn":7,"insertionPoint":"beforeStart","replacement":"\""}
   ]}}
]}"#
    .to_string()
}

#[rstest]
#[case::legacy(OutputFormat::Json, legacy_output())]
#[case::capability(OutputFormat::Json1, capability_output())]
fn both_formats_produce_the_same_results(#[case] format: OutputFormat, #[case] output: String) {
    let doc = TextDocument::new(SCRIPT);
    let results = ResultTranslator::for_format(format)
        .translate(&output, &doc)
        .unwrap();

    assert_eq!(results.len(), 2);

    let unused = &results[0].diagnostic;
    assert_eq!(unused.code, "SC2034");
    assert_eq!(unused.severity, Severity::Warning);
    assert_eq!(unused.tags.len(), 1);

    let quoted = &results[1];
    assert_eq!(
        quoted.diagnostic.range.start,
        NormalizedPosition::new(3, 4)
    );
    assert_eq!(quoted.diagnostic.range.end, NormalizedPosition::new(3, 6));

    let action = quoted.code_action.as_ref().unwrap();
    assert_eq!(
        apply_edits(SCRIPT, &action.edits),
        "#!/bin/bash\nunused=1\nfor f in *.txt; do\n\tcp \"$f\" /tmp\ndone\n"
    );
}

#[test]
fn replacements_listed_back_to_front_fix_the_script() {
    let output = r#"{"comments":[
  {"file":"-","line":1,"endLine":1,"column":6,"endColumn":10,"level":"info","code":2086,"message":"Double quote to prevent globbing and word splitting.",
   "fix":{"replacements":[
     {"precedence":7,"line":1,"endLine":1,"column":10,"endColumn":10,"insertionPoint":"beforeStart","replacement":"\""},
     {"precedence":7,"line":1,"endLine":1,"column":6,"endColumn":6,"insertionPoint":"afterEnd","replacement":"\""}
   ]}}
]}"#;
    let text = "echo $foo";
    let results = ResultTranslator::json1()
        .translate(output, &TextDocument::new(text))
        .unwrap();
    let action = results[0].code_action.as_ref().unwrap();

    assert_eq!(apply_edits(text, &action.edits), "echo \"$foo\"");
    assert_eq!(apply_actions(text, &[action]).fixed_content, "echo \"$foo\"");
}

#[test]
fn selector_and_translator_cooperate() {
    let config = BridgeConfig::new();
    let selector: FormatSelector = config.format_selector();
    let version = semver::Version::new(0, 9, 0);

    let format = selector.select(Some(&version));
    assert_eq!(format, OutputFormat::Json1);

    let doc = TextDocument::new(SCRIPT);
    let results = ResultTranslator::for_format(format)
        .translate(&capability_output(), &doc)
        .unwrap();
    assert_eq!(results.len(), 2);
}

#[test]
fn legacy_output_through_capability_translator_fails() {
    let doc = TextDocument::new(SCRIPT);
    let err = ResultTranslator::json1()
        .translate(&legacy_output(), &doc)
        .unwrap_err();
    assert!(err.is_malformed_envelope());
}

#[test]
fn results_serialize_for_tooling() {
    let doc = TextDocument::new(SCRIPT);
    let results = ResultTranslator::json()
        .translate(&legacy_output(), &doc)
        .unwrap();

    let value = serde_json::to_value(&results).unwrap();
    assert_eq!(value[0]["diagnostic"]["code"], "SC2034");
    assert_eq!(value[0]["diagnostic"]["tags"][0], "unnecessary");
    assert!(value[0].get("code_action").is_none());
    assert_eq!(value[1]["code_action"]["kind"], "quickFix");
    assert_eq!(value[1]["code_action"]["edits"][0]["range"]["start"]["character"], 6);
}
