//! Integration tests for replaying scene scripts

use attach_layout::layout::{Edge, LayoutConfig};
use attach_layout::{Scene, SceneError};
use pretty_assertions::assert_eq;

const LATE_SIBLING: &str = r##"{"operations": [
    {"create": {"cid": "$1", "type": "Composite"}},
    {"create": {"cid": "$2", "type": "Button"}},
    {"append": {"parent": "$1", "child": "$2"}},
    {"layout": {"widget": "$2", "data": {"right": ["#other", 42], "top": 0}}},
    {"create": {"cid": "$3", "type": "Label", "id": "other"}},
    {"append": {"parent": "$1", "child": "$3"}},
    {"create": {"cid": "$4", "type": "Label"}},
    {"append": {"parent": "$1", "child": "$4"}}
]}"##;

fn replay(source: &str) -> Result<attach_layout::SceneReport, SceneError> {
    Scene::from_json(source)?.replay(LayoutConfig::default())
}

#[test]
fn test_late_sibling_report() {
    let report = replay(LATE_SIBLING).expect("Should replay");
    insta::assert_snapshot!(
        serde_json::to_string(&report.submissions).unwrap(),
        @r#"[{"widget":"$2","layoutData":{"right":[0.0,42.0],"top":0.0}},{"widget":"$2","layoutData":{"right":["$3",42.0],"top":0.0}}]"#
    );
    assert!(report.pending.is_empty());
}

#[test]
fn test_pending_and_diagnostics_reported() {
    let report = replay(
        r##"{"operations": [
            {"create": {"cid": "$1", "type": "Composite"}},
            {"create": {"cid": "$2", "type": "Button"}},
            {"append": {"parent": "$1", "child": "$2"}},
            {"layout": {"widget": "$2", "data": {"left": 0, "centerX": 0, "baseline": "#caption"}}}
        ]}"##,
    )
    .expect("Should replay");

    let messages: Vec<&str> = report
        .diagnostics
        .iter()
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(
        messages,
        vec!["Inconsistent layoutData: centerX overrides left and right"]
    );
    assert_eq!(report.diagnostics[0].category, "inconsistent");
    assert_eq!(report.pending.len(), 1);
    assert_eq!(report.pending[0].edge, Edge::Baseline);
}

#[test]
fn test_presets_in_scenes() {
    let report = replay(
        r#"{"operations": [
            {"create": {"cid": "$1", "type": "Composite"}},
            {"layout": {"widget": "$1", "data": "stretch"}}
        ]}"#,
    )
    .expect("Should replay");
    insta::assert_snapshot!(
        serde_json::to_string(&report.submissions[0].layout_data).unwrap(),
        @r#"{"left":0.0,"right":0.0,"top":0.0,"bottom":0.0}"#
    );
}

#[test]
fn test_tree_errors_stop_replay() {
    let err = replay(
        r#"{"operations": [
            {"create": {"cid": "$1", "type": "Composite"}},
            {"append": {"parent": "$1", "child": "$9"}}
        ]}"#,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "operation 1: unknown widget '$9'");
}

#[test]
fn test_layout_on_disposed_widget_fails() {
    let err = replay(
        r#"{"operations": [
            {"create": {"cid": "$1", "type": "Button"}},
            {"dispose": "$1"},
            {"layout": {"widget": "$1", "data": {"left": 0, "top": 0}}}
        ]}"#,
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "operation 2 ($1): Cannot set layoutData on disposed widget '$1'"
    );
}
