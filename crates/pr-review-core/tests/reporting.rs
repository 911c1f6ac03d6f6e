//! Report files written for a merged review.

use pr_review_core::{
    render_markdown, write_review_json, write_review_md, Issue, SeverityCounts, Severity,
    REVIEW_JSON_FILE, REVIEW_MD_FILE,
};

fn issues() -> Vec<Issue> {
    vec![
        Issue {
            severity: Severity::High,
            file: "auth.py".to_string(),
            lines: "10-12".to_string(),
            title: "Hardcoded secret".to_string(),
            details: "A credential is committed to source.".to_string(),
            suggestion: "Load it from the environment.".to_string(),
        },
        Issue {
            severity: Severity::Med,
            file: "db.py".to_string(),
            lines: "40-42".to_string(),
            title: "N+1 query".to_string(),
            details: "One query per user.".to_string(),
            suggestion: "Fetch orders in one batch.".to_string(),
        },
    ]
}

#[test]
fn json_report_uses_wire_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(REVIEW_JSON_FILE);

    write_review_json(&path, &issues()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let arr = raw.as_array().expect("array of issues");
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["severity"], "high");
    assert_eq!(arr[1]["severity"], "med");
    let keys: Vec<&String> = arr[0].as_object().unwrap().keys().collect();
    for key in ["severity", "file", "lines", "title", "details", "suggestion"] {
        assert!(keys.iter().any(|k| k.as_str() == key), "missing {key}");
    }
    assert_eq!(keys.len(), 6);
}

#[test]
fn markdown_report_matches_render() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(REVIEW_MD_FILE);

    write_review_md(&path, &issues()).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, render_markdown(&issues()));
    assert!(written.contains("- **high** `auth.py:10-12` - Hardcoded secret"));
    assert!(written.contains("  - *Suggestion:* Fetch orders in one batch."));
}

#[test]
fn write_into_missing_directory_fails_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join(REVIEW_JSON_FILE);
    let err = write_review_json(&path, &issues()).unwrap_err();
    assert!(format!("{err:#}").contains("missing"));
}

#[test]
fn summary_line() {
    assert_eq!(
        SeverityCounts::from_issues(&issues()).to_string(),
        "#1 high | #1 med | #0 low"
    );
}
