//! Prompt text for the review agents.

use crate::domain::finding::ReviewerKind;

const ONLY_ANALYZE_DIFF: &str = "Only analyze what's in the diff. Don't assume anything else.";
const RETURN_VALID_JSON: &str = "Return ONLY valid JSON matching this schema.";
const FILE_AND_LINES_REQUIRED: &str = "Every issue must include file + line range from the diff.";
const EMPTY_ISSUES_OK: &str =
    "If you can't find issues, return empty issues: [] with a short summary.";

/// Compact schema shape shown to the model.
pub const SCHEMA_TEMPLATE: &str = r#"{
  "reviewer": "security" | "performance" | "maintainability",
  "summary": "<string>",
  "issues": [
    {
      "severity": "high" | "med" | "low",
      "file": "<path from diff>",
      "lines": "<e.g. 12-18 or L12-L18>",
      "title": "<string>",
      "details": "<string>",
      "suggestion": "<string>"
    }
  ]
}"#;

/// System prompt shared by every reviewer kind: rules plus schema.
pub fn system_prompt() -> String {
    [
        ONLY_ANALYZE_DIFF,
        RETURN_VALID_JSON,
        FILE_AND_LINES_REQUIRED,
        EMPTY_ISSUES_OK,
        "Schema:",
        SCHEMA_TEMPLATE,
    ]
    .join("\n\n")
}

/// User prompt naming the reviewer and embedding the diff.
pub fn review_prompt(kind: ReviewerKind, diff: &str) -> String {
    format!("Reviewer: {kind}\n\nDiff:\n{diff}")
}

/// Follow-up prompt asking the model to fix its previous reply.
pub fn repair_prompt(previous_output: &str, error: &dyn std::fmt::Display) -> String {
    format!(
        "Previous output:\n{previous_output}\n\n\
         Parse/validation error: {error}\n\n\
         Return corrected JSON only."
    )
}
