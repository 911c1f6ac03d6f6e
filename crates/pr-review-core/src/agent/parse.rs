//! Turning raw model text into a validated [`AgentReview`].

use crate::domain::error::OutputError;
use crate::domain::finding::{AgentReview, ReviewerKind};

const FENCE: &str = "```";

/// Remove one enclosing Markdown code fence, if present.
///
/// The opening line is dropped when it starts with a fence (with or without
/// a language tag); the closing line is dropped when it is exactly a fence.
pub fn strip_code_fence(raw: &str) -> &str {
    let s = raw.trim();
    if !s.starts_with(FENCE) {
        return s;
    }
    let body = match s.find('\n') {
        Some(idx) => &s[idx + 1..],
        None => "",
    };
    let body = match body.rfind('\n') {
        Some(idx) if body[idx + 1..].trim() == FENCE => &body[..idx],
        None if body.trim() == FENCE => "",
        _ => body,
    };
    body.trim()
}

/// Parse and validate a reply produced for `expected`.
pub fn parse_review(raw: &str, expected: ReviewerKind) -> Result<AgentReview, OutputError> {
    let review: AgentReview = serde_json::from_str(strip_code_fence(raw))?;
    review.validate(expected)?;
    Ok(review)
}
