//! Extraction of delegation markers from displayed result text.

use super::DelegationMarker;
use regex::Regex;
use std::sync::LazyLock;

// Non-greedy across lines: the payload is a single JSON object between a
// literal tag pair.
static MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<delegation-request>\s*(.*?)\s*</delegation-request>").unwrap()
});

/// Extract the first well-formed delegation marker from `text`.
///
/// Blocks with unparsable JSON, or a payload whose `action` is not the
/// task hand-off, are skipped silently; the marker is advisory text, not
/// a guaranteed contract.
pub fn parse_delegation_marker(text: &str) -> Option<DelegationMarker> {
    for cap in MARKER_REGEX.captures_iter(text) {
        let Some(payload) = cap.get(1) else { continue };
        match serde_json::from_str::<DelegationMarker>(payload.as_str()) {
            Ok(marker) if marker.is_task_delegation() => return Some(marker),
            Ok(marker) => {
                tracing::debug!(action = %marker.action, "ignoring marker with unknown action");
            }
            Err(e) => {
                tracing::debug!(error = %e, "ignoring malformed delegation marker");
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_marker() {
        let text = r#"Prepared. <delegation-request>{"action": "delegate_via_task", "agent": "executor"}</delegation-request>"#;
        let marker = parse_delegation_marker(text).unwrap();
        assert_eq!(marker.agent, "executor");
        assert!(marker.description.is_empty());
        assert!(marker.prompt.is_empty());
    }

    #[test]
    fn test_parse_full_marker_multiline() {
        let text = r#"
            <delegation-request>
            {
                "action": "delegate_via_task",
                "agent": "researcher",
                "description": "Compare rate limiters",
                "prompt": "Survey the crates.io landscape for rate limiting."
            }
            </delegation-request>
        "#;
        let marker = parse_delegation_marker(text).unwrap();
        assert_eq!(marker.agent, "researcher");
        assert_eq!(marker.description, "Compare rate limiters");
        assert!(marker.prompt.starts_with("Survey"));
    }

    #[test]
    fn test_first_well_formed_match_wins() {
        let text = r#"
            <delegation-request>{ not json }</delegation-request>
            <delegation-request>{"action": "delegate_via_task", "agent": "first"}</delegation-request>
            <delegation-request>{"action": "delegate_via_task", "agent": "second"}</delegation-request>
        "#;
        let marker = parse_delegation_marker(text).unwrap();
        assert_eq!(marker.agent, "first");
    }

    #[test]
    fn test_malformed_json_is_ignored() {
        let text = "<delegation-request>{ invalid json }</delegation-request>";
        assert!(parse_delegation_marker(text).is_none());
    }

    #[test]
    fn test_unknown_action_is_ignored() {
        let text = r#"<delegation-request>{"action": "delegate_via_email", "agent": "executor"}</delegation-request>"#;
        assert!(parse_delegation_marker(text).is_none());
    }

    #[test]
    fn test_unterminated_block_is_ignored() {
        let text = r#"<delegation-request>{"action": "delegate_via_task", "agent": "executor"}"#;
        assert!(parse_delegation_marker(text).is_none());
    }

    #[test]
    fn test_plain_text_has_no_marker() {
        assert!(parse_delegation_marker("No hand-off prepared here.").is_none());
        assert!(parse_delegation_marker("").is_none());
    }
}
