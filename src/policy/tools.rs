//! Tool identifier classification.
//!
//! Hosts decorate tool names with provider prefixes (e.g. an MCP server
//! exposes `Grep` as `mcp__codenav__Grep`). Classification strips the
//! decoration first, then walks the ordered rule table; first match wins.

use crate::rules::{TOOL_RULES, ToolCategory, WRITE_TOOLS};

/// Strip known provider-prefix decorations from a tool identifier.
///
/// `mcp__<server>__Name` becomes `Name`. Identifiers without a recognized
/// decoration are returned unchanged.
pub fn normalize_tool_id(tool_id: &str) -> &str {
    if let Some(rest) = tool_id.strip_prefix("mcp__")
        && let Some(idx) = rest.find("__")
    {
        return &rest[idx + 2..];
    }
    tool_id
}

/// Classify a tool identifier. Returns `None` for uncategorized tools.
pub fn classify_tool(tool_id: &str) -> Option<ToolCategory> {
    let normalized = normalize_tool_id(tool_id);
    TOOL_RULES
        .iter()
        .find(|rule| rule.matches(normalized))
        .map(|rule| rule.category)
}

/// Whether the tool is a write/edit-class operation.
pub fn is_write_tool(tool_id: &str) -> bool {
    let normalized = normalize_tool_id(tool_id);
    WRITE_TOOLS.contains(&normalized)
}
