//! Advisory intent classification over free-text task descriptions.
//!
//! Same keyword approach as the tool classifier, but over natural
//! language. Callers use it to suggest an appropriate worker agent before
//! an action is even attempted; it carries no enforcement side effects.

use crate::rules::{EXPLORATION_PHRASES, RESEARCH_KEYWORDS, ToolCategory};

/// Classify the coarse intent of a free-text description.
///
/// Research keywords are checked before exploration phrases; the first
/// category with a hit wins. Returns `None` when nothing matches.
pub fn detect_intent(text: &str) -> Option<ToolCategory> {
    let lower = text.to_lowercase();

    if RESEARCH_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return Some(ToolCategory::Research);
    }
    if EXPLORATION_PHRASES.iter().any(|p| lower.contains(p)) {
        return Some(ToolCategory::Exploration);
    }
    None
}
