//! Static rule tables consulted by the classifiers.
//!
//! Every tool-name, path, and intent pattern the engine matches against
//! lives here, in one place, so the tool classifier, the path policy, and
//! any caller needing the same categories read from a single ordered
//! table instead of duplicated pattern lists.

use serde::{Deserialize, Serialize};

/// Canonical name of the coordinator actor. Identifiers containing
/// "orchestrator" are treated as the same role.
pub const COORDINATOR_NAME: &str = "goopspec";

/// The generic execution entry point: the host tool that runs a prepared
/// hand-off. The delegation tracker watches for calls to exactly this
/// identifier.
pub const TASK_TOOL: &str = "Task";

/// Worker agent that performs web research on the coordinator's behalf.
pub const RESEARCH_AGENT: &str = "researcher";

/// Worker agent that maps and explores the codebase.
pub const EXPLORATION_AGENT: &str = "explorer";

/// Worker agent that performs code edits.
pub const EXECUTION_AGENT: &str = "executor";

/// The workflow's private data directory. Writes under it are never
/// restricted.
pub const WORKSPACE_DATA_DIR: &str = ".goopspec/";

/// Category assigned to a tool identifier or a free-text intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCategory {
    /// Web research: searching and fetching external sources.
    Research,
    /// Codebase exploration: grep/glob/read style inspection.
    Exploration,
}

impl std::fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolCategory::Research => write!(f, "research"),
            ToolCategory::Exploration => write!(f, "exploration"),
        }
    }
}

/// How a tool rule pattern is applied to a normalized tool identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Prefix,
}

/// A single entry in the ordered tool classification table.
#[derive(Debug, Clone, Copy)]
pub struct ToolRule {
    pub pattern: &'static str,
    pub kind: MatchKind,
    pub category: ToolCategory,
}

impl ToolRule {
    /// Whether this rule matches the given (already normalized) tool id.
    pub fn matches(&self, tool_id: &str) -> bool {
        match self.kind {
            MatchKind::Exact => tool_id == self.pattern,
            MatchKind::Prefix => tool_id.starts_with(self.pattern),
        }
    }
}

/// Ordered tool classification rules. First match wins.
pub const TOOL_RULES: &[ToolRule] = &[
    ToolRule {
        pattern: "WebSearch",
        kind: MatchKind::Exact,
        category: ToolCategory::Research,
    },
    ToolRule {
        pattern: "WebFetch",
        kind: MatchKind::Exact,
        category: ToolCategory::Research,
    },
    ToolRule {
        pattern: "web_",
        kind: MatchKind::Prefix,
        category: ToolCategory::Research,
    },
    ToolRule {
        pattern: "Grep",
        kind: MatchKind::Exact,
        category: ToolCategory::Exploration,
    },
    ToolRule {
        pattern: "Glob",
        kind: MatchKind::Exact,
        category: ToolCategory::Exploration,
    },
    ToolRule {
        pattern: "LS",
        kind: MatchKind::Exact,
        category: ToolCategory::Exploration,
    },
    ToolRule {
        pattern: "Read",
        kind: MatchKind::Exact,
        category: ToolCategory::Exploration,
    },
    ToolRule {
        pattern: "search_",
        kind: MatchKind::Prefix,
        category: ToolCategory::Exploration,
    },
];

/// Tool identifiers that modify files.
pub const WRITE_TOOLS: &[&str] = &["Write", "Edit", "MultiEdit", "NotebookEdit"];

/// Directory prefixes under which code files are protected from direct
/// coordinator edits.
pub const SOURCE_ROOTS: &[&str] = &["src/", "lib/", "app/", "server/", "packages/"];

/// Extensions that mark a file as code.
pub const CODE_EXTENSIONS: &[&str] = &[
    ".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".py", ".rs", ".go", ".java", ".rb",
];

/// Extensions exempt from path protection even under a source root.
pub const DOC_EXTENSIONS: &[&str] = &[".md", ".mdx", ".txt", ".rst"];

/// Keywords in free text that suggest a research task.
pub const RESEARCH_KEYWORDS: &[&str] =
    &["research", "compare", "evaluate", "investigate", "benchmark"];

/// Phrases in free text that suggest a codebase-exploration task.
pub const EXPLORATION_PHRASES: &[&str] =
    &["where is", "how does", "find where", "what calls", "locate"];
