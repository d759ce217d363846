//! Classification and role enforcement.

pub mod engine;
pub mod intent;
pub mod paths;
pub mod tools;

pub use engine::RolePolicyEngine;
pub use intent::detect_intent;
pub use paths::is_protected_path;
pub use tools::{classify_tool, is_write_tool, normalize_tool_id};
