pub mod config;
pub mod errors;
pub mod hooks;
pub mod marker;
pub mod policy;
pub mod rules;
pub mod session;
pub mod store;
pub mod workflow;

pub use config::EngineConfig;
pub use errors::StoreError;
pub use hooks::{ActionResult, DenyReason, EnforcementHooks, PermissionDecision};
pub use store::{FsPlanArtifacts, InMemoryStateStore, PlanArtifacts, StateStore};
pub use workflow::{WorkflowPhase, WorkflowState};
