//! Engine configuration, read from `.goopspec/goopspec.toml`.
//!
//! Every field has a sensible default so an absent file configures a
//! working engine.
//!
//! # Configuration File Format
//!
//! ```toml
//! [enforcement]
//! coordinator = "goopspec"
//! task_tool = "Task"
//! nudge_threshold = 3
//!
//! [sessions]
//! ttl_secs = 1800
//! sweep_interval_secs = 60
//!
//! [workflow]
//! plan_artifact = ".goopspec/PLAN.md"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::rules::{COORDINATOR_NAME, TASK_TOOL};

/// `[enforcement]` section: role names and the nudge threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnforcementSection {
    /// Canonical coordinator actor name.
    #[serde(default = "default_coordinator")]
    pub coordinator: String,
    /// Tool identifier of the generic execution entry point.
    #[serde(default = "default_task_tool")]
    pub task_tool: String,
    /// Consecutive exploration calls before the delegation nudge fires.
    #[serde(default = "default_nudge_threshold")]
    pub nudge_threshold: u32,
}

fn default_coordinator() -> String {
    COORDINATOR_NAME.to_string()
}

fn default_task_tool() -> String {
    TASK_TOOL.to_string()
}

fn default_nudge_threshold() -> u32 {
    3
}

impl Default for EnforcementSection {
    fn default() -> Self {
        Self {
            coordinator: default_coordinator(),
            task_tool: default_task_tool(),
            nudge_threshold: default_nudge_threshold(),
        }
    }
}

/// `[sessions]` section: TTL sweep tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsSection {
    /// Idle seconds before a session's tracker entries are evicted.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Seconds between sweep passes.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_ttl_secs() -> u64 {
    1800
}

fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for SessionsSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

/// `[workflow]` section: plan artifact location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSection {
    /// Path to the execution plan document the specify → execute guard
    /// checks for.
    #[serde(default = "default_plan_artifact")]
    pub plan_artifact: PathBuf,
}

fn default_plan_artifact() -> PathBuf {
    PathBuf::from(".goopspec/PLAN.md")
}

impl Default for WorkflowSection {
    fn default() -> Self {
        Self {
            plan_artifact: default_plan_artifact(),
        }
    }
}

/// The complete goopspec.toml configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub enforcement: EnforcementSection,
    #[serde(default)]
    pub sessions: SessionsSection,
    #[serde(default)]
    pub workflow: WorkflowSection,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse goopspec.toml")
    }

    /// Load from the default location under the workspace data directory,
    /// returning defaults if no file exists.
    pub fn load_or_default(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join("goopspec.toml");
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize goopspec.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Session TTL as a std duration.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.sessions.ttl_secs)
    }

    /// Sweep interval as a std duration, clamped to at least one second:
    /// `tokio::time::interval` panics on a zero period.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sessions.sweep_interval_secs.max(1))
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.enforcement.nudge_threshold == 0 {
            warnings.push(
                "nudge_threshold of 0 nudges on every exploration call; use 1 or higher"
                    .to_string(),
            );
        }
        if self.enforcement.coordinator.trim().is_empty() {
            warnings.push("coordinator name is empty; no actor will ever be restricted".to_string());
        }
        if self.sessions.sweep_interval_secs == 0 {
            warnings.push("sweep_interval_secs of 0 busy-loops the sweep task".to_string());
        }
        if self.sessions.ttl_secs < self.sessions.sweep_interval_secs {
            warnings.push(format!(
                "ttl_secs ({}) is shorter than sweep_interval_secs ({}); sessions may be evicted mid-conversation",
                self.sessions.ttl_secs, self.sessions.sweep_interval_secs
            ));
        }

        warnings
    }
}
