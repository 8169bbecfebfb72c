use serde::{Deserialize, Serialize};

pub mod project;
pub mod requirement;
pub mod workspace;

pub use project::{LlmHealth, ProjectInfo};
pub use requirement::{Requirement, RequirementProgress, RequirementStatus, TestCase};
pub use workspace::WorkspaceSnapshot;

pub type RequirementId = String;

/// Severity of a user-facing status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}
