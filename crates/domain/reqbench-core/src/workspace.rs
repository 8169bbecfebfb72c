use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::project::ProjectInfo;
use crate::requirement::{Requirement, RequirementProgress, RequirementStatus, TestCase};
use crate::RequirementId;

/// Everything a project session persists: the project identity, its imported
/// requirements and any test cases generated for them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkspaceSnapshot {
    pub project: Option<ProjectInfo>,
    pub requirements: Vec<Requirement>,
    pub test_cases: Vec<TestCase>,
    pub saved_at: Option<DateTime<Utc>>,
}

impl Default for WorkspaceSnapshot {
    fn default() -> Self {
        Self {
            project: None,
            requirements: Vec::new(),
            test_cases: Vec::new(),
            saved_at: None,
        }
    }
}

impl WorkspaceSnapshot {
    pub fn for_project(project: ProjectInfo) -> Self {
        Self {
            project: Some(project),
            ..Self::default()
        }
    }

    pub fn requirement(&self, id: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.id == id)
    }

    pub fn test_cases_for(&self, requirement_id: &str) -> Vec<&TestCase> {
        self.test_cases
            .iter()
            .filter(|t| t.requirement_id == requirement_id)
            .collect()
    }

    /// Upserts by requirement id, keeping first-import order for existing ids.
    pub fn merge_requirements(&mut self, incoming: Vec<Requirement>) -> usize {
        let mut added = 0;
        for req in incoming {
            if let Some(ix) = self.requirements.iter().position(|r| r.id == req.id) {
                self.requirements[ix] = req;
            } else {
                self.requirements.push(req);
                added += 1;
            }
        }
        added
    }

    pub fn record_test_cases(&mut self, requirement_id: &RequirementId, cases: Vec<TestCase>) {
        self.test_cases
            .retain(|t| &t.requirement_id != requirement_id);
        self.test_cases.extend(cases);
        if let Some(req) = self
            .requirements
            .iter_mut()
            .find(|r| &r.id == requirement_id)
        {
            req.status = if self.test_cases.iter().any(|t| &t.requirement_id == requirement_id) {
                RequirementStatus::Covered
            } else {
                RequirementStatus::Analyzed
            };
        }
    }

    pub fn progress(&self) -> RequirementProgress {
        RequirementProgress {
            total: self.requirements.len(),
            analyzed: self
                .requirements
                .iter()
                .filter(|r| r.status != RequirementStatus::Draft)
                .count(),
            with_test_cases: self
                .requirements
                .iter()
                .filter(|r| r.status == RequirementStatus::Covered)
                .count(),
        }
    }
}
