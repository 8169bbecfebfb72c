use serde::{Deserialize, Serialize};

use crate::RequirementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequirementStatus {
    Draft,
    Analyzed,
    Covered,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Requirement {
    pub id: RequirementId,
    pub title: String,
    pub text: String,
    pub status: RequirementStatus,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Requirement {
    pub fn new(id: impl Into<RequirementId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            text: String::new(),
            status: RequirementStatus::Draft,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestCase {
    pub id: String,
    pub requirement_id: RequirementId,
    pub name: String,
    pub steps: Vec<String>,
    pub expected: String,
}

/// Counters describing how far requirement analysis has progressed.
///
/// These numbers travel between domains as-is; receivers adopt them rather
/// than recomputing from their own copy of the requirement list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementProgress {
    pub total: usize,
    pub analyzed: usize,
    pub with_test_cases: usize,
}

impl RequirementProgress {
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.with_test_cases == self.total
    }

    pub fn analyzed_ratio(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.analyzed as f32 / self.total as f32
    }
}
