#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;

use reqbench_app_core::{
    AppPorts, ProjectStore, ReqbenchApplication, RequirementImporter, TestCaseGenerator,
    WorkspaceStore,
};
use reqbench_core::{
    LlmHealth, ProjectInfo, Requirement, TestCase, WorkspaceSnapshot,
};

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .try_init();
}

pub fn requirement(id: &str) -> Requirement {
    Requirement::new(id, format!("Requirement {id}"))
}

pub struct MemoryProjectStore {
    pub recents: Vec<ProjectInfo>,
}

impl MemoryProjectStore {
    pub fn empty() -> Self {
        Self {
            recents: Vec::new(),
        }
    }

    pub fn with_recents(recents: Vec<ProjectInfo>) -> Self {
        Self { recents }
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn open(&self, path: &Utf8Path) -> anyhow::Result<ProjectInfo> {
        let name = path.file_name().unwrap_or("unnamed").to_string();
        Ok(ProjectInfo {
            name,
            path: path.to_owned(),
            last_opened: Some(Utc::now()),
        })
    }

    async fn create(&self, name: &str, location: &Utf8Path) -> anyhow::Result<ProjectInfo> {
        Ok(ProjectInfo::new(name, location.join(name)))
    }

    async fn recent(&self) -> anyhow::Result<Vec<ProjectInfo>> {
        Ok(self.recents.clone())
    }
}

#[derive(Default)]
pub struct MemoryWorkspaceStore {
    pub files: Mutex<HashMap<Utf8PathBuf, WorkspaceSnapshot>>,
}

#[async_trait]
impl WorkspaceStore for MemoryWorkspaceStore {
    async fn load(&self, path: &Utf8Path) -> anyhow::Result<WorkspaceSnapshot> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, snapshot: &WorkspaceSnapshot, path: &Utf8Path) -> anyhow::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_owned(), snapshot.clone());
        Ok(())
    }
}

pub struct StaticImporter {
    pub requirements: Vec<Requirement>,
}

#[async_trait]
impl RequirementImporter for StaticImporter {
    async fn import(&self, _source: &str) -> anyhow::Result<Vec<Requirement>> {
        Ok(self.requirements.clone())
    }
}

/// Produces one test case per requirement. With `slow_first_call` set, the
/// first generation awaits a short sleep so a second run can overtake it.
pub struct ScriptedGenerator {
    pub slow_first_call: bool,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn instant() -> Self {
        Self {
            slow_first_call: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn slow_first() -> Self {
        Self {
            slow_first_call: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TestCaseGenerator for ScriptedGenerator {
    async fn generate(&self, requirement: &Requirement) -> anyhow::Result<Vec<TestCase>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.slow_first_call && call == 0 {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        Ok(vec![TestCase {
            id: format!("TC-{}", requirement.id),
            requirement_id: requirement.id.clone(),
            name: format!("verify {}", requirement.title),
            steps: vec!["arrange".into(), "act".into(), "assert".into()],
            expected: "behaves as specified".into(),
        }])
    }

    async fn probe_health(&self) -> LlmHealth {
        LlmHealth::Ready
    }
}

pub struct FailingGenerator;

#[async_trait]
impl TestCaseGenerator for FailingGenerator {
    async fn generate(&self, _requirement: &Requirement) -> anyhow::Result<Vec<TestCase>> {
        anyhow::bail!("model backend unavailable")
    }

    async fn probe_health(&self) -> LlmHealth {
        LlmHealth::Offline
    }
}

pub fn test_ports() -> AppPorts {
    AppPorts {
        projects: Arc::new(MemoryProjectStore::empty()),
        workspaces: Arc::new(MemoryWorkspaceStore::default()),
        importer: Arc::new(StaticImporter {
            requirements: vec![requirement("R-1"), requirement("R-2"), requirement("R-3")],
        }),
        generator: Arc::new(ScriptedGenerator::instant()),
    }
}

pub fn test_app() -> ReqbenchApplication {
    ReqbenchApplication::new(test_ports())
}
