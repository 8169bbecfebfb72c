use std::sync::{Arc, Mutex};

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;

use reqbench_core::WorkspaceSnapshot;

use crate::mediator::{
    BroadcastHub, BroadcastNote, DomainEvent, DomainMediator, EventHandler, MediatorCore,
    SubscriptionId,
};
use crate::ports::{EventObservers, RequirementImporter, UiCoordinator, WorkspaceStore};

pub const DOMAIN: &str = "workspace_management";

#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceEvent {
    Loaded {
        snapshot: WorkspaceSnapshot,
    },
    Saved {
        path: Utf8PathBuf,
        requirement_count: usize,
    },
    ImportCompleted {
        imported: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkspaceEventKind {
    Loaded,
    Saved,
    ImportCompleted,
}

impl DomainEvent for WorkspaceEvent {
    type Kind = WorkspaceEventKind;

    fn kind(&self) -> WorkspaceEventKind {
        match self {
            WorkspaceEvent::Loaded { .. } => WorkspaceEventKind::Loaded,
            WorkspaceEvent::Saved { .. } => WorkspaceEventKind::Saved,
            WorkspaceEvent::ImportCompleted { .. } => WorkspaceEventKind::ImportCompleted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkspaceStep {
    Browse,
    Edit,
}

struct WorkspaceState {
    snapshot: Option<WorkspaceSnapshot>,
    root: Option<Utf8PathBuf>,
    step: WorkspaceStep,
    dirty: bool,
}

/// Loads, saves and imports into the workspace snapshot of the active
/// project. The snapshot it announces via `WorkspaceLoaded` is the working
/// copy every other domain seeds from.
pub struct WorkspaceManagementMediator {
    core: MediatorCore<WorkspaceEvent>,
    hub: Arc<BroadcastHub>,
    store: Arc<dyn WorkspaceStore>,
    importer: Arc<dyn RequirementImporter>,
    state: Mutex<WorkspaceState>,
}

impl WorkspaceManagementMediator {
    pub fn new(
        hub: Arc<BroadcastHub>,
        ui: Arc<dyn UiCoordinator>,
        observers: EventObservers,
        store: Arc<dyn WorkspaceStore>,
        importer: Arc<dyn RequirementImporter>,
    ) -> Self {
        Self {
            core: MediatorCore::new(DOMAIN, ui, observers),
            hub,
            store,
            importer,
            state: Mutex::new(WorkspaceState {
                snapshot: None,
                root: None,
                step: WorkspaceStep::Browse,
                dirty: false,
            }),
        }
    }

    pub fn subscribe(
        &self,
        kind: WorkspaceEventKind,
        handler: EventHandler<WorkspaceEvent>,
    ) -> SubscriptionId {
        self.core.subscribe(kind, handler)
    }

    pub fn unsubscribe(&self, kind: WorkspaceEventKind, id: SubscriptionId) {
        self.core.unsubscribe(kind, id);
    }

    pub fn snapshot(&self) -> Option<WorkspaceSnapshot> {
        self.state.lock().unwrap().snapshot.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.state.lock().unwrap().dirty
    }

    pub async fn load_workspace(&self, root: &Utf8Path) -> anyhow::Result<WorkspaceSnapshot> {
        self.core.ensure_registered()?;
        let path = root.join(reqbench_config::WORKSPACE_FILE_NAME);
        let snapshot = self
            .store
            .load(&path)
            .await
            .with_context(|| format!("Failed to load workspace from {path}"))?;

        {
            let mut state = self.state.lock().unwrap();
            state.snapshot = Some(snapshot.clone());
            state.root = Some(root.to_owned());
            state.dirty = false;
        }
        self.core.publish(WorkspaceEvent::Loaded {
            snapshot: snapshot.clone(),
        })?;
        self.hub.broadcast_from(
            DOMAIN,
            &BroadcastNote::WorkspaceLoaded {
                snapshot: snapshot.clone(),
            },
        );
        Ok(snapshot)
    }

    pub async fn save_workspace(&self) -> anyhow::Result<Utf8PathBuf> {
        self.core.ensure_registered()?;
        let (mut snapshot, root) = {
            let state = self.state.lock().unwrap();
            let snapshot = state
                .snapshot
                .clone()
                .ok_or_else(|| anyhow::anyhow!("No workspace loaded"))?;
            let root = state
                .root
                .clone()
                .ok_or_else(|| anyhow::anyhow!("No workspace root known"))?;
            (snapshot, root)
        };

        snapshot.saved_at = Some(Utc::now());
        let path = root.join(reqbench_config::WORKSPACE_FILE_NAME);
        self.store
            .save(&snapshot, &path)
            .await
            .with_context(|| format!("Failed to save workspace to {path}"))?;

        let requirement_count = snapshot.requirements.len();
        {
            let mut state = self.state.lock().unwrap();
            state.snapshot = Some(snapshot);
            state.dirty = false;
        }
        self.core.publish(WorkspaceEvent::Saved {
            path: path.clone(),
            requirement_count,
        })?;
        self.hub.broadcast_from(
            DOMAIN,
            &BroadcastNote::WorkspaceSaved {
                path: path.clone(),
                requirement_count,
            },
        );
        Ok(path)
    }

    /// Pulls requirements from the external tracker and merges them into the
    /// working snapshot. The merged snapshot is re-announced so downstream
    /// domains reseed.
    pub async fn import_requirements(&self, source: &str) -> anyhow::Result<usize> {
        self.core.ensure_registered()?;
        let incoming = self
            .importer
            .import(source)
            .await
            .with_context(|| format!("Failed to import requirements from {source}"))?;

        let (added, snapshot) = {
            let mut state = self.state.lock().unwrap();
            let snapshot = state.snapshot.get_or_insert_with(WorkspaceSnapshot::default);
            let added = snapshot.merge_requirements(incoming);
            state.dirty = true;
            (added, state.snapshot.clone().unwrap_or_default())
        };

        self.core
            .publish(WorkspaceEvent::ImportCompleted { imported: added })?;
        self.hub
            .broadcast_from(DOMAIN, &BroadcastNote::WorkspaceLoaded { snapshot });
        Ok(added)
    }
}

impl DomainMediator for WorkspaceManagementMediator {
    fn domain(&self) -> &'static str {
        DOMAIN
    }

    fn mark_as_registered(&self) {
        self.core.mark_as_registered();
    }

    fn is_registered(&self) -> bool {
        self.core.is_registered()
    }

    fn can_navigate_back(&self) -> bool {
        self.state.lock().unwrap().step != WorkspaceStep::Browse
    }

    fn can_navigate_forward(&self) -> bool {
        self.state.lock().unwrap().step != WorkspaceStep::Edit
    }

    fn navigate_to_initial_step(&self) {
        self.state.lock().unwrap().step = WorkspaceStep::Browse;
    }

    fn navigate_to_final_step(&self) {
        self.state.lock().unwrap().step = WorkspaceStep::Edit;
    }

    fn handle_broadcast(&self, note: &BroadcastNote) {
        match note {
            BroadcastNote::ProjectOpened { project }
            | BroadcastNote::ProjectCreated { project } => {
                let mut state = self.state.lock().unwrap();
                state.root = Some(project.path.clone());
                if state.snapshot.is_none() {
                    state.snapshot = Some(WorkspaceSnapshot::for_project(project.clone()));
                }
            }
            BroadcastNote::ProjectClosed { .. } => {
                let mut state = self.state.lock().unwrap();
                state.snapshot = None;
                state.root = None;
                state.step = WorkspaceStep::Browse;
                state.dirty = false;
            }
            _ => {}
        }
    }

    fn dispose(&self) {
        self.core.dispose();
    }
}
