use std::sync::{Arc, Mutex};

use anyhow::Context;
use camino::Utf8PathBuf;

use reqbench_core::ProjectInfo;

use crate::mediator::{
    BroadcastHub, BroadcastNote, DomainEvent, DomainMediator, EventHandler, MediatorCore,
    SubscriptionId,
};
use crate::ports::{EventObservers, ProjectStore, UiCoordinator};

pub const DOMAIN: &str = "new_project";

#[derive(Debug, Clone, PartialEq)]
pub enum NewProjectEvent {
    DraftChanged {
        name: String,
        location: Option<Utf8PathBuf>,
    },
    Created {
        project: ProjectInfo,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NewProjectEventKind {
    DraftChanged,
    Created,
}

impl DomainEvent for NewProjectEvent {
    type Kind = NewProjectEventKind;

    fn kind(&self) -> NewProjectEventKind {
        match self {
            NewProjectEvent::DraftChanged { .. } => NewProjectEventKind::DraftChanged,
            NewProjectEvent::Created { .. } => NewProjectEventKind::Created,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DraftStep {
    Details,
    Location,
    Summary,
}

struct DraftState {
    name: String,
    location: Option<Utf8PathBuf>,
    step: DraftStep,
}

/// Project creation wizard.
pub struct NewProjectMediator {
    core: MediatorCore<NewProjectEvent>,
    hub: Arc<BroadcastHub>,
    projects: Arc<dyn ProjectStore>,
    state: Mutex<DraftState>,
}

impl NewProjectMediator {
    pub fn new(
        hub: Arc<BroadcastHub>,
        ui: Arc<dyn UiCoordinator>,
        observers: EventObservers,
        projects: Arc<dyn ProjectStore>,
    ) -> Self {
        Self {
            core: MediatorCore::new(DOMAIN, ui, observers),
            hub,
            projects,
            state: Mutex::new(DraftState {
                name: String::new(),
                location: None,
                step: DraftStep::Details,
            }),
        }
    }

    pub fn subscribe(
        &self,
        kind: NewProjectEventKind,
        handler: EventHandler<NewProjectEvent>,
    ) -> SubscriptionId {
        self.core.subscribe(kind, handler)
    }

    pub fn unsubscribe(&self, kind: NewProjectEventKind, id: SubscriptionId) {
        self.core.unsubscribe(kind, id);
    }

    pub fn set_name(&self, name: impl Into<String>) -> anyhow::Result<()> {
        self.core.ensure_registered()?;
        let (name, location) = {
            let mut state = self.state.lock().unwrap();
            state.name = name.into();
            (state.name.clone(), state.location.clone())
        };
        self.core
            .publish(NewProjectEvent::DraftChanged { name, location })?;
        Ok(())
    }

    pub fn set_location(&self, location: impl Into<Utf8PathBuf>) -> anyhow::Result<()> {
        self.core.ensure_registered()?;
        let (name, location) = {
            let mut state = self.state.lock().unwrap();
            state.location = Some(location.into());
            state.step = DraftStep::Location;
            (state.name.clone(), state.location.clone())
        };
        self.core
            .publish(NewProjectEvent::DraftChanged { name, location })?;
        Ok(())
    }

    pub async fn create_project(&self) -> anyhow::Result<ProjectInfo> {
        self.core.ensure_registered()?;
        let (name, location) = {
            let state = self.state.lock().unwrap();
            (state.name.trim().to_string(), state.location.clone())
        };
        anyhow::ensure!(!name.is_empty(), "Project name cannot be empty");
        anyhow::ensure!(
            name.chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == ' '),
            "Project name must use only letters, digits, spaces, - and _"
        );
        let location = location.ok_or_else(|| anyhow::anyhow!("Project location not chosen"))?;

        let project = self
            .projects
            .create(&name, &location)
            .await
            .with_context(|| format!("Failed to create project {name} at {location}"))?;

        {
            let mut state = self.state.lock().unwrap();
            state.step = DraftStep::Summary;
        }
        self.core.publish(NewProjectEvent::Created {
            project: project.clone(),
        })?;
        self.hub.broadcast_from(
            DOMAIN,
            &BroadcastNote::ProjectCreated {
                project: project.clone(),
            },
        );
        Ok(project)
    }
}

impl DomainMediator for NewProjectMediator {
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
        self.state.lock().unwrap().step != DraftStep::Details
    }

    fn can_navigate_forward(&self) -> bool {
        self.state.lock().unwrap().step != DraftStep::Summary
    }

    fn navigate_to_initial_step(&self) {
        let mut state = self.state.lock().unwrap();
        state.step = DraftStep::Details;
    }

    fn navigate_to_final_step(&self) {
        self.state.lock().unwrap().step = DraftStep::Summary;
    }

    fn handle_broadcast(&self, note: &BroadcastNote) {
        match note {
            // A project opened elsewhere abandons the draft.
            BroadcastNote::ProjectOpened { .. } => {
                let mut state = self.state.lock().unwrap();
                state.name.clear();
                state.location = None;
                state.step = DraftStep::Details;
            }
            _ => {}
        }
    }

    fn dispose(&self) {
        self.core.dispose();
    }
}
