use std::sync::{Arc, Mutex};

use anyhow::Context;
use camino::Utf8Path;

use reqbench_core::{ProjectInfo, RequirementId};

use crate::mediator::{
    BroadcastHub, BroadcastNote, DomainEvent, DomainMediator, EventHandler, MediatorCore,
    SubscriptionId,
};
use crate::ports::{EventObservers, ProjectStore, UiCoordinator};

pub const DOMAIN: &str = "project";

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectEvent {
    Opened { project: ProjectInfo },
    Closed { name: String },
    CurrentRequirementChanged { requirement_id: RequirementId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectEventKind {
    Opened,
    Closed,
    CurrentRequirementChanged,
}

impl DomainEvent for ProjectEvent {
    type Kind = ProjectEventKind;

    fn kind(&self) -> ProjectEventKind {
        match self {
            ProjectEvent::Opened { .. } => ProjectEventKind::Opened,
            ProjectEvent::Closed { .. } => ProjectEventKind::Closed,
            ProjectEvent::CurrentRequirementChanged { .. } => {
                ProjectEventKind::CurrentRequirementChanged
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProjectStep {
    Overview,
    Requirements,
    Detail,
}

struct ProjectState {
    current: Option<ProjectInfo>,
    current_requirement: Option<RequirementId>,
    step: ProjectStep,
}

/// Owns the currently open project and the requirement the user is looking
/// at. Foreign domains open projects on its behalf (picker and creation
/// wizards); it adopts those by translation rather than by reference.
pub struct ProjectMediator {
    core: MediatorCore<ProjectEvent>,
    hub: Arc<BroadcastHub>,
    projects: Arc<dyn ProjectStore>,
    state: Mutex<ProjectState>,
}

impl ProjectMediator {
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
            state: Mutex::new(ProjectState {
                current: None,
                current_requirement: None,
                step: ProjectStep::Overview,
            }),
        }
    }

    pub fn subscribe(
        &self,
        kind: ProjectEventKind,
        handler: EventHandler<ProjectEvent>,
    ) -> SubscriptionId {
        self.core.subscribe(kind, handler)
    }

    pub fn unsubscribe(&self, kind: ProjectEventKind, id: SubscriptionId) {
        self.core.unsubscribe(kind, id);
    }

    pub fn current_project(&self) -> Option<ProjectInfo> {
        self.state.lock().unwrap().current.clone()
    }

    pub fn current_requirement(&self) -> Option<RequirementId> {
        self.state.lock().unwrap().current_requirement.clone()
    }

    pub async fn open_project(&self, path: &Utf8Path) -> anyhow::Result<ProjectInfo> {
        self.core.ensure_registered()?;
        let project = self
            .projects
            .open(path)
            .await
            .with_context(|| format!("Failed to open project at {path}"))?;

        self.adopt(project.clone());
        self.core.publish(ProjectEvent::Opened {
            project: project.clone(),
        })?;
        self.hub.broadcast_from(
            DOMAIN,
            &BroadcastNote::ProjectOpened {
                project: project.clone(),
            },
        );
        Ok(project)
    }

    /// Closing with nothing open is a no-op.
    pub fn close_project(&self) -> anyhow::Result<()> {
        self.core.ensure_registered()?;
        let closed = {
            let mut state = self.state.lock().unwrap();
            let closed = state.current.take();
            state.current_requirement = None;
            state.step = ProjectStep::Overview;
            closed
        };
        let Some(project) = closed else {
            return Ok(());
        };

        self.core.publish(ProjectEvent::Closed {
            name: project.name.clone(),
        })?;
        self.hub.broadcast_from(
            DOMAIN,
            &BroadcastNote::ProjectClosed {
                name: project.name,
            },
        );
        Ok(())
    }

    pub fn select_requirement(&self, requirement_id: RequirementId) -> anyhow::Result<()> {
        self.core.ensure_registered()?;
        anyhow::ensure!(
            self.state.lock().unwrap().current.is_some(),
            "Cannot select a requirement without an open project"
        );

        self.state.lock().unwrap().current_requirement = Some(requirement_id.clone());
        self.core.publish(ProjectEvent::CurrentRequirementChanged {
            requirement_id: requirement_id.clone(),
        })?;
        self.hub
            .broadcast_from(DOMAIN, &BroadcastNote::RequirementSelected { requirement_id });
        Ok(())
    }

    fn adopt(&self, project: ProjectInfo) {
        let mut state = self.state.lock().unwrap();
        state.current = Some(project);
        state.current_requirement = None;
        state.step = ProjectStep::Requirements;
    }
}

impl DomainMediator for ProjectMediator {
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
        self.state.lock().unwrap().step != ProjectStep::Overview
    }

    fn can_navigate_forward(&self) -> bool {
        self.state.lock().unwrap().step != ProjectStep::Detail
    }

    fn navigate_to_initial_step(&self) {
        self.state.lock().unwrap().step = ProjectStep::Overview;
    }

    fn navigate_to_final_step(&self) {
        self.state.lock().unwrap().step = ProjectStep::Detail;
    }

    fn handle_broadcast(&self, note: &BroadcastNote) {
        match note {
            BroadcastNote::ProjectOpened { project }
            | BroadcastNote::ProjectCreated { project } => {
                self.adopt(project.clone());
                self.core.publish_translated(ProjectEvent::Opened {
                    project: project.clone(),
                });
            }
            BroadcastNote::ProjectClosed { name } => {
                let mut state = self.state.lock().unwrap();
                state.current = None;
                state.current_requirement = None;
                state.step = ProjectStep::Overview;
                drop(state);
                self.core
                    .publish_translated(ProjectEvent::Closed { name: name.clone() });
            }
            BroadcastNote::RequirementSelected { requirement_id } => {
                self.state.lock().unwrap().current_requirement = Some(requirement_id.clone());
                self.core
                    .publish_translated(ProjectEvent::CurrentRequirementChanged {
                        requirement_id: requirement_id.clone(),
                    });
            }
            _ => {}
        }
    }

    fn dispose(&self) {
        self.core.dispose();
    }
}
