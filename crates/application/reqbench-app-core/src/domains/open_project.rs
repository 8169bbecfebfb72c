use std::sync::{Arc, Mutex};

use anyhow::Context;

use reqbench_core::ProjectInfo;

use crate::mediator::{
    BroadcastHub, BroadcastNote, DomainEvent, DomainMediator, EventHandler, MediatorCore,
    SubscriptionId,
};
use crate::ports::{EventObservers, ProjectStore, UiCoordinator};

pub const DOMAIN: &str = "open_project";

#[derive(Debug, Clone, PartialEq)]
pub enum OpenProjectEvent {
    RecentsLoaded { projects: Vec<ProjectInfo> },
    SelectionChanged { index: usize },
    Confirmed { project: ProjectInfo },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenProjectEventKind {
    RecentsLoaded,
    SelectionChanged,
    Confirmed,
}

impl DomainEvent for OpenProjectEvent {
    type Kind = OpenProjectEventKind;

    fn kind(&self) -> OpenProjectEventKind {
        match self {
            OpenProjectEvent::RecentsLoaded { .. } => OpenProjectEventKind::RecentsLoaded,
            OpenProjectEvent::SelectionChanged { .. } => OpenProjectEventKind::SelectionChanged,
            OpenProjectEvent::Confirmed { .. } => OpenProjectEventKind::Confirmed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickerStep {
    ChooseProject,
    Confirm,
}

struct PickerState {
    recents: Vec<ProjectInfo>,
    selected: Option<usize>,
    step: PickerStep,
}

/// Recent-project picker. Confirming opens the project through its own store
/// port and announces `ProjectOpened`; the Project domain adopts the result
/// by translation.
pub struct OpenProjectMediator {
    core: MediatorCore<OpenProjectEvent>,
    hub: Arc<BroadcastHub>,
    projects: Arc<dyn ProjectStore>,
    state: Mutex<PickerState>,
}

impl OpenProjectMediator {
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
            state: Mutex::new(PickerState {
                recents: Vec::new(),
                selected: None,
                step: PickerStep::ChooseProject,
            }),
        }
    }

    pub fn subscribe(
        &self,
        kind: OpenProjectEventKind,
        handler: EventHandler<OpenProjectEvent>,
    ) -> SubscriptionId {
        self.core.subscribe(kind, handler)
    }

    pub fn unsubscribe(&self, kind: OpenProjectEventKind, id: SubscriptionId) {
        self.core.unsubscribe(kind, id);
    }

    pub fn recent_projects(&self) -> Vec<ProjectInfo> {
        self.state.lock().unwrap().recents.clone()
    }

    pub async fn load_recents(&self) -> anyhow::Result<usize> {
        self.core.ensure_registered()?;
        let mut recents = self
            .projects
            .recent()
            .await
            .context("Failed to list recent projects")?;
        recents.truncate(reqbench_config::MAX_RECENT_PROJECTS);

        {
            let mut state = self.state.lock().unwrap();
            state.recents = recents.clone();
            state.selected = None;
        }
        let count = recents.len();
        self.core
            .publish(OpenProjectEvent::RecentsLoaded { projects: recents })?;
        Ok(count)
    }

    pub fn select(&self, index: usize) -> anyhow::Result<()> {
        self.core.ensure_registered()?;
        {
            let mut state = self.state.lock().unwrap();
            anyhow::ensure!(
                index < state.recents.len(),
                "Recent project index {index} out of range"
            );
            state.selected = Some(index);
            state.step = PickerStep::Confirm;
        }
        self.core
            .publish(OpenProjectEvent::SelectionChanged { index })?;
        Ok(())
    }

    pub async fn confirm_selection(&self) -> anyhow::Result<ProjectInfo> {
        self.core.ensure_registered()?;
        let candidate = {
            let state = self.state.lock().unwrap();
            state
                .selected
                .and_then(|ix| state.recents.get(ix).cloned())
                .ok_or_else(|| anyhow::anyhow!("No project selected"))?
        };

        let project = self
            .projects
            .open(&candidate.path)
            .await
            .with_context(|| format!("Failed to open project at {}", candidate.path))?;

        self.core.publish(OpenProjectEvent::Confirmed {
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
}

impl DomainMediator for OpenProjectMediator {
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
        self.state.lock().unwrap().step != PickerStep::ChooseProject
    }

    fn can_navigate_forward(&self) -> bool {
        self.state.lock().unwrap().step != PickerStep::Confirm
    }

    fn navigate_to_initial_step(&self) {
        let mut state = self.state.lock().unwrap();
        state.step = PickerStep::ChooseProject;
        state.selected = None;
    }

    fn navigate_to_final_step(&self) {
        self.state.lock().unwrap().step = PickerStep::Confirm;
    }

    fn handle_broadcast(&self, note: &BroadcastNote) {
        match note {
            // Some other domain finished opening or creating a project; the
            // picker's job is done.
            BroadcastNote::ProjectOpened { .. } | BroadcastNote::ProjectCreated { .. } => {
                let mut state = self.state.lock().unwrap();
                state.step = PickerStep::ChooseProject;
                state.selected = None;
            }
            _ => {}
        }
    }

    fn dispose(&self) {
        self.core.dispose();
    }
}
