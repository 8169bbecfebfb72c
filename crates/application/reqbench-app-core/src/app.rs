use std::sync::Arc;

use crate::domains::{
    new_project, notification, open_project, project, startup, test_case_creation,
    workspace_management, NewProjectMediator, NotificationMediator, OpenProjectMediator,
    ProjectMediator, StartupMediator, TestCaseCreationMediator, WorkspaceManagementMediator,
};
use crate::mediator::{BroadcastHub, DomainMediator};
use crate::ports::{
    DirectInvokeCoordinator, EventObservers, ProjectStore, RequirementImporter, TestCaseGenerator,
    UiCoordinator, WorkspaceStore,
};

/// The external collaborators the domains need. Implementations live outside
/// the core (or in test doubles).
#[derive(Clone)]
pub struct AppPorts {
    pub projects: Arc<dyn ProjectStore>,
    pub workspaces: Arc<dyn WorkspaceStore>,
    pub importer: Arc<dyn RequirementImporter>,
    pub generator: Arc<dyn TestCaseGenerator>,
}

/// Owns one mediator per domain, wired around a shared broadcast hub.
///
/// Mediators are created, registered with the hub, and only then marked as
/// registered; domain operations invoked before construction returns are
/// refused by the guard.
pub struct ReqbenchApplication {
    hub: Arc<BroadcastHub>,

    pub project: Arc<ProjectMediator>,
    pub notification: Arc<NotificationMediator>,
    pub startup: Arc<StartupMediator>,
    pub test_case_creation: Arc<TestCaseCreationMediator>,
    pub workspace_management: Arc<WorkspaceManagementMediator>,
    pub open_project: Arc<OpenProjectMediator>,
    pub new_project: Arc<NewProjectMediator>,
}

impl ReqbenchApplication {
    pub fn new(ports: AppPorts) -> Self {
        Self::with_observers(
            ports,
            Arc::new(DirectInvokeCoordinator),
            EventObservers::default(),
        )
    }

    pub fn with_observers(
        ports: AppPorts,
        ui: Arc<dyn UiCoordinator>,
        observers: EventObservers,
    ) -> Self {
        let hub = Arc::new(BroadcastHub::new());

        let project = Arc::new(ProjectMediator::new(
            hub.clone(),
            ui.clone(),
            observers.clone(),
            ports.projects.clone(),
        ));
        let notification = Arc::new(NotificationMediator::new(ui.clone(), observers.clone()));
        let startup = Arc::new(StartupMediator::new(
            hub.clone(),
            ui.clone(),
            observers.clone(),
        ));
        let test_case_creation = Arc::new(TestCaseCreationMediator::new(
            hub.clone(),
            ui.clone(),
            observers.clone(),
            ports.generator.clone(),
        ));
        let workspace_management = Arc::new(WorkspaceManagementMediator::new(
            hub.clone(),
            ui.clone(),
            observers.clone(),
            ports.workspaces.clone(),
            ports.importer.clone(),
        ));
        let open_project = Arc::new(OpenProjectMediator::new(
            hub.clone(),
            ui.clone(),
            observers.clone(),
            ports.projects.clone(),
        ));
        let new_project = Arc::new(NewProjectMediator::new(
            hub.clone(),
            ui,
            observers,
            ports.projects,
        ));

        let app = Self {
            hub,
            project,
            notification,
            startup,
            test_case_creation,
            workspace_management,
            open_project,
            new_project,
        };

        for mediator in app.mediators() {
            app.hub.register(mediator);
        }
        // Wiring is complete; only now may the domains publish.
        for mediator in app.mediators() {
            mediator.mark_as_registered();
        }
        app
    }

    pub fn hub(&self) -> &Arc<BroadcastHub> {
        &self.hub
    }

    pub fn mediators(&self) -> Vec<Arc<dyn DomainMediator>> {
        vec![
            self.project.clone(),
            self.notification.clone(),
            self.startup.clone(),
            self.test_case_creation.clone(),
            self.workspace_management.clone(),
            self.open_project.clone(),
            self.new_project.clone(),
        ]
    }

    pub fn domain_names(&self) -> Vec<&'static str> {
        vec![
            project::DOMAIN,
            notification::DOMAIN,
            startup::DOMAIN,
            test_case_creation::DOMAIN,
            workspace_management::DOMAIN,
            open_project::DOMAIN,
            new_project::DOMAIN,
        ]
    }

    /// Releases every mediator's registry. Safe to call more than once.
    pub fn dispose(&self) {
        for mediator in self.mediators() {
            mediator.dispose();
        }
    }
}
