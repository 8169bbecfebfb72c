use std::sync::{Arc, Mutex};

use reqbench_core::{LlmHealth, RequirementId, RequirementProgress, Severity};

use crate::mediator::{
    BroadcastNote, DomainEvent, DomainMediator, EventHandler, MediatorCore, SubscriptionId,
};
use crate::ports::{EventObservers, UiCoordinator};

pub const DOMAIN: &str = "notification";

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    StatusPosted {
        severity: Severity,
        message: String,
    },
    ProgressUpdated {
        progress: RequirementProgress,
    },
    LlmHealthUpdated {
        health: LlmHealth,
    },
    CurrentRequirementChanged {
        requirement_id: RequirementId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationEventKind {
    StatusPosted,
    ProgressUpdated,
    LlmHealthUpdated,
    CurrentRequirementChanged,
}

impl DomainEvent for NotificationEvent {
    type Kind = NotificationEventKind;

    fn kind(&self) -> NotificationEventKind {
        match self {
            NotificationEvent::StatusPosted { .. } => NotificationEventKind::StatusPosted,
            NotificationEvent::ProgressUpdated { .. } => NotificationEventKind::ProgressUpdated,
            NotificationEvent::LlmHealthUpdated { .. } => NotificationEventKind::LlmHealthUpdated,
            NotificationEvent::CurrentRequirementChanged { .. } => {
                NotificationEventKind::CurrentRequirementChanged
            }
        }
    }
}

/// Everything the status surface shows, aggregated from the other domains.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationSummary {
    pub active_project: Option<String>,
    pub progress: RequirementProgress,
    pub llm: LlmHealth,
    pub current_requirement: Option<RequirementId>,
    pub last_fault: Option<(String, String)>,
}

/// Aggregates status from every other domain. It never computes requirement
/// statistics itself: the counters arriving in `RequirementsProgressChanged`
/// are adopted as-is.
///
/// Notification has no workflow steps; both navigation capabilities are
/// permanently false and the transition operations are no-ops.
pub struct NotificationMediator {
    core: MediatorCore<NotificationEvent>,
    state: Mutex<NotificationSummary>,
}

impl NotificationMediator {
    pub fn new(ui: Arc<dyn UiCoordinator>, observers: EventObservers) -> Self {
        Self {
            core: MediatorCore::new(DOMAIN, ui, observers),
            state: Mutex::new(NotificationSummary::default()),
        }
    }

    pub fn subscribe(
        &self,
        kind: NotificationEventKind,
        handler: EventHandler<NotificationEvent>,
    ) -> SubscriptionId {
        self.core.subscribe(kind, handler)
    }

    pub fn unsubscribe(&self, kind: NotificationEventKind, id: SubscriptionId) {
        self.core.unsubscribe(kind, id);
    }

    pub fn summary(&self) -> NotificationSummary {
        self.state.lock().unwrap().clone()
    }

    pub fn post_status(&self, severity: Severity, message: impl Into<String>) -> anyhow::Result<()> {
        self.core.ensure_registered()?;
        self.core.publish(NotificationEvent::StatusPosted {
            severity,
            message: message.into(),
        })?;
        Ok(())
    }

    fn post_translated(&self, severity: Severity, message: String) {
        self.core
            .publish_translated(NotificationEvent::StatusPosted { severity, message });
    }
}

impl DomainMediator for NotificationMediator {
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
        false
    }

    fn can_navigate_forward(&self) -> bool {
        false
    }

    fn navigate_to_initial_step(&self) {}

    fn navigate_to_final_step(&self) {}

    fn handle_broadcast(&self, note: &BroadcastNote) {
        match note {
            BroadcastNote::ProjectOpened { project } => {
                self.state.lock().unwrap().active_project = Some(project.name.clone());
                self.post_translated(Severity::Info, format!("Opened project {}", project.name));
            }
            BroadcastNote::ProjectCreated { project } => {
                self.state.lock().unwrap().active_project = Some(project.name.clone());
                self.post_translated(Severity::Info, format!("Created project {}", project.name));
            }
            BroadcastNote::ProjectClosed { name } => {
                {
                    let mut state = self.state.lock().unwrap();
                    state.active_project = None;
                    state.progress = RequirementProgress::default();
                    state.current_requirement = None;
                }
                self.post_translated(Severity::Info, format!("Closed project {name}"));
            }
            BroadcastNote::WorkspaceSaved {
                path,
                requirement_count,
            } => {
                self.post_translated(
                    Severity::Info,
                    format!("Workspace saved to {path} ({requirement_count} requirements)"),
                );
            }
            BroadcastNote::RequirementSelected { requirement_id } => {
                self.state.lock().unwrap().current_requirement = Some(requirement_id.clone());
                self.core
                    .publish_translated(NotificationEvent::CurrentRequirementChanged {
                        requirement_id: requirement_id.clone(),
                    });
            }
            // Adopted verbatim: the sender owns these numbers.
            BroadcastNote::RequirementsProgressChanged { progress, .. } => {
                self.state.lock().unwrap().progress = *progress;
                self.core
                    .publish_translated(NotificationEvent::ProgressUpdated {
                        progress: *progress,
                    });
            }
            BroadcastNote::AnalysisStepChanged { domain, step } => {
                self.post_translated(Severity::Info, format!("{domain}: {step}"));
            }
            BroadcastNote::LlmHealthChanged { health } => {
                self.state.lock().unwrap().llm = health.clone();
                self.core
                    .publish_translated(NotificationEvent::LlmHealthUpdated {
                        health: health.clone(),
                    });
                if !health.is_usable() {
                    self.post_translated(
                        Severity::Warning,
                        "Language model backend is unavailable".to_string(),
                    );
                }
            }
            BroadcastNote::StartupCompleted { elapsed } => {
                self.post_translated(
                    Severity::Info,
                    format!("Ready in {:.1}s", elapsed.as_secs_f32()),
                );
            }
            BroadcastNote::DomainFault { domain, message } => {
                self.state.lock().unwrap().last_fault =
                    Some((domain.to_string(), message.clone()));
                self.post_translated(Severity::Error, format!("{domain}: {message}"));
            }
            // Remaining variants are not a notification concern.
            _ => {}
        }
    }

    fn dispose(&self) {
        self.core.dispose();
    }
}
