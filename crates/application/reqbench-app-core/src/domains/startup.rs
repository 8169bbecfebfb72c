use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::mediator::{
    BroadcastHub, BroadcastNote, DomainEvent, DomainMediator, EventHandler, MediatorCore,
    SubscriptionId,
};
use crate::ports::{EventObservers, UiCoordinator};

pub const DOMAIN: &str = "startup";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupStep {
    Splash,
    LoadingWorkspace,
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StartupEvent {
    Started,
    StepAdvanced { step: StartupStep },
    Completed { elapsed: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartupEventKind {
    Started,
    StepAdvanced,
    Completed,
}

impl DomainEvent for StartupEvent {
    type Kind = StartupEventKind;

    fn kind(&self) -> StartupEventKind {
        match self {
            StartupEvent::Started => StartupEventKind::Started,
            StartupEvent::StepAdvanced { .. } => StartupEventKind::StepAdvanced,
            StartupEvent::Completed { .. } => StartupEventKind::Completed,
        }
    }
}

struct StartupState {
    step: StartupStep,
    begun_at: Option<Instant>,
}

/// Drives the boot sequence and hands off to the rest of the application:
/// its final step computes the elapsed boot duration, publishes `Completed`
/// and broadcasts the hand-off. Boot never navigates backwards.
pub struct StartupMediator {
    core: MediatorCore<StartupEvent>,
    hub: Arc<BroadcastHub>,
    state: Mutex<StartupState>,
}

impl StartupMediator {
    pub fn new(hub: Arc<BroadcastHub>, ui: Arc<dyn UiCoordinator>, observers: EventObservers) -> Self {
        Self {
            core: MediatorCore::new(DOMAIN, ui, observers),
            hub,
            state: Mutex::new(StartupState {
                step: StartupStep::Splash,
                begun_at: None,
            }),
        }
    }

    pub fn subscribe(
        &self,
        kind: StartupEventKind,
        handler: EventHandler<StartupEvent>,
    ) -> SubscriptionId {
        self.core.subscribe(kind, handler)
    }

    pub fn unsubscribe(&self, kind: StartupEventKind, id: SubscriptionId) {
        self.core.unsubscribe(kind, id);
    }

    pub fn current_step(&self) -> StartupStep {
        self.state.lock().unwrap().step
    }

    pub fn begin(&self) -> anyhow::Result<()> {
        self.core.ensure_registered()?;
        {
            let mut state = self.state.lock().unwrap();
            state.begun_at = Some(Instant::now());
            state.step = StartupStep::Splash;
        }
        self.core.publish(StartupEvent::Started)?;
        Ok(())
    }

    pub fn advance(&self) -> anyhow::Result<()> {
        self.core.ensure_registered()?;
        let next = {
            let mut state = self.state.lock().unwrap();
            let next = match state.step {
                StartupStep::Splash => Some(StartupStep::LoadingWorkspace),
                StartupStep::LoadingWorkspace | StartupStep::Ready => None,
            };
            if let Some(step) = next {
                state.step = step;
            }
            next
        };
        if let Some(step) = next {
            self.core.publish(StartupEvent::StepAdvanced { step })?;
        }
        Ok(())
    }

    fn complete(&self) {
        let elapsed = {
            let mut state = self.state.lock().unwrap();
            if state.step == StartupStep::Ready {
                return;
            }
            state.step = StartupStep::Ready;
            state.begun_at.map(|t| t.elapsed()).unwrap_or_default()
        };

        if !self.core.is_registered() {
            tracing::warn!("startup completed before the container finished registration");
            return;
        }
        self.core
            .publish_translated(StartupEvent::Completed { elapsed });
        self.hub
            .broadcast_from(DOMAIN, &BroadcastNote::StartupCompleted { elapsed });
    }
}

impl DomainMediator for StartupMediator {
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
        self.state.lock().unwrap().step != StartupStep::Ready
    }

    fn navigate_to_initial_step(&self) {
        self.state.lock().unwrap().step = StartupStep::Splash;
    }

    /// Completes the boot hand-off. Repeat calls are no-ops: the completion
    /// event and broadcast fire once.
    fn navigate_to_final_step(&self) {
        self.complete();
    }

    fn handle_broadcast(&self, note: &BroadcastNote) {
        match note {
            // The workspace arriving is what the boot screen waits for.
            BroadcastNote::WorkspaceLoaded { .. } => {
                if self.state.lock().unwrap().step == StartupStep::LoadingWorkspace {
                    self.complete();
                }
            }
            _ => {}
        }
    }

    fn dispose(&self) {
        self.core.dispose();
    }
}
