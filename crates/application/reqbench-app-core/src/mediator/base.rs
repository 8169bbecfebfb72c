use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::mediator::envelope::{DomainEvent, Envelope};
use crate::mediator::error::MediatorError;
use crate::mediator::registry::{EventHandler, SubscriptionId, SubscriptionRegistry};
use crate::ports::{EventObservers, UiCoordinator};

/// Event plumbing shared by every domain mediator: the private subscription
/// registry, the registration guard and the UI-thread marshal.
///
/// The guard is one-way (`Unregistered -> Registered`); publishing and domain
/// operations are refused until the owning container finishes wiring and
/// calls `mark_as_registered`. Subscribing is allowed at any time so
/// view-models can attach during construction.
pub struct MediatorCore<E: DomainEvent> {
    registry: Arc<SubscriptionRegistry<E>>,
    ui: Arc<dyn UiCoordinator>,
    registered: AtomicBool,
}

impl<E: DomainEvent> MediatorCore<E> {
    pub fn new(domain: &'static str, ui: Arc<dyn UiCoordinator>, observers: EventObservers) -> Self {
        Self {
            registry: Arc::new(SubscriptionRegistry::new(
                domain,
                observers.monitor,
                observers.replay,
            )),
            ui,
            registered: AtomicBool::new(false),
        }
    }

    pub fn domain(&self) -> &'static str {
        self.registry.domain()
    }

    pub fn subscribe(&self, kind: E::Kind, handler: EventHandler<E>) -> SubscriptionId {
        self.registry.subscribe(kind, handler)
    }

    pub fn unsubscribe(&self, kind: E::Kind, id: SubscriptionId) {
        self.registry.unsubscribe(kind, id);
    }

    pub fn handler_count(&self, kind: E::Kind) -> usize {
        self.registry.handler_count(kind)
    }

    pub fn mark_as_registered(&self) {
        self.registered.store(true, Ordering::Release);
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    pub fn ensure_registered(&self) -> Result<(), MediatorError> {
        if self.is_registered() {
            Ok(())
        } else {
            Err(MediatorError::NotRegistered {
                domain: self.domain(),
            })
        }
    }

    /// Delivers the event to every local subscriber, synchronously and in
    /// registration order, marshalled through the UI coordinator.
    pub fn publish(&self, event: E) -> Result<(), MediatorError> {
        self.ensure_registered()?;
        let registry = self.registry.clone();
        let envelope = Envelope::new(event);
        self.ui.invoke(Box::new(move || registry.publish(&envelope)));
        Ok(())
    }

    /// Publish variant for broadcast translation and navigation side effects,
    /// where there is no caller to surface the guard error to. A refused
    /// publish is logged as suspicious instead.
    pub fn publish_translated(&self, event: E) {
        if let Err(e) = self.publish(event) {
            tracing::warn!("dropped translated {} event: {e}", event_name::<E>());
        }
    }

    pub fn dispose(&self) {
        self.registry.clear();
    }
}

fn event_name<E>() -> &'static str {
    std::any::type_name::<E>().rsplit("::").next().unwrap_or("?")
}
