use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::mediator::envelope::{DomainEvent, Envelope};
use crate::ports::{PerformanceSink, ReplaySink};

pub type EventHandler<E> = Arc<dyn Fn(&Envelope<E>) -> anyhow::Result<()> + Send + Sync>;

/// Token identifying one registration.
///
/// Handler identity is the token, not the closure: registering the same
/// closure twice yields two tokens and two deliveries per publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Entry<E: DomainEvent> {
    id: SubscriptionId,
    handler: EventHandler<E>,
}

impl<E: DomainEvent> Clone for Entry<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: self.handler.clone(),
        }
    }
}

struct Slots<E: DomainEvent> {
    next_id: u64,
    by_kind: HashMap<E::Kind, Vec<Entry<E>>>,
}

/// Per-domain arena of subscriptions, indexed by event kind.
///
/// Dispatch iterates an immutable snapshot of the subscriber list taken under
/// the lock, so a handler may subscribe or unsubscribe mid-dispatch without
/// affecting the publish already underway.
pub struct SubscriptionRegistry<E: DomainEvent> {
    domain: &'static str,
    slots: Mutex<Slots<E>>,
    monitor: Arc<dyn PerformanceSink>,
    replay: Arc<dyn ReplaySink>,
}

impl<E: DomainEvent> SubscriptionRegistry<E> {
    pub fn new(
        domain: &'static str,
        monitor: Arc<dyn PerformanceSink>,
        replay: Arc<dyn ReplaySink>,
    ) -> Self {
        Self {
            domain,
            slots: Mutex::new(Slots {
                next_id: 0,
                by_kind: HashMap::new(),
            }),
            monitor,
            replay,
        }
    }

    pub fn domain(&self) -> &'static str {
        self.domain
    }

    pub fn subscribe(&self, kind: E::Kind, handler: EventHandler<E>) -> SubscriptionId {
        let mut slots = self.slots.lock().unwrap();
        let id = SubscriptionId(slots.next_id);
        slots.next_id += 1;
        slots
            .by_kind
            .entry(kind)
            .or_default()
            .push(Entry { id, handler });
        id
    }

    /// Removing an unknown or already-removed registration is a no-op.
    pub fn unsubscribe(&self, kind: E::Kind, id: SubscriptionId) {
        let mut slots = self.slots.lock().unwrap();
        if let Some(entries) = slots.by_kind.get_mut(&kind) {
            entries.retain(|e| e.id != id);
        }
    }

    pub fn handler_count(&self, kind: E::Kind) -> usize {
        let slots = self.slots.lock().unwrap();
        slots.by_kind.get(&kind).map_or(0, Vec::len)
    }

    /// Invokes every handler registered for the envelope's kind, in
    /// registration order. A failing handler is logged and skipped; the
    /// remaining handlers still run and the publisher never sees the error.
    pub fn publish(&self, envelope: &Envelope<E>) {
        let snapshot: Vec<Entry<E>> = {
            let slots = self.slots.lock().unwrap();
            slots
                .by_kind
                .get(&envelope.kind())
                .cloned()
                .unwrap_or_default()
        };

        let started = Instant::now();
        for entry in &snapshot {
            if let Err(e) = (entry.handler)(envelope) {
                tracing::error!(
                    "{} handler {} failed for {:?}: {e:#}",
                    self.domain,
                    entry.id.0,
                    envelope.kind()
                );
            }
        }

        let kind_name = format!("{:?}", envelope.kind());
        self.monitor
            .record(&kind_name, snapshot.len(), started.elapsed());
        self.replay.record(
            &kind_name,
            &format!("{:?}", envelope.event()),
            envelope.recorded_at(),
        );
    }

    pub fn clear(&self) {
        let mut slots = self.slots.lock().unwrap();
        slots.by_kind.clear();
    }
}
