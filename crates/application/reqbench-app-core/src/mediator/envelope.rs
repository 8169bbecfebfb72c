use std::fmt::Debug;
use std::hash::Hash;

use chrono::{DateTime, Utc};

/// Implemented by each domain's closed event enum.
///
/// `Kind` is the dispatch key: a field-less mirror of the enum's variants.
/// Keeping the set of kinds a plain enum makes every domain's event
/// vocabulary auditable at compile time.
pub trait DomainEvent: Clone + Debug + Send + Sync + 'static {
    type Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    fn kind(&self) -> Self::Kind;
}

/// One occurrence of a domain event, stamped at construction.
///
/// Envelopes are immutable once built; two envelopes of the same kind compare
/// by field equality only.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<E> {
    event: E,
    recorded_at: DateTime<Utc>,
}

impl<E: DomainEvent> Envelope<E> {
    pub fn new(event: E) -> Self {
        Self {
            event,
            recorded_at: Utc::now(),
        }
    }

    pub fn event(&self) -> &E {
        &self.event
    }

    pub fn kind(&self) -> E::Kind {
        self.event.kind()
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
