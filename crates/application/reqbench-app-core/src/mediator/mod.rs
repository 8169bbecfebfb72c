pub mod base;
pub mod broadcast;
pub mod contract;
pub mod envelope;
pub mod error;
pub mod registry;

pub use base::MediatorCore;
pub use broadcast::{BroadcastHub, BroadcastNote};
pub use contract::DomainMediator;
pub use envelope::{DomainEvent, Envelope};
pub use error::MediatorError;
pub use registry::{EventHandler, SubscriptionId, SubscriptionRegistry};
