pub mod app;
pub mod domains;
pub mod mediator;
pub mod persistence;
pub mod ports;

pub use app::{AppPorts, ReqbenchApplication};
pub use mediator::{
    BroadcastHub, BroadcastNote, DomainEvent, DomainMediator, Envelope, MediatorError,
    SubscriptionId,
};
pub use persistence::FileWorkspaceStore;
pub use ports::*;
