use crate::mediator::broadcast::BroadcastNote;

/// The capability set every domain mediator satisfies, letting a generic
/// navigation host and the broadcast hub drive any domain without knowing it.
///
/// Navigation is a fixed four-operation shape over a domain-private notion of
/// "step": a domain with no intermediate steps answers `false` to both
/// capability queries, a multi-step wizard walks its own enum. The two
/// transition operations always succeed and are idempotent; immediately after
/// `navigate_to_initial_step` the domain cannot navigate back, immediately
/// after `navigate_to_final_step` it cannot navigate forward.
pub trait DomainMediator: Send + Sync {
    fn domain(&self) -> &'static str;

    fn mark_as_registered(&self);
    fn is_registered(&self) -> bool;

    fn can_navigate_back(&self) -> bool;
    fn can_navigate_forward(&self) -> bool;
    fn navigate_to_initial_step(&self);
    fn navigate_to_final_step(&self);

    /// Entry point for foreign-domain facts. Each mediator pattern-matches
    /// the variants it understands and silently ignores the rest.
    fn handle_broadcast(&self, note: &BroadcastNote);

    fn dispose(&self);
}
