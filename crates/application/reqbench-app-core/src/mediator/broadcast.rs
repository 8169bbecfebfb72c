use std::sync::{Arc, Mutex};
use std::time::Duration;

use camino::Utf8PathBuf;

use reqbench_core::{LlmHealth, ProjectInfo, RequirementId, RequirementProgress, WorkspaceSnapshot};

use crate::mediator::contract::DomainMediator;

/// The closed union of facts one domain may announce to every other.
///
/// Cross-domain coupling lives entirely in this enum and in the match arms of
/// each mediator's `handle_broadcast`; adding a reaction means adding an arm,
/// never registering a handler across domain lines.
#[derive(Debug, Clone, PartialEq)]
pub enum BroadcastNote {
    ProjectOpened {
        project: ProjectInfo,
    },
    ProjectCreated {
        project: ProjectInfo,
    },
    ProjectClosed {
        name: String,
    },
    WorkspaceLoaded {
        snapshot: WorkspaceSnapshot,
    },
    WorkspaceSaved {
        path: Utf8PathBuf,
        requirement_count: usize,
    },
    RequirementSelected {
        requirement_id: RequirementId,
    },
    /// Authoritative counters. Receivers adopt these numbers verbatim; the
    /// announcing domain owns them and nobody else recomputes them.
    RequirementsProgressChanged {
        progress: RequirementProgress,
        source: &'static str,
    },
    AnalysisStepChanged {
        domain: &'static str,
        step: String,
    },
    LlmHealthChanged {
        health: LlmHealth,
    },
    StartupCompleted {
        elapsed: Duration,
    },
    DomainFault {
        domain: &'static str,
        message: String,
    },
}

/// Fans one domain's note out to every other registered domain, exactly once
/// each, never back to the originator.
pub struct BroadcastHub {
    mediators: Mutex<Vec<Arc<dyn DomainMediator>>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self {
            mediators: Mutex::new(Vec::new()),
        }
    }

    pub fn register(&self, mediator: Arc<dyn DomainMediator>) {
        self.mediators.lock().unwrap().push(mediator);
    }

    pub fn domain_count(&self) -> usize {
        self.mediators.lock().unwrap().len()
    }

    /// Synchronous delivery in registration order. The snapshot is taken
    /// before delivery, so a receiver registering further domains does not
    /// alter the fan-out in flight.
    pub fn broadcast_from(&self, source: &'static str, note: &BroadcastNote) {
        let peers: Vec<Arc<dyn DomainMediator>> = self.mediators.lock().unwrap().clone();
        for mediator in peers.iter().filter(|m| m.domain() != source) {
            mediator.handle_broadcast(note);
        }
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingMediator {
        name: &'static str,
        received: AtomicUsize,
    }

    impl CountingMediator {
        fn new(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                received: AtomicUsize::new(0),
            })
        }
    }

    impl DomainMediator for CountingMediator {
        fn domain(&self) -> &'static str {
            self.name
        }
        fn mark_as_registered(&self) {}
        fn is_registered(&self) -> bool {
            true
        }
        fn can_navigate_back(&self) -> bool {
            false
        }
        fn can_navigate_forward(&self) -> bool {
            false
        }
        fn navigate_to_initial_step(&self) {}
        fn navigate_to_final_step(&self) {}
        fn handle_broadcast(&self, _note: &BroadcastNote) {
            self.received.fetch_add(1, Ordering::SeqCst);
        }
        fn dispose(&self) {}
    }

    #[test]
    fn broadcast_skips_the_originating_domain() {
        let hub = BroadcastHub::new();
        let alpha = CountingMediator::new("alpha");
        let beta = CountingMediator::new("beta");
        let gamma = CountingMediator::new("gamma");
        hub.register(alpha.clone());
        hub.register(beta.clone());
        hub.register(gamma.clone());

        hub.broadcast_from(
            "alpha",
            &BroadcastNote::ProjectClosed {
                name: "demo".into(),
            },
        );

        assert_eq!(alpha.received.load(Ordering::SeqCst), 0);
        assert_eq!(beta.received.load(Ordering::SeqCst), 1);
        assert_eq!(gamma.received.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn each_receiver_sees_one_delivery_per_broadcast() {
        let hub = BroadcastHub::new();
        let alpha = CountingMediator::new("alpha");
        let beta = CountingMediator::new("beta");
        hub.register(alpha.clone());
        hub.register(beta.clone());

        for _ in 0..3 {
            hub.broadcast_from(
                "alpha",
                &BroadcastNote::StartupCompleted {
                    elapsed: Duration::from_millis(10),
                },
            );
        }

        assert_eq!(alpha.received.load(Ordering::SeqCst), 0);
        assert_eq!(beta.received.load(Ordering::SeqCst), 3);
    }
}
