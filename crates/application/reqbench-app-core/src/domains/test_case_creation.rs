use std::sync::{Arc, Mutex};

use uuid::Uuid;

use reqbench_core::{
    LlmHealth, Requirement, RequirementId, RequirementProgress, TestCase, WorkspaceSnapshot,
};

use crate::mediator::{
    BroadcastHub, BroadcastNote, DomainEvent, DomainMediator, EventHandler, MediatorCore,
    SubscriptionId,
};
use crate::ports::{EventObservers, TestCaseGenerator, UiCoordinator};

pub const DOMAIN: &str = "test_case_creation";

pub type GenerationRunId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    SelectRequirements,
    Configure,
    Generate,
    Review,
}

impl WizardStep {
    fn next(self) -> Option<Self> {
        match self {
            WizardStep::SelectRequirements => Some(WizardStep::Configure),
            WizardStep::Configure => Some(WizardStep::Generate),
            WizardStep::Generate => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }

    fn prev(self) -> Option<Self> {
        match self {
            WizardStep::SelectRequirements => None,
            WizardStep::Configure => Some(WizardStep::SelectRequirements),
            WizardStep::Generate => Some(WizardStep::Configure),
            WizardStep::Review => Some(WizardStep::Generate),
        }
    }

    fn label(self) -> &'static str {
        match self {
            WizardStep::SelectRequirements => "Select requirements",
            WizardStep::Configure => "Configure generation",
            WizardStep::Generate => "Generate test cases",
            WizardStep::Review => "Review results",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TestCaseEvent {
    StepChanged {
        step: WizardStep,
    },
    GenerationStarted {
        run_id: GenerationRunId,
        requirement_ids: Vec<RequirementId>,
    },
    TestCasesGenerated {
        run_id: GenerationRunId,
        requirement_id: RequirementId,
        cases: Vec<TestCase>,
    },
    GenerationFailed {
        run_id: GenerationRunId,
        message: String,
    },
    ProgressChanged {
        progress: RequirementProgress,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestCaseEventKind {
    StepChanged,
    GenerationStarted,
    TestCasesGenerated,
    GenerationFailed,
    ProgressChanged,
}

impl DomainEvent for TestCaseEvent {
    type Kind = TestCaseEventKind;

    fn kind(&self) -> TestCaseEventKind {
        match self {
            TestCaseEvent::StepChanged { .. } => TestCaseEventKind::StepChanged,
            TestCaseEvent::GenerationStarted { .. } => TestCaseEventKind::GenerationStarted,
            TestCaseEvent::TestCasesGenerated { .. } => TestCaseEventKind::TestCasesGenerated,
            TestCaseEvent::GenerationFailed { .. } => TestCaseEventKind::GenerationFailed,
            TestCaseEvent::ProgressChanged { .. } => TestCaseEventKind::ProgressChanged,
        }
    }
}

/// Outcome of one generation call. A run superseded by a newer one reports
/// `Superseded` and publishes nothing further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    Completed(RequirementProgress),
    Superseded,
}

struct CreationState {
    step: WizardStep,
    selected: Vec<RequirementId>,
    workspace: WorkspaceSnapshot,
    batch_limit: usize,
    run_id: Option<GenerationRunId>,
}

/// The generation wizard, and the single source of truth for requirement
/// progress counters: whatever it announces in
/// `RequirementsProgressChanged`, the other domains adopt.
pub struct TestCaseCreationMediator {
    core: MediatorCore<TestCaseEvent>,
    hub: Arc<BroadcastHub>,
    generator: Arc<dyn TestCaseGenerator>,
    state: Mutex<CreationState>,
}

impl TestCaseCreationMediator {
    pub fn new(
        hub: Arc<BroadcastHub>,
        ui: Arc<dyn UiCoordinator>,
        observers: EventObservers,
        generator: Arc<dyn TestCaseGenerator>,
    ) -> Self {
        Self {
            core: MediatorCore::new(DOMAIN, ui, observers),
            hub,
            generator,
            state: Mutex::new(CreationState {
                step: WizardStep::SelectRequirements,
                selected: Vec::new(),
                workspace: WorkspaceSnapshot::default(),
                batch_limit: reqbench_config::DEFAULT_GENERATION_BATCH,
                run_id: None,
            }),
        }
    }

    pub fn subscribe(
        &self,
        kind: TestCaseEventKind,
        handler: EventHandler<TestCaseEvent>,
    ) -> SubscriptionId {
        self.core.subscribe(kind, handler)
    }

    pub fn unsubscribe(&self, kind: TestCaseEventKind, id: SubscriptionId) {
        self.core.unsubscribe(kind, id);
    }

    pub fn current_step(&self) -> WizardStep {
        self.state.lock().unwrap().step
    }

    pub fn selected_requirements(&self) -> Vec<RequirementId> {
        self.state.lock().unwrap().selected.clone()
    }

    pub fn progress(&self) -> RequirementProgress {
        self.state.lock().unwrap().workspace.progress()
    }

    pub fn select_requirements(&self, ids: Vec<RequirementId>) -> anyhow::Result<()> {
        self.core.ensure_registered()?;
        anyhow::ensure!(
            ids.len() <= reqbench_config::MAX_GENERATION_BATCH,
            "Cannot select more than {} requirements per generation run",
            reqbench_config::MAX_GENERATION_BATCH
        );
        self.state.lock().unwrap().selected = ids;
        Ok(())
    }

    pub fn batch_limit(&self) -> usize {
        self.state.lock().unwrap().batch_limit
    }

    /// Out-of-range values are clamped, not rejected.
    pub fn set_batch_limit(&self, limit: usize) -> anyhow::Result<()> {
        self.core.ensure_registered()?;
        self.state.lock().unwrap().batch_limit = reqbench_config::clamp_generation_batch(limit);
        Ok(())
    }

    /// Probes the generator backend and announces the result to the other
    /// domains.
    pub async fn refresh_llm_health(&self) -> anyhow::Result<LlmHealth> {
        self.core.ensure_registered()?;
        let health = self.generator.probe_health().await;
        self.hub.broadcast_from(
            DOMAIN,
            &BroadcastNote::LlmHealthChanged {
                health: health.clone(),
            },
        );
        Ok(health)
    }

    pub fn advance_step(&self) -> anyhow::Result<()> {
        self.core.ensure_registered()?;
        self.move_step(WizardStep::next);
        Ok(())
    }

    pub fn retreat_step(&self) -> anyhow::Result<()> {
        self.core.ensure_registered()?;
        self.move_step(WizardStep::prev);
        Ok(())
    }

    /// Runs the generator over the selected requirements. Completions are
    /// tagged with a run id; when a newer run has started in the meantime the
    /// results of this one are discarded.
    pub async fn generate_selected(&self) -> anyhow::Result<GenerationOutcome> {
        self.core.ensure_registered()?;

        let (run_id, requirements) = {
            let mut state = self.state.lock().unwrap();
            let run_id = Uuid::new_v4();
            state.run_id = Some(run_id);
            let mut requirements: Vec<Requirement> = state
                .selected
                .iter()
                .filter_map(|id| state.workspace.requirement(id).cloned())
                .collect();
            requirements.truncate(state.batch_limit);
            (run_id, requirements)
        };
        anyhow::ensure!(
            !requirements.is_empty(),
            "No known requirements selected for generation"
        );

        self.core.publish(TestCaseEvent::GenerationStarted {
            run_id,
            requirement_ids: requirements.iter().map(|r| r.id.clone()).collect(),
        })?;

        for requirement in &requirements {
            let generated = match self.generator.generate(requirement).await {
                Ok(cases) => cases,
                Err(e) => {
                    let message = format!("Generation failed for {}: {e:#}", requirement.id);
                    self.core.publish(TestCaseEvent::GenerationFailed {
                        run_id,
                        message: message.clone(),
                    })?;
                    self.hub.broadcast_from(
                        DOMAIN,
                        &BroadcastNote::DomainFault {
                            domain: DOMAIN,
                            message,
                        },
                    );
                    return Err(e);
                }
            };

            let stale = {
                let mut state = self.state.lock().unwrap();
                if state.run_id != Some(run_id) {
                    true
                } else {
                    state
                        .workspace
                        .record_test_cases(&requirement.id, generated.clone());
                    false
                }
            };
            if stale {
                tracing::debug!(
                    "discarding superseded generation run for {}",
                    requirement.id
                );
                return Ok(GenerationOutcome::Superseded);
            }

            self.core.publish(TestCaseEvent::TestCasesGenerated {
                run_id,
                requirement_id: requirement.id.clone(),
                cases: generated,
            })?;
        }

        let progress = self.state.lock().unwrap().workspace.progress();
        self.core
            .publish(TestCaseEvent::ProgressChanged { progress })?;
        self.hub.broadcast_from(
            DOMAIN,
            &BroadcastNote::RequirementsProgressChanged {
                progress,
                source: DOMAIN,
            },
        );
        Ok(GenerationOutcome::Completed(progress))
    }

    fn move_step(&self, transition: impl Fn(WizardStep) -> Option<WizardStep>) {
        let moved = {
            let mut state = self.state.lock().unwrap();
            match transition(state.step) {
                Some(step) => {
                    state.step = step;
                    Some(step)
                }
                None => None,
            }
        };
        if let Some(step) = moved {
            self.announce_step(step);
        }
    }

    fn announce_step(&self, step: WizardStep) {
        self.core.publish_translated(TestCaseEvent::StepChanged { step });
        self.hub.broadcast_from(
            DOMAIN,
            &BroadcastNote::AnalysisStepChanged {
                domain: DOMAIN,
                step: step.label().to_string(),
            },
        );
    }
}

impl DomainMediator for TestCaseCreationMediator {
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
        self.state.lock().unwrap().step != WizardStep::SelectRequirements
    }

    fn can_navigate_forward(&self) -> bool {
        self.state.lock().unwrap().step != WizardStep::Review
    }

    fn navigate_to_initial_step(&self) {
        let changed = {
            let mut state = self.state.lock().unwrap();
            let changed = state.step != WizardStep::SelectRequirements;
            state.step = WizardStep::SelectRequirements;
            changed
        };
        if changed {
            self.announce_step(WizardStep::SelectRequirements);
        }
    }

    fn navigate_to_final_step(&self) {
        let changed = {
            let mut state = self.state.lock().unwrap();
            let changed = state.step != WizardStep::Review;
            state.step = WizardStep::Review;
            changed
        };
        if changed {
            self.announce_step(WizardStep::Review);
        }
    }

    fn handle_broadcast(&self, note: &BroadcastNote) {
        match note {
            // The workbench's working copy. Seeding it also re-announces the
            // authoritative counters so aggregators pick up the new totals.
            BroadcastNote::WorkspaceLoaded { snapshot } => {
                let progress = snapshot.progress();
                {
                    let mut state = self.state.lock().unwrap();
                    state.workspace = snapshot.clone();
                    state
                        .selected
                        .retain(|id| snapshot.requirement(id).is_some());
                }
                self.core
                    .publish_translated(TestCaseEvent::ProgressChanged { progress });
                self.hub.broadcast_from(
                    DOMAIN,
                    &BroadcastNote::RequirementsProgressChanged {
                        progress,
                        source: DOMAIN,
                    },
                );
            }
            BroadcastNote::RequirementSelected { requirement_id } => {
                let mut state = self.state.lock().unwrap();
                if !state.selected.contains(requirement_id)
                    && state.selected.len() < reqbench_config::MAX_GENERATION_BATCH
                {
                    state.selected.push(requirement_id.clone());
                }
            }
            BroadcastNote::ProjectClosed { .. } => {
                let mut state = self.state.lock().unwrap();
                state.step = WizardStep::SelectRequirements;
                state.selected.clear();
                state.workspace = WorkspaceSnapshot::default();
                state.run_id = None;
            }
            _ => {}
        }
    }

    fn dispose(&self) {
        self.core.dispose();
    }
}
