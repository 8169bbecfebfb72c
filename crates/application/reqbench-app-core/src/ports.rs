use std::time::Duration;

use async_trait::async_trait;
use camino::Utf8Path;
use chrono::{DateTime, Utc};

use reqbench_core::{LlmHealth, ProjectInfo, Requirement, TestCase, WorkspaceSnapshot};

/// Marshals UI-visible work onto the presentation thread.
///
/// `invoke` must run the action to completion before returning; event
/// delivery stays synchronous from the publisher's point of view.
pub trait UiCoordinator: Send + Sync {
    fn invoke(&self, action: Box<dyn FnOnce() + Send>);
}

/// Runs actions inline on the calling thread. Suitable for headless use and
/// for hosts whose event loop already owns the calling thread.
pub struct DirectInvokeCoordinator;

impl UiCoordinator for DirectInvokeCoordinator {
    fn invoke(&self, action: Box<dyn FnOnce() + Send>) {
        action();
    }
}

pub trait PerformanceSink: Send + Sync {
    fn record(&self, event_kind: &str, handler_count: usize, elapsed: Duration);
}

pub struct NoopPerformanceSink;

impl PerformanceSink for NoopPerformanceSink {
    fn record(&self, _event_kind: &str, _handler_count: usize, _elapsed: Duration) {}
}

/// Records published envelopes for diagnostic playback. Never read back by
/// the fabric itself.
pub trait ReplaySink: Send + Sync {
    fn record(&self, event_kind: &str, payload: &str, recorded_at: DateTime<Utc>);
}

pub struct NoopReplaySink;

impl ReplaySink for NoopReplaySink {
    fn record(&self, _event_kind: &str, _payload: &str, _recorded_at: DateTime<Utc>) {}
}

/// The observer pair every registry carries. Absent capabilities are the
/// no-op implementations, not `None`.
#[derive(Clone)]
pub struct EventObservers {
    pub monitor: std::sync::Arc<dyn PerformanceSink>,
    pub replay: std::sync::Arc<dyn ReplaySink>,
}

impl Default for EventObservers {
    fn default() -> Self {
        Self {
            monitor: std::sync::Arc::new(NoopPerformanceSink),
            replay: std::sync::Arc::new(NoopReplaySink),
        }
    }
}

#[async_trait]
pub trait ProjectStore: Send + Sync + 'static {
    async fn open(&self, path: &Utf8Path) -> anyhow::Result<ProjectInfo>;
    async fn create(&self, name: &str, location: &Utf8Path) -> anyhow::Result<ProjectInfo>;
    async fn recent(&self) -> anyhow::Result<Vec<ProjectInfo>>;
}

#[async_trait]
pub trait WorkspaceStore: Send + Sync + 'static {
    async fn load(&self, path: &Utf8Path) -> anyhow::Result<WorkspaceSnapshot>;
    async fn save(&self, snapshot: &WorkspaceSnapshot, path: &Utf8Path) -> anyhow::Result<()>;
}

#[async_trait]
pub trait RequirementImporter: Send + Sync + 'static {
    async fn import(&self, source: &str) -> anyhow::Result<Vec<Requirement>>;
}

#[async_trait]
pub trait TestCaseGenerator: Send + Sync + 'static {
    async fn generate(&self, requirement: &Requirement) -> anyhow::Result<Vec<TestCase>>;
    async fn probe_health(&self) -> LlmHealth;
}
