//! Central configuration constants for runtime limits and defaults.

/// File name of a workspace snapshot inside a project directory.
pub const WORKSPACE_FILE_NAME: &str = "workspace.json";

/// Maximum number of entries kept in the recent-projects list.
pub const MAX_RECENT_PROJECTS: usize = 10;

/// Default number of requirements sent to the generator in one batch.
pub const DEFAULT_GENERATION_BATCH: usize = 5;

/// Minimum allowed generation batch size.
pub const MIN_GENERATION_BATCH: usize = 1;

/// Maximum allowed generation batch size.
pub const MAX_GENERATION_BATCH: usize = 25;

/// Convenience function to clamp a batch value into allowed range.
pub fn clamp_generation_batch(v: usize) -> usize {
    v.clamp(MIN_GENERATION_BATCH, MAX_GENERATION_BATCH)
}
