use anyhow::{Context, Result};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};

use reqbench_core::WorkspaceSnapshot;

use crate::ports::WorkspaceStore;

/// JSON-file workspace store. A missing file loads as an empty snapshot;
/// saves go through a temp file and rename so a crash mid-write never leaves
/// a torn workspace behind.
pub struct FileWorkspaceStore;

impl Default for FileWorkspaceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileWorkspaceStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WorkspaceStore for FileWorkspaceStore {
    async fn load(&self, path: &Utf8Path) -> Result<WorkspaceSnapshot> {
        if !path.exists() {
            return Ok(WorkspaceSnapshot::default());
        }
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read workspace {path}"))?;
        let snapshot: WorkspaceSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Workspace {path} is not valid JSON"))?;
        Ok(snapshot)
    }

    async fn save(&self, snapshot: &WorkspaceSnapshot, path: &Utf8Path) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        let path = path.to_owned();
        tokio::task::spawn_blocking(move || atomic_write(&path, json.as_bytes()))
            .await
            .context("Workspace save task was cancelled")?
    }
}

fn atomic_write(path: &Utf8Path, contents: &[u8]) -> Result<()> {
    use std::fs;
    use std::io::Write;

    let tmp_path = Utf8PathBuf::from(format!("{path}.tmp"));

    let mut file = fs::File::create(&tmp_path)
        .with_context(|| format!("Failed to create temp file {tmp_path}"))?;
    file.write_all(contents)
        .with_context(|| format!("Failed to write temp file {tmp_path}"))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync temp file {tmp_path}"))?;
    drop(file);

    match fs::rename(&tmp_path, path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            fs::remove_file(path).ok();
            fs::rename(&tmp_path, path)
                .with_context(|| format!("Failed to replace destination file {path}"))?;
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to rename temp file {tmp_path} to {path}"));
        }
    }

    if let Some(parent) = path.parent() {
        if let Ok(dir) = fs::File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}
