/// Board export module
///
/// This module handles:
/// - Laying out the ranked tiers as a vector scene (scene.rs)
/// - Rasterizing the scene to PNG with fixed parameters (raster.rs)
/// - The Idle/Exporting state machine that keeps one export in flight
/// - Unique file naming and atomic writes

pub mod raster;
pub mod scene;

use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task;

use crate::error::ExportError;
use crate::state::data::RenderMode;
use raster::RasterOptions;
use scene::Scene;

/// Wait after entering presentation mode before capturing
pub const SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Prefix of exported file names
pub const FILE_PREFIX: &str = "tier-list";

/// Export state machine: `Idle -> Exporting -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportPhase {
    #[default]
    Idle,
    /// An export is in flight; `restore` is the mode to go back to
    Exporting { restore: RenderMode },
}

/// Tracks the in-flight export and hands out file names
#[derive(Debug, Default)]
pub struct Exporter {
    phase: ExportPhase,
    last_stamp: i64,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn phase(&self) -> ExportPhase {
        self.phase
    }

    /// Whether an export is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, ExportPhase::Exporting { .. })
    }

    /// Start an export from `current` mode
    ///
    /// Returns `false` (and changes nothing) while another export is in
    /// flight.
    pub fn begin(&mut self, current: RenderMode) -> bool {
        if self.is_busy() {
            log::debug!("Export already in flight, ignoring trigger");
            return false;
        }
        self.phase = ExportPhase::Exporting { restore: current };
        true
    }

    /// Go back to idle; returns the mode that was active before `begin`
    pub fn finish(&mut self) -> Option<RenderMode> {
        match std::mem::take(&mut self.phase) {
            ExportPhase::Exporting { restore } => Some(restore),
            ExportPhase::Idle => None,
        }
    }

    /// Next distinguishing stamp, strictly greater than any handed out so far
    fn next_stamp(&mut self, now_millis: i64) -> i64 {
        self.last_stamp = now_millis.max(self.last_stamp + 1);
        self.last_stamp
    }

    /// File name for an export started at `now_millis`
    pub fn file_name(&mut self, now_millis: i64) -> String {
        format!("{}-{}.png", FILE_PREFIX, self.next_stamp(now_millis))
    }

    /// Full path for a new export in `dir` that does not exist yet
    pub fn target_path(&mut self, dir: &Path) -> PathBuf {
        let now = chrono::Utc::now().timestamp_millis();
        loop {
            let path = dir.join(self.file_name(now));
            if !path.exists() {
                return path;
            }
        }
    }
}

/// Everything needed to produce one export file
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub scene: Scene,
    pub options: RasterOptions,
    pub path: PathBuf,
}

/// Wait for presentation mode to settle
pub async fn settle() {
    tokio::time::sleep(SETTLE_DELAY).await;
}

/// Rasterize and write the job; returns the written path
pub async fn run(job: ExportJob) -> Result<PathBuf, ExportError> {
    // Spawn blocking because rasterization and encoding are CPU-intensive
    task::spawn_blocking(move || run_blocking(job))
        .await
        .map_err(|e| ExportError::Task(e.to_string()))?
}

fn run_blocking(job: ExportJob) -> Result<PathBuf, ExportError> {
    let png = raster::rasterize(&job.scene, &job.options)?;
    write_atomically(&job.path, &png)?;
    log::info!("Exported {} ({} bytes)", job.path.display(), png.len());
    Ok(job.path)
}

/// Write to a temporary sibling, then rename into place
///
/// Either the complete file appears at `path` or nothing does.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let write_err = |e: std::io::Error| ExportError::Write {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp = path.with_extension("png.part");
    if let Err(e) = std::fs::write(&tmp, bytes).and_then(|()| std::fs::rename(&tmp, path)) {
        let _ = std::fs::remove_file(&tmp);
        return Err(write_err(e));
    }
    Ok(())
}
