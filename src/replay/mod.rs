//! Offline replay of recorded preview events.
//!
//! Feeds a JSONL [`EventTape`] through the real runtime against a
//! [`RecordingSurface`] and reports what the preview ended up showing.

mod surface;
mod tape;

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

pub use surface::{DomOp, RecordingSurface};
pub use tape::{EventTape, TapeEntry};

use crate::config::PreviewConfig;
use crate::error::ReplayError;
use crate::preview::{
    spawn_preview, DomCapture, PreviewPhase, RequestId, SnapshotPreviewController, ViewState,
    ViewStore,
};

/// Outcome of a replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub events: usize,
    pub phase: PreviewPhase,
    pub detached_id: Option<RequestId>,
    pub final_state: ViewState,
    pub dom: DomCapture,
    pub dom_ops: Vec<DomOp>,
}

/// Replay `tape` in real time, honoring each entry's offset, then wait
/// `settle` so trailing cycles and restorations can run.
pub async fn replay_tape(
    tape: &EventTape,
    config: PreviewConfig,
    live: DomCapture,
    settle: Duration,
) -> Result<ReplayReport, ReplayError> {
    let view = ViewStore::new(ViewState::with_viewport(config.default_viewport));
    let surface = RecordingSurface::new(live);
    let controller = SnapshotPreviewController::new(view.clone(), surface.clone(), config);
    let (handle, join) = spawn_preview(controller);

    tracing::info!(events = tape.len(), "Replaying event tape");
    let started = Instant::now();
    for entry in &tape.entries {
        tokio::time::sleep_until(started + entry.offset()).await;
        handle.send(entry.event.clone());
    }
    handle.flush().await?;

    tokio::time::sleep(settle).await;
    handle.flush().await?;
    handle.shutdown();

    let controller = join.await?;
    Ok(ReplayReport {
        events: tape.len(),
        phase: controller.phase(),
        detached_id: controller.detached_id(),
        final_state: view.get(),
        dom: surface.current(),
        dom_ops: surface.ops(),
    })
}
