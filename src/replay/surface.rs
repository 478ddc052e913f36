use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::preview::{DomCapture, DomSurface, SnapshotFrame, SnapshotRequest};

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DomOp {
    Detach,
    Restore { body: String },
    Highlight {
        frame: Option<String>,
        selector: String,
    },
}

#[derive(Debug)]
struct SurfaceInner {
    current: DomCapture,
    ops: Vec<DomOp>,
}

/// In-memory DOM surface that records every call.
///
/// Clones share state, so a caller can hand one clone to the controller and
/// inspect the other.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    inner: Arc<Mutex<SurfaceInner>>,
}

impl RecordingSurface {
    pub fn new(live: DomCapture) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SurfaceInner {
                current: live,
                ops: Vec::new(),
            })),
        }
    }

    pub fn ops(&self) -> Vec<DomOp> {
        self.inner.lock().ops.clone()
    }

    /// DOM currently on the surface.
    pub fn current(&self) -> DomCapture {
        self.inner.lock().current.clone()
    }
}

impl DomSurface for RecordingSurface {
    fn detach(&mut self) -> DomCapture {
        let mut inner = self.inner.lock();
        inner.ops.push(DomOp::Detach);
        inner.current.clone()
    }

    fn restore(&mut self, capture: &DomCapture) {
        let mut inner = self.inner.lock();
        inner.ops.push(DomOp::Restore {
            body: capture.body.clone(),
        });
        inner.current = capture.clone();
    }

    fn highlight(&mut self, frame: &SnapshotFrame, request: &SnapshotRequest) {
        let Some(selector) = request.target_selector.clone() else {
            return;
        };
        tracing::trace!(selector = %selector, "Highlighting element");
        self.inner.lock().ops.push(DomOp::Highlight {
            frame: frame.name.clone(),
            selector,
        });
    }
}
