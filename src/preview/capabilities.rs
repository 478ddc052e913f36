//! Capabilities the controller is polymorphic over.
//!
//! The DOM layer and the pin-controls builder live outside this crate; the
//! controller only talks to them through these traits.

use serde::{Deserialize, Serialize};

use super::events::{RequestId, SnapshotFrame, SnapshotRequest};

/// A detached DOM state: body markup plus the class/style metadata needed to
/// put it back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomCapture {
    pub body: String,
    #[serde(default)]
    pub html_classes: String,
    #[serde(default)]
    pub head_styles: Vec<String>,
    #[serde(default)]
    pub body_styles: Vec<String>,
}

impl DomCapture {
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// DOM primitives of the preview surface.
pub trait DomSurface: Send {
    /// Capture the live DOM. Must not mutate it.
    fn detach(&mut self) -> DomCapture;

    /// Replace the surface's DOM with `capture`. Idempotent.
    fn restore(&mut self, capture: &DomCapture);

    /// Mark `request.target_selector` inside the frame just restored.
    fn highlight(&mut self, frame: &SnapshotFrame, request: &SnapshotRequest);
}

impl<T: DomSurface + ?Sized> DomSurface for Box<T> {
    fn detach(&mut self) -> DomCapture {
        (**self).detach()
    }

    fn restore(&mut self, capture: &DomCapture) {
        (**self).restore(capture)
    }

    fn highlight(&mut self, frame: &SnapshotFrame, request: &SnapshotRequest) {
        (**self).highlight(frame, request)
    }
}

/// Affordances shown while a snapshot is pinned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinControls {
    pub request_id: RequestId,
    /// Names of the frames the user can step through.
    pub frames: Vec<String>,
    /// Whether a highlight on/off toggle applies to this request.
    pub highlight_toggle: bool,
    pub closable: bool,
}

/// Builds the controls descriptor for a pinned request.
pub trait PinControlsFactory: Send {
    fn build(&mut self, request: &SnapshotRequest) -> PinControls;
}

/// Default factory: one entry per frame, a highlight toggle when the request
/// targets an element, and a close button.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPinControls;

impl PinControlsFactory for StandardPinControls {
    fn build(&mut self, request: &SnapshotRequest) -> PinControls {
        let frames = request
            .frames()
            .iter()
            .enumerate()
            .map(|(idx, frame)| {
                frame
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("snapshot {}", idx + 1))
            })
            .collect();

        PinControls {
            request_id: request.id,
            frames,
            highlight_toggle: request.target_selector.is_some(),
            closable: true,
        }
    }
}
