//! Snapshot preview core: events in, view-state mutations and DOM calls out.

pub mod capabilities;
pub mod controller;
pub mod effect;
pub mod events;
pub mod runtime;
pub mod view_state;

pub use capabilities::{
    DomCapture, DomSurface, PinControls, PinControlsFactory, StandardPinControls,
};
pub use controller::{OriginalState, PreviewPhase, SnapshotPreviewController};
pub use effect::{Effect, RestoreTicket};
pub use events::{
    PreviewEvent, RequestId, RunnerConfig, SnapshotFrame, SnapshotRequest, ViewportSpec,
    ViewportUpdate,
};
pub use runtime::{spawn_preview, PreviewHandle};
pub use view_state::{Message, MessageType, SnapshotRenderState, ViewState, ViewStore};
