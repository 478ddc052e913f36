pub mod config;
pub mod error;
pub mod preview;
pub mod replay;
pub mod util;

pub use config::PreviewConfig;
pub use error::{ConfigError, ReplayError, RuntimeStopped};
pub use preview::{
    spawn_preview, DomCapture, DomSurface, Effect, Message, MessageType, PinControls,
    PinControlsFactory, PreviewEvent, PreviewHandle, PreviewPhase, RequestId, SnapshotFrame,
    SnapshotPreviewController, SnapshotRequest, StandardPinControls, ViewState, ViewStore,
};
pub use replay::{replay_tape, DomOp, EventTape, RecordingSurface, ReplayReport};
