//! The observable projection the rendering layer draws from.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::capabilities::PinControls;
use super::events::{ViewportSpec, ViewportUpdate};

pub const DEFAULT_VIEWPORT: ViewportSpec = ViewportSpec {
    width: 1000,
    height: 660,
};

/// Banner severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Neutral,
    Warning,
}

/// Status banner shown over the preview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub controls: Option<PinControls>,
}

impl Message {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.kind == MessageType::Neutral
            && self.controls.is_none()
    }
}

/// Rendering context of the active frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRenderState {
    pub showing_highlights: bool,
}

impl Default for SnapshotRenderState {
    fn default() -> Self {
        Self {
            showing_highlights: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub is_running: bool,
    pub width: u32,
    pub height: u32,
    pub url: String,
    pub loading: bool,
    /// Set while a snapshot URL (rather than the live one) is displayed.
    pub highlight_url: bool,
    pub message: Message,
    pub snapshot: SnapshotRenderState,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::with_viewport(DEFAULT_VIEWPORT)
    }
}

impl ViewState {
    pub fn with_viewport(viewport: ViewportSpec) -> Self {
        Self {
            is_running: false,
            width: viewport.width,
            height: viewport.height,
            url: String::new(),
            loading: false,
            highlight_url: false,
            message: Message::default(),
            snapshot: SnapshotRenderState::default(),
        }
    }

    pub fn viewport(&self) -> ViewportSpec {
        ViewportSpec {
            width: self.width,
            height: self.height,
        }
    }

    /// Apply whichever dimensions the update carries.
    pub fn update_dimensions(&mut self, update: ViewportUpdate) {
        if let Some(width) = update.viewport_width {
            self.width = width;
        }
        if let Some(height) = update.viewport_height {
            self.height = height;
        }
    }

    pub fn clear_message(&mut self) {
        self.message = Message::default();
    }
}

/// Shared handle to a [`ViewState`].
///
/// Owned by whoever renders; the controller receives a clone and mutates
/// through it. Every mutation notifies subscribers.
#[derive(Debug, Clone)]
pub struct ViewStore {
    tx: Arc<watch::Sender<ViewState>>,
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new(ViewState::default())
    }
}

impl ViewStore {
    pub fn new(state: ViewState) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self { tx: Arc::new(tx) }
    }

    /// Receive a notification after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.tx.subscribe()
    }

    /// Clone of the current state.
    pub fn get(&self) -> ViewState {
        self.tx.borrow().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn update(&self, f: impl FnOnce(&mut ViewState)) {
        self.tx.send_modify(f);
    }
}
