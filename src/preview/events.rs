//! Inbound preview events and their payloads.
//!
//! Events use the runner's wire names (`show:snapshot`, `url:changed`, ...)
//! and camelCase payload fields, so a recorded runner stream deserializes
//! directly into [`PreviewEvent`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::capabilities::DomCapture;

/// Identifies one snapshot request (one inspected command), not a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Preview surface dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSpec {
    pub width: u32,
    pub height: u32,
}

/// A partial viewport change. Missing dimensions leave the current value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportUpdate {
    #[serde(default, alias = "width")]
    pub viewport_width: Option<u32>,
    #[serde(default, alias = "height")]
    pub viewport_height: Option<u32>,
}

impl From<ViewportSpec> for ViewportUpdate {
    fn from(spec: ViewportSpec) -> Self {
        Self {
            viewport_width: Some(spec.width),
            viewport_height: Some(spec.height),
        }
    }
}

/// The subset of the runner configuration the preview cares about.
///
/// The runner sends its whole config object; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerConfig {
    #[serde(default)]
    pub viewport_width: Option<u32>,
    #[serde(default)]
    pub viewport_height: Option<u32>,
}

impl RunnerConfig {
    pub fn viewport(&self) -> ViewportUpdate {
        ViewportUpdate {
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
        }
    }
}

/// One captured DOM state plus the page metadata it was taken with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFrame {
    #[serde(default)]
    pub id: Option<u64>,
    /// Display name, e.g. "before" / "after". Absent for single unnamed captures.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub dom: DomCapture,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub viewport_width: Option<u32>,
    #[serde(default)]
    pub viewport_height: Option<u32>,
}

/// A bundle of frames describing one inspection moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRequest {
    pub id: RequestId,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub viewport_width: Option<u32>,
    #[serde(default)]
    pub viewport_height: Option<u32>,
    #[serde(default)]
    pub snapshots: Option<Vec<SnapshotFrame>>,
    /// CSS selector of the element to highlight inside each rendered frame.
    /// Runner element handles (`$el`) are not selectors and are ignored.
    #[serde(default)]
    pub target_selector: Option<String>,
}

impl SnapshotRequest {
    /// Frames in display order; empty when the request carried none.
    pub fn frames(&self) -> &[SnapshotFrame] {
        self.snapshots.as_deref().unwrap_or(&[])
    }

    pub fn has_frames(&self) -> bool {
        !self.frames().is_empty()
    }

    pub fn viewport(&self) -> ViewportUpdate {
        ViewportUpdate {
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
        }
    }
}

/// Events the preview controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum PreviewEvent {
    #[serde(rename = "run:start")]
    RunStart,
    #[serde(rename = "run:end")]
    RunEnd,
    #[serde(rename = "viewport")]
    Viewport(ViewportUpdate),
    #[serde(rename = "config")]
    Config(RunnerConfig),
    #[serde(rename = "url:changed")]
    UrlChanged(String),
    #[serde(rename = "page:loading")]
    PageLoading(bool),
    #[serde(rename = "show:snapshot")]
    ShowSnapshot(SnapshotRequest),
    #[serde(rename = "hide:snapshot")]
    HideSnapshot,
    #[serde(rename = "pin:snapshot")]
    PinSnapshot(SnapshotRequest),
    #[serde(rename = "unpin:snapshot")]
    UnpinSnapshot,
}

impl PreviewEvent {
    /// Wire name of the event, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RunStart => "run:start",
            Self::RunEnd => "run:end",
            Self::Viewport(_) => "viewport",
            Self::Config(_) => "config",
            Self::UrlChanged(_) => "url:changed",
            Self::PageLoading(_) => "page:loading",
            Self::ShowSnapshot(_) => "show:snapshot",
            Self::HideSnapshot => "hide:snapshot",
            Self::PinSnapshot(_) => "pin:snapshot",
            Self::UnpinSnapshot => "unpin:snapshot",
        }
    }
}
