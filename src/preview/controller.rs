//! Snapshot preview state machine.
//!
//! Decides whether the preview surface shows the live page or one of the
//! frames of a snapshot request, cycles multi-frame requests, freezes on pin,
//! and puts the live page back when inspection ends.
//!
//! The controller is a synchronous reducer: [`SnapshotPreviewController::handle`]
//! applies one event and returns the timer [`Effect`]s the host must perform.
//! The host calls back [`advance_cycle`](SnapshotPreviewController::advance_cycle)
//! on every cycle tick and
//! [`complete_restore`](SnapshotPreviewController::complete_restore) when a
//! deferred restoration comes due.

use std::sync::Arc;

use serde::Serialize;

use super::capabilities::{DomCapture, DomSurface, PinControlsFactory, StandardPinControls};
use super::effect::{Effect, RestoreTicket};
use super::events::{PreviewEvent, RequestId, SnapshotRequest, ViewportSpec, ViewportUpdate};
use super::view_state::{MessageType, ViewStore};
use crate::config::PreviewConfig;

/// Live page state cached right before the first frame of a preview session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalState {
    pub dom: DomCapture,
    pub url: String,
    pub viewport: ViewportSpec,
}

/// Coarse lifecycle of the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewPhase {
    /// The live page is shown.
    Live,
    /// A frame is shown, possibly cycling.
    Previewing,
    /// A frame is frozen with controls exposed.
    Pinned,
    /// A restoration to live has been scheduled but has not run yet.
    RestoringPending,
}

#[derive(Debug, Clone)]
struct ActiveFrame {
    request: Arc<SnapshotRequest>,
    index: usize,
}

pub struct SnapshotPreviewController<D, P = StandardPinControls> {
    view: ViewStore,
    dom: D,
    pin_controls: P,
    config: PreviewConfig,
    original: Option<OriginalState>,
    detached_id: Option<RequestId>,
    /// Bumped by every accepted show and by run start; restore tickets
    /// carrying an older epoch are stale.
    epoch: u64,
    pinned: bool,
    cycling: bool,
    restore_pending: bool,
    active: Option<ActiveFrame>,
}

impl<D: DomSurface> SnapshotPreviewController<D, StandardPinControls> {
    pub fn new(view: ViewStore, dom: D, config: PreviewConfig) -> Self {
        Self::with_pin_controls(view, dom, StandardPinControls, config)
    }
}

impl<D: DomSurface, P: PinControlsFactory> SnapshotPreviewController<D, P> {
    pub fn with_pin_controls(
        view: ViewStore,
        dom: D,
        pin_controls: P,
        config: PreviewConfig,
    ) -> Self {
        Self {
            view,
            dom,
            pin_controls,
            config,
            original: None,
            detached_id: None,
            epoch: 0,
            pinned: false,
            cycling: false,
            restore_pending: false,
            active: None,
        }
    }

    pub fn view(&self) -> &ViewStore {
        &self.view
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn phase(&self) -> PreviewPhase {
        if self.pinned {
            PreviewPhase::Pinned
        } else if self.restore_pending {
            PreviewPhase::RestoringPending
        } else if self.original.is_some() {
            PreviewPhase::Previewing
        } else {
            PreviewPhase::Live
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn is_cycling(&self) -> bool {
        self.cycling
    }

    pub fn detached_id(&self) -> Option<RequestId> {
        self.detached_id
    }

    pub fn original_state(&self) -> Option<&OriginalState> {
        self.original.as_ref()
    }

    /// Request id and frame index currently rendered, if any.
    pub fn active_frame(&self) -> Option<(RequestId, usize)> {
        self.active
            .as_ref()
            .map(|active| (active.request.id, active.index))
    }

    /// Apply one inbound event.
    pub fn handle(&mut self, event: PreviewEvent) -> Vec<Effect> {
        tracing::debug!(event = event.name(), phase = ?self.phase(), "Handling preview event");

        let mut effects = Vec::new();
        match event {
            PreviewEvent::RunStart => self.before_run(&mut effects),
            PreviewEvent::RunEnd => {
                tracing::info!("Run finished");
                self.view.update(|state| state.is_running = false);
            }
            PreviewEvent::Viewport(update) => self.update_viewport(update),
            PreviewEvent::Config(config) => self.update_viewport(config.viewport()),
            PreviewEvent::UrlChanged(url) => self.view.update(|state| state.url = url),
            PreviewEvent::PageLoading(loading) => {
                self.view.update(|state| state.loading = loading)
            }
            PreviewEvent::ShowSnapshot(request) => self.show_snapshot(request, &mut effects),
            PreviewEvent::HideSnapshot => self.hide_snapshot(&mut effects),
            PreviewEvent::PinSnapshot(request) => self.pin_snapshot(&request, &mut effects),
            PreviewEvent::UnpinSnapshot => self.unpin_snapshot(&mut effects),
        }
        effects
    }

    /// Render the next frame of a cycling request.
    pub fn advance_cycle(&mut self) {
        if !self.cycling || self.pinned {
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let count = active.request.frames().len();
        if count == 0 {
            return;
        }

        active.index = (active.index + 1) % count;
        let request = Arc::clone(&active.request);
        let index = active.index;
        self.render_frame(&request, index);
    }

    /// Run a deferred restoration scheduled by hide or unpin.
    ///
    /// Does nothing when a newer show or a run start superseded the ticket,
    /// when the preview got pinned meanwhile, or when there is nothing left
    /// to restore.
    pub fn complete_restore(&mut self, ticket: RestoreTicket) {
        if ticket.epoch != self.epoch {
            tracing::debug!(
                ticket_epoch = ticket.epoch,
                epoch = self.epoch,
                "Skipping superseded restoration"
            );
            return;
        }
        self.restore_pending = false;
        if self.pinned {
            tracing::debug!("Skipping restoration while pinned");
            return;
        }
        let Some(original) = self.original.take() else {
            return;
        };

        tracing::debug!(epoch = self.epoch, "Restoring live page");
        self.view.update(|state| {
            state.update_dimensions(original.viewport.into());
            state.url = original.url.clone();
        });
        // An empty capture has no body to put back
        if !original.dom.is_empty() {
            self.dom.restore(&original.dom);
        }
        self.view.update(|state| state.clear_message());

        self.detached_id = None;
        self.active = None;
    }

    fn before_run(&mut self, effects: &mut Vec<Effect>) {
        tracing::info!("Run started, resetting preview");
        self.stop_cycle(effects);
        self.epoch += 1;
        self.original = None;
        self.detached_id = None;
        self.pinned = false;
        self.restore_pending = false;
        self.active = None;
        self.view.update(|state| {
            state.is_running = true;
            state.clear_message();
        });
    }

    fn update_viewport(&mut self, update: ViewportUpdate) {
        self.view.update(|state| state.update_dimensions(update));
    }

    fn show_snapshot(&mut self, request: SnapshotRequest, effects: &mut Vec<Effect>) {
        if self.pinned {
            tracing::debug!(request_id = %request.id, "Ignoring show while pinned");
            return;
        }

        if self.view.read(|state| state.is_running) {
            tracing::warn!(request_id = %request.id, "Snapshot requested while tests are running");
            let title = self.config.messages.tests_running.clone();
            self.set_warning(title);
            return;
        }

        if !request.has_frames() {
            tracing::warn!(request_id = %request.id, "Snapshot request carried no frames");
            self.stop_cycle(effects);
            let title = self.config.messages.missing_snapshot.clone();
            self.set_warning(title);
            return;
        }

        self.view.update(|state| state.highlight_url = true);
        if self.original.is_none() {
            self.store_original_state();
        }

        self.detached_id = Some(request.id);
        self.epoch += 1;
        self.restore_pending = false;

        self.view.update(|state| {
            state.update_dimensions(request.viewport());
            state.url = request.url.clone();
        });

        let frames = request.frames().len();
        tracing::debug!(request_id = %request.id, frames, epoch = self.epoch, "Showing snapshot");

        if frames > 1 {
            self.cycling = true;
            effects.push(Effect::StartCycle {
                period: self.config.cycle_interval,
            });
        } else {
            self.stop_cycle(effects);
        }

        let request = Arc::new(request);
        self.active = Some(ActiveFrame {
            request: Arc::clone(&request),
            index: 0,
        });
        self.render_frame(&request, 0);
    }

    fn hide_snapshot(&mut self, effects: &mut Vec<Effect>) {
        if self.pinned {
            tracing::debug!("Ignoring hide while pinned");
            return;
        }

        self.stop_cycle(effects);
        self.view.update(|state| state.highlight_url = false);

        if self.original.is_none() {
            self.view.update(|state| state.clear_message());
            return;
        }

        self.restore_pending = true;
        effects.push(Effect::DeferRestore(RestoreTicket { epoch: self.epoch }));
    }

    fn pin_snapshot(&mut self, request: &SnapshotRequest, effects: &mut Vec<Effect>) {
        if !request.has_frames() {
            return;
        }

        tracing::debug!(request_id = %request.id, "Pinning snapshot");
        self.stop_cycle(effects);
        self.pinned = true;

        let controls = self.pin_controls.build(request);
        let title = self.config.messages.pinned_title.clone();
        self.view.update(|state| {
            state.message.title = Some(title);
            state.message.controls = Some(controls);
        });
    }

    fn unpin_snapshot(&mut self, effects: &mut Vec<Effect>) {
        tracing::debug!("Unpinning snapshot");
        self.pinned = false;

        let title = self.config.messages.snapshot_title.clone();
        self.view.update(|state| {
            state.message.title = Some(title);
            state.message.controls = None;
            state.snapshot.showing_highlights = true;
        });

        self.hide_snapshot(effects);
    }

    fn render_frame(&mut self, request: &SnapshotRequest, index: usize) {
        let Some(frame) = request.frames().get(index) else {
            return;
        };

        let title = self.config.messages.snapshot_title.clone();
        self.view.update(|state| {
            state.message.title = Some(title);
            state.message.description = frame.name.clone();
            state.message.kind = MessageType::Neutral;
        });

        self.dom.restore(&frame.dom);

        if request.target_selector.is_some() {
            self.dom.highlight(frame, request);
        }
    }

    fn store_original_state(&mut self) {
        let dom = self.dom.detach();
        let (url, viewport) = self.view.read(|state| (state.url.clone(), state.viewport()));
        self.original = Some(OriginalState { dom, url, viewport });
    }

    fn stop_cycle(&mut self, effects: &mut Vec<Effect>) {
        if self.cycling {
            self.cycling = false;
            effects.push(Effect::StopCycle);
        }
    }

    fn set_warning(&mut self, title: String) {
        self.view.update(|state| {
            state.message.title = Some(title);
            state.message.description = None;
            state.message.kind = MessageType::Warning;
        });
    }
}
