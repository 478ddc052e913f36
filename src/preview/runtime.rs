//! Tokio host for the preview controller.
//!
//! Owns the controller inside a single task and turns its [`Effect`]s into
//! real timers. Events, deferred restorations and cycle ticks are
//! interleaved on that one task, never run in parallel.

use std::collections::VecDeque;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use super::capabilities::{DomSurface, PinControlsFactory};
use super::controller::SnapshotPreviewController;
use super::effect::{Effect, RestoreTicket};
use super::events::PreviewEvent;
use crate::error::RuntimeStopped;

/// Commands to the preview task
#[derive(Debug)]
enum PreviewCommand {
    Event(PreviewEvent),
    /// Reply once everything queued before it, including deferred
    /// restorations, has run.
    Flush(oneshot::Sender<()>),
    Shutdown,
}

/// Handle to feed events into a running preview task
#[derive(Debug, Clone)]
pub struct PreviewHandle {
    cmd_tx: mpsc::UnboundedSender<PreviewCommand>,
}

impl PreviewHandle {
    /// Queue an event. Events are applied in send order.
    pub fn send(&self, event: PreviewEvent) {
        let _ = self.cmd_tx.send(PreviewCommand::Event(event));
    }

    /// Wait until every event sent so far has been applied and any deferred
    /// restoration it scheduled has run.
    pub async fn flush(&self) -> Result<(), RuntimeStopped> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(PreviewCommand::Flush(reply_tx))
            .map_err(|_| RuntimeStopped)?;
        reply_rx.await.map_err(|_| RuntimeStopped)
    }

    /// Stop the task. Its join handle yields the controller.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(PreviewCommand::Shutdown);
    }
}

struct PreviewRuntime<D, P> {
    controller: SnapshotPreviewController<D, P>,
    cmd_rx: mpsc::UnboundedReceiver<PreviewCommand>,
    cycle: Option<Interval>,
    deferred: VecDeque<RestoreTicket>,
    flush_waiters: Vec<oneshot::Sender<()>>,
}

impl<D, P> PreviewRuntime<D, P>
where
    D: DomSurface + 'static,
    P: PinControlsFactory + 'static,
{
    async fn run(mut self) -> SnapshotPreviewController<D, P> {
        loop {
            tokio::select! {
                biased;

                // Events first, so a hide immediately followed by a show
                // lands before the hide's restoration runs
                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        None | Some(PreviewCommand::Shutdown) => break,
                        Some(PreviewCommand::Event(event)) => {
                            let effects = self.controller.handle(event);
                            self.apply(effects);
                        }
                        Some(PreviewCommand::Flush(reply)) => {
                            self.flush_waiters.push(reply);
                            self.answer_flushes();
                        }
                    }
                }
                // Next tick: the event queue is momentarily empty
                Some(ticket) = next_deferred(&mut self.deferred) => {
                    self.controller.complete_restore(ticket);
                    self.answer_flushes();
                }
                _ = next_cycle_tick(&mut self.cycle) => {
                    self.controller.advance_cycle();
                }
            }
        }

        tracing::debug!("Preview runtime stopped");
        self.controller
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartCycle { period } if period.is_zero() => {
                    tracing::warn!("Ignoring zero cycle interval, preview stays on first frame");
                    self.cycle = None;
                }
                Effect::StartCycle { period } => {
                    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    self.cycle = Some(interval);
                }
                Effect::StopCycle => self.cycle = None,
                Effect::DeferRestore(ticket) => self.deferred.push_back(ticket),
            }
        }
    }

    fn answer_flushes(&mut self) {
        if !self.deferred.is_empty() {
            return;
        }
        for reply in self.flush_waiters.drain(..) {
            let _ = reply.send(());
        }
    }
}

async fn next_deferred(deferred: &mut VecDeque<RestoreTicket>) -> Option<RestoreTicket> {
    deferred.pop_front()
}

async fn next_cycle_tick(cycle: &mut Option<Interval>) {
    match cycle {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Spawn the preview task and return a handle plus the task's join handle,
/// which yields the controller after [`PreviewHandle::shutdown`].
pub fn spawn_preview<D, P>(
    controller: SnapshotPreviewController<D, P>,
) -> (PreviewHandle, JoinHandle<SnapshotPreviewController<D, P>>)
where
    D: DomSurface + 'static,
    P: PinControlsFactory + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

    let runtime = PreviewRuntime {
        controller,
        cmd_rx,
        cycle: None,
        deferred: VecDeque::new(),
        flush_waiters: Vec::new(),
    };

    let join = tokio::spawn(runtime.run());
    (PreviewHandle { cmd_tx }, join)
}
