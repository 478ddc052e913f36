use std::time::Duration;

/// Identity token captured when a restoration is scheduled.
///
/// The controller bumps its epoch on every accepted show and on run start; a
/// ticket whose epoch no longer matches has been superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreTicket {
    pub(crate) epoch: u64,
}

/// Timer side effects the controller asks its host to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Replace any running cycle timer with one firing every `period`,
    /// first tick one period from now.
    StartCycle { period: Duration },
    /// Drop the cycle timer.
    StopCycle,
    /// Run `complete_restore(ticket)` on the next scheduling tick.
    DeferRestore(RestoreTicket),
}
