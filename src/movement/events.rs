//! Movement notifications
//!
//! Every executor operation returns its outcome directly; observers get the
//! same information for listeners that are not the caller (presentation,
//! encounter systems waiting on a resume token, logs).

use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

use crate::map::HexCoord;
use crate::movement::executor::ResumeToken;

/// A move that ran to the end of its path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveSummary {
    pub session: u64,
    pub from: HexCoord,
    pub to: HexCoord,
    pub hexes_moved: usize,
    pub total_cost: u32,
}

/// A move that was stopped before the end of its path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveCancelled {
    pub session: u64,
    /// Last hex fully arrived at (the origin if no step was taken)
    pub position: HexCoord,
    pub hexes_moved: usize,
    pub hexes_remaining: usize,
}

/// Callbacks invoked by [`MovementExecutor`][crate::movement::MovementExecutor]
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait MovementObserver {
    /// Called once per hex, strictly in path order. `index` is the hex's
    /// position in the path (1 for the first hex after the origin).
    fn on_arrived(&mut self, _hex: HexCoord, _index: usize) {}

    /// Movement paused at `hex`; deliver `token` to resume it.
    fn on_suspended(&mut self, _hex: HexCoord, _token: ResumeToken) {}

    fn on_resumed(&mut self, _token: ResumeToken) {}

    fn on_completed(&mut self, _summary: &MoveSummary) {}

    fn on_cancelled(&mut self, _cancelled: &MoveCancelled) {}
}

/// Flat record of one notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MovementEvent {
    Arrived { hex: HexCoord, index: usize },
    Suspended { hex: HexCoord, token: ResumeToken },
    Resumed { token: ResumeToken },
    Completed(MoveSummary),
    Cancelled(MoveCancelled),
}

/// Observer that records every notification; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<MovementEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MovementEvent> {
        self.events.borrow().clone()
    }

    /// Hexes from `Arrived` events, in order
    pub fn arrivals(&self) -> Vec<HexCoord> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                MovementEvent::Arrived { hex, .. } => Some(*hex),
                _ => None,
            })
            .collect()
    }

    /// The most recent suspension token, if any
    pub fn last_token(&self) -> Option<ResumeToken> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            MovementEvent::Suspended { token, .. } => Some(*token),
            _ => None,
        })
    }

    fn push(&self, event: MovementEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl MovementObserver for EventLog {
    fn on_arrived(&mut self, hex: HexCoord, index: usize) {
        self.push(MovementEvent::Arrived { hex, index });
    }

    fn on_suspended(&mut self, hex: HexCoord, token: ResumeToken) {
        self.push(MovementEvent::Suspended { hex, token });
    }

    fn on_resumed(&mut self, token: ResumeToken) {
        self.push(MovementEvent::Resumed { token });
    }

    fn on_completed(&mut self, summary: &MoveSummary) {
        self.push(MovementEvent::Completed(*summary));
    }

    fn on_cancelled(&mut self, cancelled: &MoveCancelled) {
        self.push(MovementEvent::Cancelled(*cancelled));
    }
}
