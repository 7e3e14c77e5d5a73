//! Collaborators the movement core talks to
//!
//! Injected at construction; the core never looks them up by name.

use crate::map::HexCoord;

/// The agent being moved
pub trait Traveler {
    fn position(&self) -> HexCoord;

    /// Only ever called with a hex the agent has fully arrived at
    fn set_position(&mut self, hex: HexCoord);
}

/// External clock that is charged for completed moves
pub trait TurnClock {
    fn advance(&mut self, turns: u32);
}

/// Checked once per arrival; `true` suspends movement
pub trait InterruptSource {
    fn is_interrupted(&self) -> bool;
}

impl<F> InterruptSource for F
where
    F: Fn() -> bool,
{
    fn is_interrupted(&self) -> bool {
        self()
    }
}

/// Interrupt source that never fires
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverInterrupted;

impl InterruptSource for NeverInterrupted {
    fn is_interrupted(&self) -> bool {
        false
    }
}

/// Minimal agent: just a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Walker {
    pub position: HexCoord,
}

impl Walker {
    pub fn at(position: HexCoord) -> Self {
        Self { position }
    }
}

impl Traveler for Walker {
    fn position(&self) -> HexCoord {
        self.position
    }

    fn set_position(&mut self, hex: HexCoord) {
        self.position = hex;
    }
}

/// Clock that accumulates turns and counts how often it was charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnCounter {
    pub elapsed: u64,
    pub advances: u32,
}

impl TurnClock for TurnCounter {
    fn advance(&mut self, turns: u32) {
        self.elapsed += u64::from(turns);
        self.advances += 1;
    }
}
