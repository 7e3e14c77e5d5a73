//! Stepwise movement along a confirmed path
//!
//! One hex per step. After every arrival the interrupt source is consulted;
//! if it fires, the session suspends until the matching [`ResumeToken`] is
//! handed back. Pacing (step and resume delays) belongs to the async driver,
//! not to this state machine.

use serde::Serialize;

use crate::core::error::{MovementError, Result};
use crate::map::HexCoord;
use crate::movement::collaborators::{InterruptSource, TurnClock, Traveler};
use crate::movement::events::{MoveCancelled, MoveSummary, MovementObserver};
use crate::pathfinding::Path;

/// Identifies one suspension of one session. A token from an earlier
/// suspension never resumes a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ResumeToken {
    pub session: u64,
    pub suspension: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExecutorState {
    Idle,
    Moving,
    Suspended,
}

/// Returned by a successful `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveStarted {
    pub session: u64,
    pub from: HexCoord,
    pub to: HexCoord,
    pub hexes: usize,
    pub cost: u32,
}

/// Result of a single `step`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// No active session
    Idle,
    /// Arrived at `hex`; more of the path remains
    Arrived { hex: HexCoord, index: usize },
    /// Arrived at `hex` and the interrupt fired
    Suspended { hex: HexCoord, token: ResumeToken },
    /// Already suspended; nothing moved
    StillSuspended(ResumeToken),
    /// Arrived at the last hex; the clock has been charged
    Completed(MoveSummary),
}

#[derive(Debug)]
struct MovementSession {
    id: u64,
    path: Path,
    cursor: usize,
    total_cost: u32,
    suspended: Option<ResumeToken>,
    suspensions: u32,
}

impl MovementSession {
    fn at_end(&self) -> bool {
        self.cursor + 1 >= self.path.len()
    }

    fn position(&self) -> HexCoord {
        self.path.get(self.cursor).unwrap_or_else(|| self.path.destination())
    }
}

/// Drives one agent along one path at a time
#[derive(Default)]
pub struct MovementExecutor {
    session: Option<MovementSession>,
    next_session: u64,
    observers: Vec<Box<dyn MovementObserver>>,
}

impl std::fmt::Debug for MovementExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovementExecutor")
            .field("session", &self.session)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl MovementExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn MovementObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> ExecutorState {
        match &self.session {
            None => ExecutorState::Idle,
            Some(s) if s.suspended.is_some() => ExecutorState::Suspended,
            Some(_) => ExecutorState::Moving,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    /// Index of the hex the agent last arrived at
    pub fn cursor(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.cursor)
    }

    /// Hexes still to be entered
    pub fn remaining(&self) -> &[HexCoord] {
        match &self.session {
            Some(s) => &s.path.hexes()[s.cursor + 1..],
            None => &[],
        }
    }

    pub fn pending_resume(&self) -> Option<ResumeToken> {
        self.session.as_ref().and_then(|s| s.suspended)
    }

    /// Begin walking `path`. The path must already have passed the
    /// planner's adjacency and passability checks.
    pub fn start(&mut self, path: Path, cost: u32) -> Result<MoveStarted> {
        if self.session.is_some() {
            return Err(MovementError::AlreadyMoving);
        }
        if path.len() < 2 {
            return Err(MovementError::PathTooShort(path.len()));
        }

        self.next_session += 1;
        let started = MoveStarted {
            session: self.next_session,
            from: path.origin(),
            to: path.destination(),
            hexes: path.steps(),
            cost,
        };

        tracing::info!(
            session = started.session,
            from = %started.from,
            to = %started.to,
            hexes = started.hexes,
            cost,
            "movement started"
        );

        self.session = Some(MovementSession {
            id: self.next_session,
            path,
            cursor: 0,
            total_cost: cost,
            suspended: None,
            suspensions: 0,
        });
        Ok(started)
    }

    /// Advance one hex
    pub fn step<A, I, C>(&mut self, agent: &mut A, interrupts: &I, clock: &mut C) -> StepOutcome
    where
        A: Traveler + ?Sized,
        I: InterruptSource + ?Sized,
        C: TurnClock + ?Sized,
    {
        let Some(session) = self.session.as_mut() else {
            return StepOutcome::Idle;
        };
        if let Some(token) = session.suspended {
            return StepOutcome::StillSuspended(token);
        }

        if !session.at_end() {
            session.cursor += 1;
            let index = session.cursor;
            let hex = session.position();
            agent.set_position(hex);
            tracing::debug!(session = session.id, %hex, index, "arrived");
            for observer in &mut self.observers {
                observer.on_arrived(hex, index);
            }

            if interrupts.is_interrupted() {
                session.suspensions += 1;
                let token = ResumeToken {
                    session: session.id,
                    suspension: session.suspensions,
                };
                session.suspended = Some(token);
                tracing::info!(session = session.id, %hex, "movement suspended");
                for observer in &mut self.observers {
                    observer.on_suspended(hex, token);
                }
                return StepOutcome::Suspended { hex, token };
            }

            if !session.at_end() {
                return StepOutcome::Arrived { hex, index };
            }
        }

        match self.session.take() {
            Some(session) => StepOutcome::Completed(self.finish(session, clock)),
            None => StepOutcome::Idle,
        }
    }

    /// Resume a suspended session. Returns the summary if the path was
    /// already exhausted, `None` if there is more to walk.
    pub fn resume<C>(&mut self, token: ResumeToken, clock: &mut C) -> Result<Option<MoveSummary>>
    where
        C: TurnClock + ?Sized,
    {
        let session = self.session.as_mut().ok_or(MovementError::NotSuspended)?;
        let expected = session.suspended.ok_or(MovementError::NotSuspended)?;
        if expected != token {
            return Err(MovementError::StaleResume { expected, got: token });
        }

        session.suspended = None;
        tracing::info!(session = session.id, "movement resumed");
        for observer in &mut self.observers {
            observer.on_resumed(token);
        }

        if !session.at_end() {
            return Ok(None);
        }
        Ok(self.session.take().map(|session| self.finish(session, clock)))
    }

    /// Stop wherever the agent currently stands. Idempotent; returns `None`
    /// when nothing was moving.
    pub fn cancel(&mut self) -> Option<MoveCancelled> {
        let session = self.session.take()?;
        let cancelled = MoveCancelled {
            session: session.id,
            position: session.position(),
            hexes_moved: session.cursor,
            hexes_remaining: session.path.len() - 1 - session.cursor,
        };

        tracing::info!(
            session = session.id,
            position = %cancelled.position,
            remaining = cancelled.hexes_remaining,
            "movement cancelled"
        );
        for observer in &mut self.observers {
            observer.on_cancelled(&cancelled);
        }
        Some(cancelled)
    }

    fn finish<C>(&mut self, session: MovementSession, clock: &mut C) -> MoveSummary
    where
        C: TurnClock + ?Sized,
    {
        let summary = MoveSummary {
            session: session.id,
            from: session.path.origin(),
            to: session.path.destination(),
            hexes_moved: session.path.steps(),
            total_cost: session.total_cost,
        };

        if summary.total_cost > 0 {
            clock.advance(summary.total_cost);
        }
        tracing::info!(
            session = summary.session,
            to = %summary.to,
            hexes = summary.hexes_moved,
            cost = summary.total_cost,
            "movement completed"
        );
        for observer in &mut self.observers {
            observer.on_completed(&summary);
        }
        summary
    }
}
