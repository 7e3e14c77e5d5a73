//! Async pacing for the movement executor
//!
//! Steps the executor, sleeps `step_delay` between hexes and parks on the
//! command channel while suspended. Everything observable still happens
//! between whole-hex steps.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep_until, Instant};

use crate::core::config::MovementConfig;
use crate::movement::collaborators::{InterruptSource, TurnClock, Traveler};
use crate::movement::events::{MoveCancelled, MoveSummary};
use crate::movement::executor::{MovementExecutor, ResumeToken, StepOutcome};

/// External signals for a running move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCommand {
    Resume(ResumeToken),
    Cancel,
}

/// How a driven move ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveEnd {
    Completed(MoveSummary),
    Cancelled(MoveCancelled),
    /// The executor had nothing to do
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepTiming {
    pub step_delay: Duration,
    pub resume_delay: Duration,
}

impl StepTiming {
    pub fn from_config(config: &MovementConfig) -> Self {
        Self {
            step_delay: config.step_delay,
            resume_delay: config.resume_delay,
        }
    }
}

/// Run the executor's current session to completion or cancellation.
///
/// A resume token that does not match the pending suspension is ignored, as
/// is any resume that arrives while the agent is not suspended. Closing the
/// command channel while suspended cancels the move.
pub async fn drive<A, I, C>(
    executor: &mut MovementExecutor,
    agent: &mut A,
    interrupts: &I,
    clock: &mut C,
    timing: StepTiming,
    commands: &mut UnboundedReceiver<MoveCommand>,
) -> MoveEnd
where
    A: Traveler + ?Sized,
    I: InterruptSource + ?Sized,
    C: TurnClock + ?Sized,
{
    loop {
        match executor.step(agent, interrupts, clock) {
            StepOutcome::Idle => return MoveEnd::Idle,
            StepOutcome::Completed(summary) => return MoveEnd::Completed(summary),
            StepOutcome::Arrived { .. } => {
                if pause(timing.step_delay, commands).await {
                    return cancelled(executor);
                }
            }
            StepOutcome::Suspended { token, .. } | StepOutcome::StillSuspended(token) => {
                if !wait_for_resume(token, commands).await {
                    return cancelled(executor);
                }
                if pause(timing.resume_delay, commands).await {
                    return cancelled(executor);
                }
                match executor.resume(token, clock) {
                    Ok(Some(summary)) => return MoveEnd::Completed(summary),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "resume rejected");
                        return cancelled(executor);
                    }
                }
            }
        }
    }
}

fn cancelled(executor: &mut MovementExecutor) -> MoveEnd {
    executor.cancel().map_or(MoveEnd::Idle, MoveEnd::Cancelled)
}

/// Park until the matching resume arrives. Returns `false` on cancel or a
/// closed channel.
async fn wait_for_resume(expected: ResumeToken, commands: &mut UnboundedReceiver<MoveCommand>) -> bool {
    loop {
        match commands.recv().await {
            Some(MoveCommand::Resume(token)) if token == expected => return true,
            Some(MoveCommand::Resume(token)) => {
                tracing::debug!(?token, ?expected, "ignoring stale resume");
            }
            Some(MoveCommand::Cancel) => return false,
            None => {
                tracing::debug!("command channel closed while suspended");
                return false;
            }
        }
    }
}

/// Sleep for `delay`. Returns `true` if a cancel arrived first.
async fn pause(delay: Duration, commands: &mut UnboundedReceiver<MoveCommand>) -> bool {
    let deadline = sleep_until(Instant::now() + delay);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            biased;
            command = commands.recv() => match command {
                Some(MoveCommand::Cancel) => return true,
                Some(MoveCommand::Resume(token)) => {
                    tracing::debug!(?token, "ignoring resume while moving");
                }
                None => {
                    (&mut deadline).await;
                    return false;
                }
            },
            _ = &mut deadline => return false,
        }
    }
}
