//! Route preview and stepwise, interruptible movement

pub mod collaborators;
pub mod controller;
pub mod driver;
pub mod events;
pub mod executor;
pub mod preview;

pub use collaborators::{InterruptSource, NeverInterrupted, TurnClock, TurnCounter, Traveler, Walker};
pub use controller::{TravelController, TravelControllerBuilder};
pub use driver::{drive, MoveCommand, MoveEnd, StepTiming};
pub use events::{EventLog, MoveCancelled, MoveSummary, MovementEvent, MovementObserver};
pub use executor::{ExecutorState, MoveStarted, MovementExecutor, ResumeToken, StepOutcome};
pub use preview::{PreviewResult, PreviewSession, PreviewState, RequestOutcome};
