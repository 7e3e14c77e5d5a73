//! Per-agent facade over preview, execution, reachability and spawning
//!
//! Owns the map and every collaborator for one agent. Build it with
//! [`TravelControllerBuilder`]; every collaborator is injected there.

use ahash::AHashSet;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::core::config::MovementConfig;
use crate::core::error::{MovementError, Result};
use crate::map::{HexCoord, HexMap};
use crate::movement::collaborators::{InterruptSource, TurnClock, Traveler};
use crate::movement::driver::{drive, MoveCommand, MoveEnd, StepTiming};
use crate::movement::events::{MoveCancelled, MoveSummary, MovementObserver};
use crate::movement::executor::{ExecutorState, MoveStarted, MovementExecutor, ResumeToken, StepOutcome};
use crate::movement::preview::{PreviewSession, RequestOutcome};
use crate::pathfinding::{CostModel, CostStep, Path, PathPlanner, ReachabilitySolver};
use crate::spawn::SpawnLocator;

pub struct TravelController<A, C, I> {
    map: HexMap,
    costs: CostModel,
    config: MovementConfig,
    agent: A,
    clock: C,
    interrupts: I,
    preview: PreviewSession,
    executor: MovementExecutor,
    rng: ChaCha8Rng,
}

impl<A, C, I> TravelController<A, C, I>
where
    A: Traveler,
    C: TurnClock,
    I: InterruptSource,
{
    pub fn builder() -> TravelControllerBuilder<A, C, I> {
        TravelControllerBuilder::new()
    }

    // === PREVIEW ===

    /// Preview a route to `destination`, or start moving if that route is
    /// already being previewed
    pub fn request(&mut self, destination: HexCoord) -> Result<RequestOutcome> {
        let origin = self.agent.position();
        self.preview
            .request(destination, origin, &mut self.map, &self.costs, &mut self.executor)
    }

    pub fn confirm(&mut self) -> Result<MoveStarted> {
        self.preview.confirm(&mut self.map, &mut self.executor)
    }

    pub fn cancel_preview(&mut self) {
        self.preview.cancel(&mut self.map);
    }

    // === EXECUTION ===

    pub fn step(&mut self) -> StepOutcome {
        self.executor.step(&mut self.agent, &self.interrupts, &mut self.clock)
    }

    pub fn resume(&mut self, token: ResumeToken) -> Result<Option<MoveSummary>> {
        self.executor.resume(token, &mut self.clock)
    }

    pub fn cancel_move(&mut self) -> Option<MoveCancelled> {
        self.executor.cancel()
    }

    /// Drop any preview and stop any move. Always leaves both idle.
    pub fn cancel(&mut self) -> Option<MoveCancelled> {
        self.cancel_preview();
        self.cancel_move()
    }

    /// Walk the active session with the configured step and resume delays
    pub async fn travel(&mut self, commands: &mut UnboundedReceiver<MoveCommand>) -> MoveEnd {
        let timing = StepTiming::from_config(&self.config);
        drive(
            &mut self.executor,
            &mut self.agent,
            &self.interrupts,
            &mut self.clock,
            timing,
            commands,
        )
        .await
    }

    // === QUERIES ===

    pub fn find_path(&self, destination: HexCoord) -> Option<Path> {
        PathPlanner::new(&self.map, &self.costs).find_path(self.agent.position(), destination)
    }

    /// Hexes reachable from the agent's position within `budget` turns
    pub fn reachable(&self, budget: u32) -> AHashSet<HexCoord> {
        ReachabilitySolver::new(&self.map, &self.costs).reachable(self.agent.position(), budget)
    }

    pub fn breakdown(&self, path: &Path) -> Vec<CostStep> {
        self.costs.breakdown(&self.map, path.hexes())
    }

    // === SPAWNING ===

    pub fn find_spawn(&mut self) -> Result<HexCoord> {
        SpawnLocator::new(&self.map, &self.config)
            .with_costs(&self.costs)
            .find_spawn(&mut self.rng)
    }

    /// Move the agent to a fresh spawn hex. Refused while a move is active.
    pub fn place_at_spawn(&mut self) -> Result<HexCoord> {
        if !self.executor.is_idle() {
            return Err(MovementError::AlreadyMoving);
        }
        let hex = self.find_spawn()?;
        self.cancel_preview();
        self.agent.set_position(hex);
        Ok(hex)
    }

    // === WIRING / ACCESSORS ===

    pub fn subscribe(&mut self, observer: Box<dyn MovementObserver>) {
        self.executor.subscribe(observer);
    }

    pub fn state(&self) -> ExecutorState {
        self.executor.state()
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.is_previewing()
    }

    pub fn preview(&self) -> &PreviewSession {
        &self.preview
    }

    pub fn executor(&self) -> &MovementExecutor {
        &self.executor
    }

    pub fn map(&self) -> &HexMap {
        &self.map
    }

    pub fn costs(&self) -> &CostModel {
        &self.costs
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn interrupts(&self) -> &I {
        &self.interrupts
    }
}

/// Collects collaborators for a [`TravelController`]
pub struct TravelControllerBuilder<A, C, I> {
    map: Option<HexMap>,
    config: MovementConfig,
    agent: Option<A>,
    clock: Option<C>,
    interrupts: Option<I>,
    observers: Vec<Box<dyn MovementObserver>>,
}

impl<A, C, I> Default for TravelControllerBuilder<A, C, I> {
    fn default() -> Self {
        Self {
            map: None,
            config: MovementConfig::default(),
            agent: None,
            clock: None,
            interrupts: None,
            observers: Vec::new(),
        }
    }
}

impl<A, C, I> TravelControllerBuilder<A, C, I>
where
    A: Traveler,
    C: TurnClock,
    I: InterruptSource,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(mut self, map: HexMap) -> Self {
        self.map = Some(map);
        self
    }

    pub fn config(mut self, config: MovementConfig) -> Self {
        self.config = config;
        self
    }

    pub fn agent(mut self, agent: A) -> Self {
        self.agent = Some(agent);
        self
    }

    pub fn clock(mut self, clock: C) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn interrupts(mut self, interrupts: I) -> Self {
        self.interrupts = Some(interrupts);
        self
    }

    pub fn observer(mut self, observer: Box<dyn MovementObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn build(self) -> Result<TravelController<A, C, I>> {
        let map = self.map.ok_or(MovementError::NotInitialized("map"))?;
        let agent = self.agent.ok_or(MovementError::NotInitialized("agent"))?;
        let clock = self.clock.ok_or(MovementError::NotInitialized("clock"))?;
        let interrupts = self
            .interrupts
            .ok_or(MovementError::NotInitialized("interrupt source"))?;

        let rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut executor = MovementExecutor::new();
        for observer in self.observers {
            executor.subscribe(observer);
        }

        tracing::debug!(width = map.width, height = map.height, "travel controller built");

        Ok(TravelController {
            map,
            costs: CostModel::from_config(&self.config),
            config: self.config,
            agent,
            clock,
            interrupts,
            preview: PreviewSession::new(),
            executor,
            rng,
        })
    }
}
