//! Preview → confirm → execute integration tests

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use hex_travel::map::{HexCoord, HexMap, Terrain};
use hex_travel::movement::{
    EventLog, ExecutorState, InterruptSource, MoveCommand, MoveEnd, MovementEvent, MovementObserver,
    RequestOutcome, ResumeToken, StepOutcome, TravelController, TurnCounter, Walker,
};
use hex_travel::{MovementConfig, MovementError};

/// Encounter switch shared between the test and the controller
#[derive(Clone, Default)]
struct Encounter(Rc<Cell<bool>>);

impl Encounter {
    fn set(&self, active: bool) {
        self.0.set(active);
    }
}

impl InterruptSource for Encounter {
    fn is_interrupted(&self) -> bool {
        self.0.get()
    }
}

type Controller = TravelController<Walker, TurnCounter, Encounter>;

fn controller(map: HexMap, start: HexCoord, encounter: &Encounter, log: &EventLog) -> Controller {
    TravelController::builder()
        .map(map)
        .agent(Walker::at(start))
        .clock(TurnCounter::default())
        .interrupts(encounter.clone())
        .observer(Box::new(log.clone()))
        .build()
        .unwrap()
}

fn walk_to_end(ctl: &mut Controller) -> StepOutcome {
    loop {
        match ctl.step() {
            StepOutcome::Arrived { .. } => continue,
            other => return other,
        }
    }
}

#[test]
fn test_preview_confirm_and_walk() {
    let mut map = HexMap::new(8, 8);
    map.set_terrain(HexCoord::new(2, 0), Terrain::Forest);
    let encounter = Encounter::default();
    let log = EventLog::new();
    let mut ctl = controller(map, HexCoord::new(0, 0), &encounter, &log);
    let dest = HexCoord::new(4, 0);

    let Ok(RequestOutcome::Previewed(preview)) = ctl.request(dest) else {
        panic!("expected preview");
    };
    assert_eq!(ctl.map().highlighted(), preview.path.hexes());
    assert_eq!(preview.breakdown.first().map(|s| s.cumulative.turns()), Some(Some(0)));

    let started = ctl.confirm().unwrap();
    assert!(ctl.map().highlighted().is_empty());
    assert_eq!(started.cost, preview.total_cost);

    let StepOutcome::Completed(summary) = walk_to_end(&mut ctl) else {
        panic!("expected completion");
    };

    assert_eq!(summary.to, dest);
    assert_eq!(ctl.agent().position, dest);
    assert_eq!(log.arrivals(), preview.path.hexes()[1..].to_vec());
    assert_eq!(ctl.clock().elapsed, u64::from(preview.total_cost));
    assert_eq!(ctl.clock().advances, 1);
    assert!(matches!(log.events().last(), Some(MovementEvent::Completed(_))));
}

#[test]
fn test_second_request_for_same_destination_starts_move() {
    let encounter = Encounter::default();
    let log = EventLog::new();
    let mut ctl = controller(HexMap::new(6, 6), HexCoord::new(0, 0), &encounter, &log);

    ctl.request(HexCoord::new(3, 1)).unwrap();
    let outcome = ctl.request(HexCoord::new(3, 1)).unwrap();

    assert!(matches!(outcome, RequestOutcome::Started(_)));
    assert_eq!(ctl.state(), ExecutorState::Moving);
    assert_eq!(ctl.preview().searches(), 1);
}

#[test]
fn test_impassable_destination_reason() {
    let mut map = HexMap::new(6, 6);
    map.set_terrain(HexCoord::new(2, 2), Terrain::Lake);
    let encounter = Encounter::default();
    let log = EventLog::new();
    let mut ctl = controller(map, HexCoord::new(0, 0), &encounter, &log);

    let err = ctl.request(HexCoord::new(2, 2)).unwrap_err();

    assert_eq!(err.reason(), "impassable");
    assert!(!ctl.is_previewing());
    assert!(ctl.map().highlighted().is_empty());
}

#[test]
fn test_request_errors_carry_reasons() {
    let encounter = Encounter::default();
    let log = EventLog::new();
    let mut ctl = controller(HexMap::new(6, 6), HexCoord::new(1, 1), &encounter, &log);

    assert_eq!(ctl.request(HexCoord::new(1, 1)).unwrap_err().reason(), "already_there");
    assert_eq!(ctl.request(HexCoord::new(40, 0)).unwrap_err().reason(), "off_grid");
    assert_eq!(ctl.confirm().unwrap_err(), MovementError::NotPreviewing);
}

#[test]
fn test_agent_off_the_map_cannot_start_a_route() {
    let encounter = Encounter::default();
    let log = EventLog::new();
    let origin = HexCoord::new(-1, 0);
    let mut ctl = controller(HexMap::new(5, 5), origin, &encounter, &log);

    assert_eq!(ctl.request(HexCoord::new(1, 0)), Err(MovementError::OffGrid(origin)));
    assert_eq!(ctl.confirm(), Err(MovementError::NotPreviewing));
    assert!(ctl.find_path(HexCoord::new(1, 0)).is_none());
    assert!(ctl.reachable(3).is_empty());
    assert_eq!(ctl.state(), ExecutorState::Idle);
    assert_eq!(ctl.agent().position, origin);
    assert!(log.events().is_empty());
}

#[test]
fn test_encounter_suspends_and_token_resumes() {
    let encounter = Encounter::default();
    let log = EventLog::new();
    let mut ctl = controller(HexMap::new(6, 6), HexCoord::new(0, 0), &encounter, &log);
    ctl.request(HexCoord::new(3, 0)).unwrap();
    ctl.confirm().unwrap();

    encounter.set(true);
    let StepOutcome::Suspended { hex, token } = ctl.step() else {
        panic!("expected suspension");
    };
    assert_eq!(ctl.agent().position, hex);
    assert_eq!(log.last_token(), Some(token));
    assert!(matches!(ctl.step(), StepOutcome::StillSuspended(_)));

    encounter.set(false);
    assert_eq!(ctl.resume(token), Ok(None));
    assert!(matches!(walk_to_end(&mut ctl), StepOutcome::Completed(_)));
    assert_eq!(ctl.agent().position, HexCoord::new(3, 0));

    assert_eq!(ctl.resume(token), Err(MovementError::NotSuspended));
}

#[test]
fn test_cancel_is_idempotent_from_every_state() {
    let encounter = Encounter::default();
    let log = EventLog::new();
    let mut ctl = controller(HexMap::new(6, 6), HexCoord::new(0, 0), &encounter, &log);

    // idle
    assert!(ctl.cancel().is_none());

    // previewing
    ctl.request(HexCoord::new(3, 0)).unwrap();
    assert!(ctl.cancel().is_none());
    assert!(!ctl.is_previewing());

    // moving
    ctl.request(HexCoord::new(3, 0)).unwrap();
    ctl.confirm().unwrap();
    ctl.step();
    assert!(ctl.cancel().is_some());
    assert_eq!(ctl.state(), ExecutorState::Idle);

    // suspended
    ctl.request(HexCoord::new(3, 1)).unwrap();
    ctl.confirm().unwrap();
    encounter.set(true);
    ctl.step();
    assert_eq!(ctl.state(), ExecutorState::Suspended);
    let cancelled = ctl.cancel().unwrap();
    assert_eq!(ctl.agent().position, cancelled.position);

    assert!(ctl.cancel().is_none());
    assert_eq!(ctl.state(), ExecutorState::Idle);
    assert_eq!(ctl.clock().advances, 0);
}

#[test]
fn test_costs_from_toml_config() {
    let mut map = HexMap::new(6, 6);
    map.set_terrain(HexCoord::new(1, 0), Terrain::Forest);
    let config = MovementConfig::from_toml_str(
        r#"
        step_delay_ms = 0
        resume_delay_ms = 0

        [costs]
        forest = "impassable"
        "#,
    )
    .unwrap();

    let mut ctl: Controller = TravelController::builder()
        .map(map)
        .config(config)
        .agent(Walker::at(HexCoord::new(0, 0)))
        .clock(TurnCounter::default())
        .interrupts(Encounter::default())
        .build()
        .unwrap();

    assert_eq!(
        ctl.request(HexCoord::new(1, 0)).unwrap_err(),
        MovementError::Impassable {
            coord: HexCoord::new(1, 0),
            terrain: Terrain::Forest
        }
    );
    let path = ctl.find_path(HexCoord::new(2, 0)).unwrap();
    assert!(!path.contains(&HexCoord::new(1, 0)));
}

/// Resolves every encounter immediately by sending the token back
struct Resolver(UnboundedSender<MoveCommand>);

impl MovementObserver for Resolver {
    fn on_suspended(&mut self, _hex: HexCoord, token: ResumeToken) {
        let _ = self.0.send(MoveCommand::Resume(token));
    }
}

#[tokio::test]
async fn test_travel_with_encounters() {
    let (tx, mut rx) = unbounded_channel();
    let log = EventLog::new();
    let arrivals = Rc::new(Cell::new(0u32));
    let counter = arrivals.clone();

    let mut ctl = TravelController::builder()
        .map(HexMap::new(8, 8))
        .config(MovementConfig {
            step_delay: Duration::ZERO,
            resume_delay: Duration::ZERO,
            ..MovementConfig::default()
        })
        .agent(Walker::at(HexCoord::new(0, 0)))
        .clock(TurnCounter::default())
        .interrupts(move || {
            counter.set(counter.get() + 1);
            counter.get() % 2 == 0
        })
        .observer(Box::new(log.clone()))
        .observer(Box::new(Resolver(tx)))
        .build()
        .unwrap();

    ctl.request(HexCoord::new(5, 0)).unwrap();
    ctl.confirm().unwrap();
    let end = ctl.travel(&mut rx).await;

    let MoveEnd::Completed(summary) = end else {
        panic!("expected completion, got {end:?}");
    };
    assert_eq!(summary.hexes_moved, 5);
    assert_eq!(arrivals.get(), 5);
    assert_eq!(ctl.agent().position, HexCoord::new(5, 0));
    assert_eq!(ctl.clock().elapsed, 5);

    let suspensions = log
        .events()
        .iter()
        .filter(|e| matches!(e, MovementEvent::Suspended { .. }))
        .count();
    assert_eq!(suspensions, 2);
}

#[tokio::test]
async fn test_travel_cancelled_while_suspended() {
    let (tx, mut rx) = unbounded_channel();
    tx.send(MoveCommand::Cancel).unwrap();

    let mut ctl = TravelController::builder()
        .map(HexMap::new(6, 6))
        .config(MovementConfig {
            step_delay: Duration::ZERO,
            resume_delay: Duration::ZERO,
            ..MovementConfig::default()
        })
        .agent(Walker::at(HexCoord::new(0, 0)))
        .clock(TurnCounter::default())
        .interrupts(|| true)
        .build()
        .unwrap();

    ctl.request(HexCoord::new(3, 0)).unwrap();
    ctl.confirm().unwrap();
    let end = ctl.travel(&mut rx).await;

    assert!(matches!(end, MoveEnd::Cancelled(c) if c.position == HexCoord::new(1, 0)));
    assert_eq!(ctl.clock().advances, 0);
    assert_eq!(ctl.state(), ExecutorState::Idle);
}
