#![allow(dead_code)]

use std::collections::HashMap;

use movement_core::{
    EntityId, LinkRegistry, MovementEvent, MovementGenerator, MovementOwner, PathType,
    Pathfinder, Position, PursuitEnv, Route, TargetLink, TargetedMovement, UnitSnapshot,
    UnitState, UpdateStatus,
};

pub const OWNER: EntityId = EntityId(1);
pub const TARGET: EntityId = EntityId(2);

pub const RUN_SPEED: f32 = 7.0;
pub const WALK_SPEED: f32 = 2.5;
pub const COMBAT_REACH: f32 = 1.5;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Owner that records what the generator asked of it. It only moves when a
/// test moves it.
#[derive(Debug, Clone)]
pub struct TestOwner {
    pub id: EntityId,
    pub position: Position,
    pub orientation: f32,
    pub walking: bool,
    pub base_speed: Option<f32>,
    pub combat_reach: f32,
    pub victim: Option<EntityId>,
    pub state: UnitState,
    pub route: Option<Route>,
    pub launches: usize,
    pub stops: usize,
    pub flying: bool,
    pub master: Option<EntityId>,
}

impl TestOwner {
    pub fn new(position: Position) -> Self {
        Self {
            id: OWNER,
            position,
            orientation: 0.0,
            walking: false,
            base_speed: None,
            combat_reach: COMBAT_REACH,
            victim: None,
            state: UnitState::empty(),
            route: None,
            launches: 0,
            stops: 0,
            flying: false,
            master: None,
        }
    }
}

impl MovementOwner for TestOwner {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Position {
        self.position
    }

    fn orientation(&self) -> f32 {
        self.orientation
    }

    fn is_walking(&self) -> bool {
        self.walking
    }

    fn set_walking(&mut self, walking: bool) {
        self.walking = walking;
    }

    fn speed(&self) -> f32 {
        match (self.base_speed, self.walking) {
            (Some(speed), _) => speed,
            (None, true) => WALK_SPEED,
            (None, false) => RUN_SPEED,
        }
    }

    fn combat_reach(&self) -> f32 {
        self.combat_reach
    }

    fn victim(&self) -> Option<EntityId> {
        self.victim
    }

    fn unit_state(&self) -> UnitState {
        self.state
    }

    fn add_unit_state(&mut self, state: UnitState) {
        self.state.insert(state);
    }

    fn clear_unit_state(&mut self, state: UnitState) {
        self.state.remove(state);
    }

    fn move_along(&mut self, route: &Route) {
        self.route = Some(route.clone());
        self.launches += 1;
    }

    fn stop_moving(&mut self) {
        self.route = None;
        self.stops += 1;
    }

    fn can_fly(&self) -> bool {
        self.flying
    }

    fn is_controlled_by(&self, other: EntityId) -> bool {
        self.master == Some(other)
    }

    fn inherit_speed(&mut self, speed: f32) {
        self.base_speed = Some(speed);
    }
}

/// Pathfinder answering every request with a route of the configured kind.
#[derive(Debug)]
pub struct ScriptedPathfinder {
    pub kind: PathType,
    pub requests: Vec<(Position, Position)>,
}

impl ScriptedPathfinder {
    pub fn calls(&self) -> usize {
        self.requests.len()
    }
}

impl Default for ScriptedPathfinder {
    fn default() -> Self {
        Self {
            kind: PathType::Normal,
            requests: Vec::new(),
        }
    }
}

impl Pathfinder for ScriptedPathfinder {
    fn compute_route(&mut self, from: Position, to: Position) -> Route {
        self.requests.push((from, to));
        match self.kind {
            PathType::Normal => Route::direct(from, to),
            PathType::Incomplete => {
                let halfway = Position::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0, to.z);
                Route::new(PathType::Incomplete, vec![from, halfway])
            }
            PathType::NoPath => Route::no_path(from),
        }
    }
}

/// One owner, one target and everything a generator talks to.
pub struct Harness {
    pub registry: LinkRegistry,
    pub units: HashMap<EntityId, UnitSnapshot>,
    pub pathfinder: ScriptedPathfinder,
    pub events: Vec<MovementEvent>,
    pub owner: TestOwner,
}

impl Harness {
    pub fn new(owner_position: Position, target: UnitSnapshot) -> Self {
        init_tracing();
        let mut units = HashMap::new();
        units.insert(target.id, target);
        Self {
            registry: LinkRegistry::new(),
            units,
            pathfinder: ScriptedPathfinder::default(),
            events: Vec::new(),
            owner: TestOwner::new(owner_position),
        }
    }

    pub fn link(&mut self) -> TargetLink {
        self.registry.link(OWNER, TARGET).unwrap()
    }

    pub fn tick(&mut self, movement: &mut TargetedMovement, diff_ms: u32) -> UpdateStatus {
        let mut env = PursuitEnv::new(&self.units, &mut self.pathfinder, &mut self.events);
        movement.update(&mut self.owner, &mut env, diff_ms)
    }

    pub fn target_mut(&mut self) -> &mut UnitSnapshot {
        self.units.get_mut(&TARGET).unwrap()
    }

    pub fn move_target(&mut self, position: Position) {
        self.target_mut().position = position;
    }

    pub fn despawn_target(&mut self) {
        self.units.remove(&TARGET);
    }
}

pub fn target_at(position: Position) -> UnitSnapshot {
    UnitSnapshot::new(TARGET, position)
        .with_speed(RUN_SPEED)
        .with_combat_reach(COMBAT_REACH)
}
