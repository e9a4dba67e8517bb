use crate::state::Position;

/// Outcome class of a route search.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PathType {
    /// Full route to the requested destination.
    Normal,
    /// Route stops short of the destination (search budget or blocked end).
    Incomplete,
    /// No route exists; `points` holds at most the start point.
    NoPath,
}

impl PathType {
    /// Returns true for a complete route.
    pub const fn is_normal(self) -> bool {
        matches!(self, PathType::Normal)
    }
}

/// Route computed by the pathfinding collaborator.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub kind: PathType,
    pub points: Vec<Position>,
}

impl Route {
    /// Route of the given kind through `points`.
    pub fn new(kind: PathType, points: Vec<Position>) -> Self {
        Self { kind, points }
    }

    /// Straight two-point route, the shape a pathfinder returns when nothing
    /// is in the way.
    pub fn direct(from: Position, to: Position) -> Self {
        Self::new(PathType::Normal, vec![from, to])
    }

    /// Failed search result anchored at `from`.
    pub fn no_path(from: Position) -> Self {
        Self::new(PathType::NoPath, vec![from])
    }

    /// Last waypoint, if any.
    pub fn end(&self) -> Option<Position> {
        self.points.last().copied()
    }

    /// Whether the owner has anything to walk along.
    pub fn is_traversable(&self) -> bool {
        !matches!(self.kind, PathType::NoPath) && self.points.len() >= 2
    }

    /// Total length along the polyline.
    pub fn length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance(&pair[1]))
            .sum()
    }
}

/// Route search capability consumed by the pursuit engine.
///
/// The call is synchronous and must complete within the caller's tick;
/// bounding its cost is the implementor's concern.
pub trait Pathfinder {
    fn compute_route(&mut self, from: Position, to: Position) -> Route;
}

impl<F> Pathfinder for F
where
    F: FnMut(Position, Position) -> Route,
{
    fn compute_route(&mut self, from: Position, to: Position) -> Route {
        self(from, to)
    }
}

/// Pathfinder for open terrain: every destination is directly reachable.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectPathfinder;

impl Pathfinder for DirectPathfinder {
    fn compute_route(&mut self, from: Position, to: Position) -> Route {
        Route::direct(from, to)
    }
}
