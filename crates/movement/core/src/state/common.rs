use std::fmt;

/// Stable identifier for any unit the movement layer can refer to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u64);

impl EntityId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// World-space point in yards.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Squared horizontal distance, ignoring height.
    pub fn distance_2d_sq(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Horizontal distance, ignoring height.
    pub fn distance_2d(&self, other: &Position) -> f32 {
        self.distance_2d_sq(other).sqrt()
    }

    pub fn distance_sq(&self, other: &Position) -> f32 {
        let dz = self.z - other.z;
        self.distance_2d_sq(other) + dz * dz
    }

    /// Full 3D distance.
    pub fn distance(&self, other: &Position) -> f32 {
        self.distance_sq(other).sqrt()
    }

    /// Point `distance` yards away along the absolute heading `orientation`
    /// (radians, counter-clockwise from +x), at the same height.
    pub fn offset_towards(&self, orientation: f32, distance: f32) -> Position {
        Position {
            x: self.x + distance * orientation.cos(),
            y: self.y + distance * orientation.sin(),
            z: self.z,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// Normalizes an angle into `[0, 2π)`.
pub fn normalize_orientation(angle: f32) -> f32 {
    let tau = std::f32::consts::TAU;
    let wrapped = angle % tau;
    if wrapped < 0.0 { wrapped + tau } else { wrapped }
}
