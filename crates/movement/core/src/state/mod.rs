//! Plain value types shared by the movement layer.
mod common;
mod flags;

pub use common::{EntityId, Position, normalize_orientation};
pub use flags::UnitState;
