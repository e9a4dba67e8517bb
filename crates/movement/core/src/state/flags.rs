use bitflags::bitflags;

bitflags! {
    /// Movement-related state bits carried by a unit.
    ///
    /// Each targeted generator owns exactly one of the `*_MOVE` bits and only
    /// ever sets or clears that bit. The remaining bits are written by other
    /// subsystems and merely read here.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitState: u32 {
        const STUNNED     = 1 << 0;
        const ROOT        = 1 << 1;
        const DISTRACTED  = 1 << 2;
        const CASTING     = 1 << 3;
        const CHASE_MOVE  = 1 << 4;
        const FOLLOW_MOVE = 1 << 5;

        /// Any of these prevents the owner from moving this tick.
        const NOT_MOVE = Self::STUNNED.bits()
            | Self::ROOT.bits()
            | Self::DISTRACTED.bits()
            | Self::CASTING.bits();
    }
}

impl UnitState {
    /// Returns true if any movement-preventing bit is set.
    pub fn prevents_movement(self) -> bool {
        self.intersects(Self::NOT_MOVE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_control_bits_prevent_movement() {
        assert!(UnitState::ROOT.prevents_movement());
        assert!((UnitState::CASTING | UnitState::CHASE_MOVE).prevents_movement());
        assert!(!(UnitState::CHASE_MOVE | UnitState::FOLLOW_MOVE).prevents_movement());
    }
}
