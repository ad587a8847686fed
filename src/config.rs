/// When the check-safety filter runs on generated moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Legality {
    /// Only while the mover is in check. Pinned pieces, walking into check and
    /// adjacent kings are not caught outside of check.
    WhenInCheck,
    /// On every selection. No move may leave the mover's king attacked.
    #[default]
    Always,
}

/// Rule switches for a [`Game`](crate::game_logic::Game).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RulesConfig {
    pub legality: Legality,
}

impl RulesConfig {
    /// Filter only while in check.
    pub const fn check_only() -> Self {
        Self {
            legality: Legality::WhenInCheck,
        }
    }

    /// Whether moves must be filtered given the mover's current check flag.
    #[inline]
    pub const fn filters(&self, in_check: bool) -> bool {
        match self.legality {
            Legality::Always => true,
            Legality::WhenInCheck => in_check,
        }
    }
}
