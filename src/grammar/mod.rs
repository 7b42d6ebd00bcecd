//! Stochastic L-system grammar: rule parsing and weighted derivation.

mod derive;
mod rule;

pub use derive::{derive, Derivation, DEFAULT_MAX_DERIVATION_LEN};
pub use rule::{Production, Rule, RuleSet};

/// The turtle alphabet.
pub mod symbol {
    pub const MOVE: char = 'F';
    /// Second move token. Draws like [`MOVE`] without matching rules written for `F`.
    pub const MOVE_ALT: char = 'D';
    pub const PEAK: char = 'P';
    pub const VALLEY: char = 'L';
    pub const DETAIL: char = 'E';
    pub const TURN_LEFT: char = '+';
    pub const TURN_RIGHT: char = '-';
    pub const BRANCH_OPEN: char = '[';
    pub const BRANCH_CLOSE: char = ']';
}
