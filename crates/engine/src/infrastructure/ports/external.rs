//! External service ports.

use skirmish_domain::DiceRollResult;

use super::error::DiceError;

/// Dice rolling. Engine code only ever asks for `"1d20"`, but adapters
/// accept any `XdY+Z` notation.
#[cfg_attr(test, mockall::automock)]
pub trait DicePort: Send + Sync {
    fn roll(&self, notation: &str) -> Result<DiceRollResult, DiceError>;
}
