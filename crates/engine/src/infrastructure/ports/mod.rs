//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Combat record storage (could swap SQLite -> Postgres)
//! - Dice (could swap the formula roller -> a table's physical dice feed)
//! - Clock/Random (for testing and seeded runs)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{CombatAnalyticsRepo, CombatResolutionRepo, InitiativeRuleRepo};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::DicePort;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockCombatAnalyticsRepo, MockCombatResolutionRepo, MockInitiativeRuleRepo};

#[cfg(test)]
pub use external::MockDicePort;

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{DiceError, RepoError};
