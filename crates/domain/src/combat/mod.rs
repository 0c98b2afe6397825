//! Combat heuristics - the pure half of auto-resolution, initiative and analytics.
//!
//! Nothing here touches storage or randomness directly; the engine feeds in
//! dice results and jitter draws and persists whatever comes out.

pub mod performance;
pub mod simulation;
pub mod stats;
pub mod summary;
pub mod tables;
pub mod tactical;

pub use performance::{combatant_report, highlights, performance_score};
pub use stats::{aggregate_totals, combatant_statistics, CombatTotals, Mvp};
pub use summary::{compose_summary, recommendations};
pub use tactical::analyze_tactics;
