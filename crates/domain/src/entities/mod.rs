//! Domain entities - Combat inputs and the records the engine produces

mod auto_resolution;
mod combat_analytics;
mod combat_log;
mod combatant;
mod initiative;

pub use auto_resolution::{
    AutoCombatResolution, EncounterDifficulty, LootEntry, OutcomeTier, Rarity, ResolutionType,
    ResourcesUsed,
};
pub use combat_analytics::{
    CombatAnalytics, CombatSummary, CombatantAnalytics, CombatantReport, KillingBlow, MvpSummary,
    PerformanceTier, TacticalAnalysis, TacticalScores,
};
pub use combat_log::{ActionOutcome, ActionType, CombatActionLog};
pub use combatant::{CombatState, Combatant, CombatantKind, EnemyInfo, PartyMember};
pub use initiative::{order_initiative, InitiativeEntry, SmartInitiativeRule, BASE_BONUS_RANGE};
