pub mod combat;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{
    order_initiative, ActionOutcome, ActionType, AutoCombatResolution, CombatActionLog,
    CombatAnalytics, CombatState, CombatSummary, Combatant, CombatantAnalytics, CombatantKind,
    CombatantReport, EncounterDifficulty, EnemyInfo, InitiativeEntry, KillingBlow, LootEntry,
    MvpSummary, OutcomeTier, PartyMember, PerformanceTier, Rarity, ResolutionType, ResourcesUsed,
    SmartInitiativeRule, TacticalAnalysis, TacticalScores, BASE_BONUS_RANGE,
};

pub use error::DomainError;

pub use ids::{
    AnalyticsId, CharacterId, CombatId, CombatantAnalyticsId, CombatantId, ResolutionId, SessionId,
};

pub use value_objects::{ChallengeRating, DiceFormula, DiceParseError, DiceRollResult, Document};
