//! Heuristic constants for combat simulation and scoring.
//!
//! Every weight and threshold the engine uses lives here so the scoring model
//! can be audited and tested without running the aggregation flow.

use crate::entities::{EncounterDifficulty, OutcomeTier, Rarity};

// =============================================================================
// Outcome simulation
// =============================================================================

/// Encounter CR multiplier when more than one enemy group coordinates.
pub const MULTI_GROUP_CR_MULTIPLIER: f64 = 1.2;

pub const PARTY_STRENGTH_PER_LEVEL: f64 = 10.0;
pub const ENCOUNTER_STRENGTH_PER_CR: f64 = 15.0;
pub const STRENGTH_PER_D20: f64 = 5.0;

/// Ratio thresholds (strictly greater than) for each outcome, best first.
/// Ratios at or below the last threshold are a defeat.
pub const OUTCOME_RATIO_THRESHOLDS: [(f64, OutcomeTier); 4] = [
    (1.5, OutcomeTier::DecisiveVictory),
    (1.0, OutcomeTier::Victory),
    (0.7, OutcomeTier::CostlyVictory),
    (0.5, OutcomeTier::Retreat),
];

/// Per-outcome simulation bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeBand {
    pub base_rounds: u32,
    /// Rounds added uniformly in `0..=round_spread`.
    pub round_spread: u32,
    /// HP-loss fraction drawn uniformly in `[hp_loss.0, hp_loss.1]`.
    pub hp_loss: (f64, f64),
}

impl OutcomeBand {
    pub fn max_rounds(&self) -> u32 {
        self.base_rounds + self.round_spread
    }
}

pub fn outcome_band(tier: OutcomeTier) -> OutcomeBand {
    match tier {
        OutcomeTier::DecisiveVictory => OutcomeBand {
            base_rounds: 2,
            round_spread: 2,
            hp_loss: (0.10, 0.20),
        },
        OutcomeTier::Victory => OutcomeBand {
            base_rounds: 3,
            round_spread: 3,
            hp_loss: (0.20, 0.40),
        },
        OutcomeTier::CostlyVictory => OutcomeBand {
            base_rounds: 5,
            round_spread: 4,
            hp_loss: (0.40, 0.70),
        },
        OutcomeTier::Retreat => OutcomeBand {
            base_rounds: 3,
            round_spread: 2,
            hp_loss: (0.30, 0.60),
        },
        OutcomeTier::Defeat => OutcomeBand {
            base_rounds: 4,
            round_spread: 3,
            hp_loss: (0.60, 0.90),
        },
    }
}

// =============================================================================
// Resource tracking
// =============================================================================

pub const MAX_SPELL_SLOT_LEVEL: u32 = 9;
pub const SPELL_SLOT_BASE_CHANCE: f64 = 0.30;
pub const SPELL_SLOT_CHANCE_PER_ROUND: f64 = 0.05;
/// Slots spent at a level once that level is used: `1..=MAX_SLOTS_SPENT_PER_LEVEL`.
pub const MAX_SLOTS_SPENT_PER_LEVEL: i32 = 2;
pub const MAX_CONSUMABLES_USED: i32 = 3;

// =============================================================================
// Loot
// =============================================================================

pub fn gold_multiplier(difficulty: EncounterDifficulty) -> f64 {
    match difficulty {
        EncounterDifficulty::Trivial => 10.0,
        EncounterDifficulty::Easy => 25.0,
        EncounterDifficulty::Medium => 50.0,
        EncounterDifficulty::Hard => 100.0,
        EncounterDifficulty::Deadly => 200.0,
    }
}

/// Gold is scaled by a uniform factor in `1 ± GOLD_VARIANCE`.
pub const GOLD_VARIANCE: f64 = 0.25;

pub fn item_chance(difficulty: EncounterDifficulty) -> f64 {
    match difficulty {
        EncounterDifficulty::Trivial => 0.10,
        EncounterDifficulty::Easy => 0.20,
        EncounterDifficulty::Medium => 0.35,
        EncounterDifficulty::Hard => 0.50,
        EncounterDifficulty::Deadly => 0.80,
    }
}

/// Percent weights per rarity, in `Rarity::ALL` order. Each row sums to 100.
pub fn rarity_weights(difficulty: EncounterDifficulty) -> [u32; 5] {
    match difficulty {
        EncounterDifficulty::Trivial => [90, 10, 0, 0, 0],
        EncounterDifficulty::Easy => [75, 20, 5, 0, 0],
        EncounterDifficulty::Medium => [60, 30, 9, 1, 0],
        EncounterDifficulty::Hard => [40, 35, 20, 5, 0],
        EncounterDifficulty::Deadly => [20, 30, 30, 15, 5],
    }
}

pub fn item_names(rarity: Rarity) -> &'static [&'static str] {
    match rarity {
        Rarity::Common => &["Potion of Healing", "Silvered Dagger", "Climber's Kit"],
        Rarity::Uncommon => &["Bag of Holding", "Cloak of Protection", "+1 Longsword"],
        Rarity::Rare => &["Flame Tongue", "Ring of Evasion", "+2 Shield"],
        Rarity::VeryRare => &["Staff of Fire", "Animated Shield", "+3 Longbow"],
        Rarity::Legendary => &["Vorpal Sword", "Ring of Three Wishes", "Staff of the Magi"],
    }
}

// =============================================================================
// Experience
// =============================================================================

/// XP for one creature, by CR. Ratings above the last row extrapolate.
pub const XP_BY_CR: [(f64, i64); 14] = [
    (0.0, 10),
    (0.125, 25),
    (0.25, 50),
    (0.5, 100),
    (1.0, 200),
    (2.0, 450),
    (3.0, 700),
    (4.0, 1100),
    (5.0, 1800),
    (6.0, 2300),
    (7.0, 2900),
    (8.0, 3900),
    (9.0, 5000),
    (10.0, 5900),
];

pub const XP_ABOVE_TABLE_PER_CR: i64 = 1000;

/// XP multiplier for the number of enemies faced.
pub fn encounter_size_multiplier(enemy_count: u32) -> f64 {
    match enemy_count {
        0 | 1 => 1.0,
        2 => 1.5,
        3..=6 => 2.0,
        7..=10 => 2.5,
        11..=14 => 3.0,
        _ => 4.0,
    }
}

pub const SMALL_PARTY_SIZE: usize = 3;
pub const LARGE_PARTY_SIZE: usize = 5;
pub const SMALL_PARTY_XP_MULTIPLIER: f64 = 1.5;
pub const LARGE_PARTY_XP_MULTIPLIER: f64 = 0.5;

// =============================================================================
// Initiative
// =============================================================================

pub const ALERT_FEAT_BONUS: i32 = 5;
/// Initiative added per point of special-rule `priority`.
pub const PRIORITY_INITIATIVE_STEP: i64 = 100;

// =============================================================================
// Performance rating
// =============================================================================

/// (hit rate strictly above, points), best first.
pub const HIT_RATE_POINTS: [(f64, i32); 3] = [(0.75, 3), (0.50, 2), (0.25, 1)];
pub const SURVIVAL_POINTS: i32 = 2;
pub const UNTOUCHED_POINTS: i32 = 2;
pub const DAMAGE_RATIO_POINTS: i32 = 2;
pub const DAMAGE_RATIO_THRESHOLD: i64 = 2;
pub const CRITICAL_HIT_POINTS: i32 = 1;
pub const HEALER_POINTS: i32 = 2;

pub const EXCELLENT_MIN_SCORE: i32 = 8;
pub const GOOD_MIN_SCORE: i32 = 5;
pub const FAIR_MIN_SCORE: i32 = 3;

// =============================================================================
// Highlights
// =============================================================================

pub const HIGHLIGHT_HIT_RATE: f64 = 0.75;
pub const HIGHLIGHT_CRITICAL_HITS: u32 = 1;
pub const HIGHLIGHT_DAMAGE: i64 = 50;
pub const HIGHLIGHT_HEALING: i64 = 30;
pub const HIGHLIGHT_UNTOUCHED_ROUNDS: u32 = 3;
pub const HIGHLIGHT_SAVES_MADE: u32 = 2;

// =============================================================================
// Tactical analysis
// =============================================================================

pub const TACTICAL_BASE_SCORE: i32 = 5;
pub const POSITIONING_RANGE: (i32, i32) = (1, 10);
pub const RESOURCE_RANGE: (i32, i32) = (1, 10);
pub const TARGETING_RANGE: (i32, i32) = (0, 10);
pub const TEAMWORK_RANGE: (i32, i32) = (0, 10);

/// Cover uses above these counts earn +1 / +2.
pub const COVER_MODERATE: usize = 2;
pub const COVER_HIGH: usize = 5;
/// High-ground uses above these counts earn +1 / +2.
pub const HIGH_GROUND_MODERATE: usize = 1;
pub const HIGH_GROUND_HIGH: usize = 3;

/// Spells at or above this slot level are "high level".
pub const HIGH_SPELL_LEVEL: i64 = 3;
/// A high-level spell is wasted when it deals less than `level x this`.
pub const LOW_DAMAGE_PER_SPELL_LEVEL: i64 = 5;
/// A spell is efficient when it deals more than `level x this`.
pub const EFFICIENT_DAMAGE_PER_SPELL_LEVEL: i64 = 10;
pub const WASTEFUL_SPELL_LIMIT: usize = 2;
pub const WASTEFUL_SPELL_PENALTY: i32 = 2;
pub const OVERHEAL_LIMIT: usize = 3;
pub const OVERHEAL_PENALTY: i32 = 1;
pub const EFFICIENT_SPELL_MIN: usize = 5;
pub const EFFICIENT_SPELL_BONUS: i32 = 2;

/// Killing blows on dangerous enemies count only before this round.
pub const PRIORITY_KILL_BEFORE_ROUND: u32 = 5;
pub const PRIORITY_KILL_MAX_BONUS: i32 = 3;

pub const COMBO_ATTACK_MIN: usize = 5;
pub const COMBO_ATTACK_BONUS: i32 = 2;
pub const TIMELY_HEAL_MIN: usize = 3;
pub const TIMELY_HEAL_BONUS: i32 = 1;
pub const CONDITION_SPELL_MIN: usize = 4;
pub const CONDITION_SPELL_BONUS: i32 = 2;

/// Enemy actions in a round that make an area effect worthwhile.
pub const AOE_ENEMY_ACTIONS: usize = 3;
/// Rounds of missed area opportunities before flagging.
pub const AOE_MISSED_ROUNDS: usize = 3;

// =============================================================================
// Recommendations
// =============================================================================

pub const LOW_SUBSCORE: i32 = 5;
pub const LONG_COMBAT_ROUNDS: u32 = 10;
pub const SHORT_COMBAT_ROUNDS: u32 = 3;
