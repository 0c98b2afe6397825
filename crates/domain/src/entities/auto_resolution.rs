//! Auto-resolution records - statistical outcomes for skipped encounters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::entities::{EnemyInfo, PartyMember};
use crate::{ResolutionId, SessionId};

/// Difficulty label chosen by the table for an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterDifficulty {
    Trivial,
    Easy,
    #[default]
    Medium,
    Hard,
    Deadly,
}

impl EncounterDifficulty {
    /// Parse a free-form label; anything unrecognised is `Medium`.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl fmt::Display for EncounterDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Trivial => "trivial",
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Deadly => "deadly",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for EncounterDifficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trivial" => Ok(Self::Trivial),
            "easy" => Ok(Self::Easy),
            "medium" | "moderate" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            "deadly" => Ok(Self::Deadly),
            _ => Err(()),
        }
    }
}

/// Outcome category of an auto-resolved combat, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTier {
    DecisiveVictory,
    Victory,
    CostlyVictory,
    Retreat,
    Defeat,
}

impl OutcomeTier {
    pub fn is_victory(&self) -> bool {
        matches!(
            self,
            Self::DecisiveVictory | Self::Victory | Self::CostlyVictory
        )
    }
}

impl fmt::Display for OutcomeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::DecisiveVictory => "decisive_victory",
            Self::Victory => "victory",
            Self::CostlyVictory => "costly_victory",
            Self::Retreat => "retreat",
            Self::Defeat => "defeat",
        };
        write!(f, "{}", label)
    }
}

/// How a resolution record was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionType {
    #[default]
    AutoResolve,

    /// Forward-compatibility fallback for newer variants.
    #[serde(other)]
    Unknown,
}

/// Item rarity, most common first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    VeryRare,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::VeryRare,
        Rarity::Legendary,
    ];
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::VeryRare => "very rare",
            Self::Legendary => "legendary",
        };
        write!(f, "{}", label)
    }
}

/// One line of generated loot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LootEntry {
    Currency { gold: i64 },
    Item { name: String, rarity: Rarity },
}

/// Resources the party burned during an auto-resolved fight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesUsed {
    /// Hit points lost across the whole party.
    pub hp_lost: i32,
    /// Fraction of summed max HP that was lost.
    pub hp_loss_fraction: f64,
    /// Spell slots spent, keyed by slot level. Empty unless resources are tracked.
    #[serde(default)]
    pub spell_slots: BTreeMap<u8, u32>,
    #[serde(default)]
    pub hit_dice: u32,
    #[serde(default)]
    pub consumables: u32,
}

impl ResourcesUsed {
    pub fn total_spell_slots(&self) -> u32 {
        self.spell_slots.values().sum()
    }
}

/// Immutable record of one auto-resolve call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoCombatResolution {
    pub id: ResolutionId,
    pub session_id: SessionId,
    pub party: Vec<PartyMember>,
    pub enemies: Vec<EnemyInfo>,
    pub resolution_type: ResolutionType,
    pub difficulty: EncounterDifficulty,
    pub outcome: OutcomeTier,
    pub rounds: u32,
    pub resources_used: ResourcesUsed,
    pub loot: Vec<LootEntry>,
    pub experience_awarded: i64,
    pub narrative: String,
    pub created_at: DateTime<Utc>,
}

impl AutoCombatResolution {
    /// Gold across all currency entries.
    pub fn gold(&self) -> i64 {
        self.loot
            .iter()
            .map(|entry| match entry {
                LootEntry::Currency { gold } => *gold,
                LootEntry::Item { .. } => 0,
            })
            .sum()
    }
}
