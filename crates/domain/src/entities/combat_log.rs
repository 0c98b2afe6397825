//! Combat action log - one row per action taken during detailed combat.
//!
//! Rows are written by the turn-by-turn combat subsystem; the analytics pass
//! only reads them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::CombatantKind;
use crate::value_objects::Document;
use crate::CombatantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Attack,
    Spell,
    Heal,
    Save,
    Ability,

    /// Forward-compatibility fallback for newer variants.
    #[serde(other)]
    Unknown,
}

impl ActionType {
    /// Actions whose amount counts as damage.
    pub fn deals_damage(&self) -> bool {
        matches!(self, Self::Attack | Self::Spell | Self::Ability)
    }

    /// Actions whose amount feeds the combat-wide damage total.
    pub fn counts_toward_total_damage(&self) -> bool {
        matches!(self, Self::Attack | Self::Spell)
    }

    pub fn is_spell_or_ability(&self) -> bool {
        matches!(self, Self::Spell | Self::Ability)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Attack => "attack",
            Self::Spell => "spell",
            Self::Heal => "heal",
            Self::Save => "save",
            Self::Ability => "ability",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Hit,
    Miss,
    Critical,
    CriticalMiss,
    KillingBlow,
    Success,
    Failure,
    Overheal,

    /// Forward-compatibility fallback for newer variants.
    #[serde(other)]
    Unknown,
}

impl ActionOutcome {
    /// Outcomes that mean an attack connected.
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit | Self::Critical | Self::KillingBlow)
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Miss | Self::CriticalMiss)
    }
}

/// A single logged action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatActionLog {
    pub actor_id: CombatantId,
    pub actor_kind: CombatantKind,
    pub action_type: ActionType,
    #[serde(default)]
    pub target_id: Option<CombatantId>,
    /// Damage dealt, or healing for heal actions.
    #[serde(default)]
    pub amount: i32,
    pub outcome: ActionOutcome,
    pub round: u32,
    #[serde(default)]
    pub conditions_applied: Vec<String>,
    /// `used_cover`, `high_ground`, ...
    #[serde(default)]
    pub position_data: Option<Document>,
    /// `spell_level`, `spell_slots_remaining`, ...
    #[serde(default)]
    pub resources_used: Option<Document>,
}

impl CombatActionLog {
    pub fn new(
        actor_id: CombatantId,
        actor_kind: CombatantKind,
        action_type: ActionType,
        outcome: ActionOutcome,
        round: u32,
    ) -> Self {
        Self {
            actor_id,
            actor_kind,
            action_type,
            target_id: None,
            amount: 0,
            outcome,
            round,
            conditions_applied: Vec::new(),
            position_data: None,
            resources_used: None,
        }
    }

    pub fn with_target(mut self, target_id: CombatantId) -> Self {
        self.target_id = Some(target_id);
        self
    }

    pub fn with_amount(mut self, amount: i32) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.conditions_applied.push(condition.into());
        self
    }

    pub fn with_position(mut self, position: Document) -> Self {
        self.position_data = Some(position);
        self
    }

    pub fn with_resources(mut self, resources: Document) -> Self {
        self.resources_used = Some(resources);
        self
    }

    /// Spell slot level spent by this action, when recorded.
    pub fn spell_level(&self) -> Option<i64> {
        self.resources_used.as_ref()?.get_i64("spell_level")
    }

    pub fn used_cover(&self) -> bool {
        self.position_data
            .as_ref()
            .is_some_and(|p| p.flag("used_cover"))
    }

    pub fn used_high_ground(&self) -> bool {
        self.position_data
            .as_ref()
            .is_some_and(|p| p.flag("high_ground"))
    }
}
