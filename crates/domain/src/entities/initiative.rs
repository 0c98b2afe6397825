//! Initiative house rules and turn-order entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::combat::tables::{ALERT_FEAT_BONUS, PRIORITY_INITIATIVE_STEP};
use crate::entities::CombatantKind;
use crate::error::DomainError;
use crate::value_objects::Document;
use crate::{CombatantId, SessionId};

/// Allowed range for a table-configured base initiative bonus.
pub const BASE_BONUS_RANGE: std::ops::RangeInclusive<i32> = -10..=20;

/// Per-combatant initiative overrides configured by the table.
///
/// Keyed by (session, combatant). Absence of a rule is normal and means
/// "dexterity only".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartInitiativeRule {
    pub session_id: SessionId,
    pub combatant_id: CombatantId,
    #[serde(default)]
    pub base_initiative_bonus: i32,
    #[serde(default)]
    pub alert_feat: bool,
    #[serde(default)]
    pub advantage_on_initiative: bool,
    /// Free-form extras. `priority` (number) forces ordering.
    #[serde(default)]
    pub special_rules: Document,
    pub updated_at: DateTime<Utc>,
}

impl SmartInitiativeRule {
    pub fn new(session_id: SessionId, combatant_id: CombatantId, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            combatant_id,
            base_initiative_bonus: 0,
            alert_feat: false,
            advantage_on_initiative: false,
            special_rules: Document::new(),
            updated_at: now,
        }
    }

    pub fn with_base_bonus(mut self, bonus: i32) -> Self {
        self.base_initiative_bonus = bonus;
        self
    }

    pub fn with_alert_feat(mut self) -> Self {
        self.alert_feat = true;
        self
    }

    pub fn with_advantage(mut self) -> Self {
        self.advantage_on_initiative = true;
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.special_rules.insert("priority", priority);
        self
    }

    /// Bonus this rule adds on top of the combatant's dexterity modifier.
    pub fn bonus(&self) -> i32 {
        self.base_initiative_bonus + if self.alert_feat { ALERT_FEAT_BONUS } else { 0 }
    }

    /// Numeric `priority` from the special rules, if any.
    pub fn priority(&self) -> Option<i64> {
        self.special_rules.get_i64("priority")
    }

    /// Offset that pins this combatant ahead of (or behind) everyone else.
    ///
    /// Saturates instead of wrapping, so an extreme priority still sorts to
    /// the correct end.
    pub fn priority_offset(&self) -> i64 {
        self.priority()
            .map(|p| p.saturating_mul(PRIORITY_INITIATIVE_STEP))
            .unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !BASE_BONUS_RANGE.contains(&self.base_initiative_bonus) {
            return Err(DomainError::validation(format!(
                "Base initiative bonus {} outside {:?}",
                self.base_initiative_bonus, BASE_BONUS_RANGE
            )));
        }
        if self.special_rules.contains_key("priority") && self.priority().is_none() {
            return Err(DomainError::validation(
                "Special rule 'priority' must be a whole number",
            ));
        }
        Ok(())
    }
}

/// One combatant's place in the turn order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativeEntry {
    pub combatant_id: CombatantId,
    pub combatant_kind: CombatantKind,
    pub name: String,
    /// Kept die (the higher of two with advantage).
    pub roll: i32,
    pub bonus: i32,
    /// Roll plus bonus plus any priority offset.
    pub initiative: i64,
}

/// Sort entries into turn order.
///
/// Highest initiative first; equal totals keep their input order. A single
/// left-to-right pass then swaps adjacent equal-total pairs so the higher
/// bonus acts first. Because it is one pass, a tie of three or more entries
/// is only partially ordered by bonus.
pub fn order_initiative(entries: &mut [InitiativeEntry]) {
    entries.sort_by(|a, b| b.initiative.cmp(&a.initiative));

    for i in 1..entries.len() {
        let (prev, curr) = (&entries[i - 1], &entries[i]);
        if prev.initiative == curr.initiative && curr.bonus > prev.bonus {
            entries.swap(i - 1, i);
        }
    }
}
