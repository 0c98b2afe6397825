//! Post-combat analytics records.
//!
//! `CombatAnalytics` is written twice: once with the aggregate totals, then
//! patched with the summary and overall tactical rating.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::{ActionType, CombatantKind};
use crate::{AnalyticsId, CombatId, CombatantAnalyticsId, CombatantId, SessionId};

/// A logged action that dropped its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KillingBlow {
    pub actor_id: CombatantId,
    pub actor_kind: CombatantKind,
    pub target_id: Option<CombatantId>,
    pub action_type: ActionType,
    pub amount: i32,
    pub round: u32,
}

/// Combat-wide analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatAnalytics {
    pub id: AnalyticsId,
    pub combat_id: CombatId,
    pub session_id: SessionId,
    pub duration_rounds: u32,
    pub total_damage: i64,
    pub total_healing: i64,
    pub killing_blows: Vec<KillingBlow>,
    pub mvp_id: Option<CombatantId>,
    pub mvp_kind: Option<CombatantKind>,
    /// Filled by the second write.
    #[serde(default)]
    pub summary: Option<CombatSummary>,
    /// Mean of the four tactical sub-scores; filled by the second write.
    #[serde(default)]
    pub tactical_rating: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Per-combatant statistics for one finished combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantAnalytics {
    pub id: CombatantAnalyticsId,
    pub analytics_id: AnalyticsId,
    pub combatant_id: CombatantId,
    pub combatant_kind: CombatantKind,
    pub name: String,
    pub attacks_made: u32,
    pub attacks_hit: u32,
    pub attacks_missed: u32,
    pub critical_hits: u32,
    pub critical_misses: u32,
    pub damage_dealt: i64,
    pub damage_taken: i64,
    pub healing_done: i64,
    pub healing_received: i64,
    pub saves_made: u32,
    pub saves_failed: u32,
    pub final_hp: i32,
    pub rounds_survived: u32,
    pub conditions_suffered: Vec<String>,
    pub abilities_used: Vec<String>,
}

impl CombatantAnalytics {
    pub fn new(
        analytics_id: AnalyticsId,
        combatant_id: CombatantId,
        combatant_kind: CombatantKind,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: CombatantAnalyticsId::new(),
            analytics_id,
            combatant_id,
            combatant_kind,
            name: name.into(),
            attacks_made: 0,
            attacks_hit: 0,
            attacks_missed: 0,
            critical_hits: 0,
            critical_misses: 0,
            damage_dealt: 0,
            damage_taken: 0,
            healing_done: 0,
            healing_received: 0,
            saves_made: 0,
            saves_failed: 0,
            final_hp: 0,
            rounds_survived: 0,
            conditions_suffered: Vec::new(),
            abilities_used: Vec::new(),
        }
    }

    /// Fraction of attacks that connected, `None` when no attacks were made.
    pub fn hit_rate(&self) -> Option<f64> {
        (self.attacks_made > 0).then(|| self.attacks_hit as f64 / self.attacks_made as f64)
    }

    pub fn survived(&self) -> bool {
        self.final_hp > 0
    }
}

/// Performance bucket derived from the heuristic point score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        };
        write!(f, "{}", label)
    }
}

/// Four-axis tactical scoring for one combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticalAnalysis {
    pub positioning: i32,
    pub resource_management: i32,
    pub target_prioritization: i32,
    pub teamwork: i32,
    pub missed_opportunities: Vec<String>,
}

impl TacticalAnalysis {
    /// Mean of the four sub-scores, integer division.
    pub fn overall_rating(&self) -> i32 {
        (self.positioning + self.resource_management + self.target_prioritization + self.teamwork)
            / 4
    }
}

/// A combatant's statistics paired with their rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantReport {
    pub analytics: CombatantAnalytics,
    pub performance: PerformanceTier,
    pub highlights: Vec<String>,
}

/// Headline block for the combat's top damage dealer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MvpSummary {
    pub combatant_id: CombatantId,
    pub combatant_kind: CombatantKind,
    pub name: String,
    pub damage_dealt: i64,
}

/// The four sub-scores as stored in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticalScores {
    pub positioning: i32,
    pub resource_management: i32,
    pub target_prioritization: i32,
    pub teamwork: i32,
}

impl From<&TacticalAnalysis> for TacticalScores {
    fn from(analysis: &TacticalAnalysis) -> Self {
        Self {
            positioning: analysis.positioning,
            resource_management: analysis.resource_management,
            target_prioritization: analysis.target_prioritization,
            teamwork: analysis.teamwork,
        }
    }
}

/// Narrative-ready summary patched onto `CombatAnalytics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatSummary {
    pub overview: String,
    pub mvp: Option<MvpSummary>,
    pub key_moments: Vec<String>,
    pub tactical: TacticalScores,
    pub outcome_factors: Vec<String>,
}
