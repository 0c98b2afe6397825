//! Recommendations and the narrative summary patched onto combat analytics.

use crate::combat::stats::CombatTotals;
use crate::combat::tables::*;
use crate::entities::{
    CombatState, CombatSummary, CombatantReport, MvpSummary, PerformanceTier, TacticalAnalysis,
    TacticalScores,
};

pub const POSITIONING_ADVICE: &str =
    "Use cover and high ground more often to limit incoming damage.";
pub const RESOURCE_ADVICE: &str =
    "Match spell levels to the threat and save high-level slots for dangerous foes.";
pub const TARGETING_ADVICE: &str = "Focus fire on the most dangerous enemies early in the fight.";
pub const TEAMWORK_ADVICE: &str =
    "Coordinate attacks on shared targets and support allies with timely heals and conditions.";
pub const GUIDANCE_ADVICE: &str =
    "Several combatants struggled; consider reviewing their options or offering tactical guidance.";
pub const LONG_COMBAT_ADVICE: &str =
    "The fight dragged on; consider fewer enemies or terrain that lets the party end it sooner.";
pub const SHORT_COMBAT_ADVICE: &str =
    "The fight ended very quickly; consider a tougher encounter next time.";

pub fn recommendations(
    analysis: &TacticalAnalysis,
    reports: &[CombatantReport],
    rounds: u32,
) -> Vec<String> {
    let mut advice = Vec::new();

    for (score, text) in [
        (analysis.positioning, POSITIONING_ADVICE),
        (analysis.resource_management, RESOURCE_ADVICE),
        (analysis.target_prioritization, TARGETING_ADVICE),
        (analysis.teamwork, TEAMWORK_ADVICE),
    ] {
        if score < LOW_SUBSCORE {
            advice.push(text.to_string());
        }
    }

    let poor = reports
        .iter()
        .filter(|r| r.performance == PerformanceTier::Poor)
        .count();
    if poor * 3 > reports.len() {
        advice.push(GUIDANCE_ADVICE.to_string());
    }

    if rounds > LONG_COMBAT_ROUNDS {
        advice.push(LONG_COMBAT_ADVICE.to_string());
    } else if rounds < SHORT_COMBAT_ROUNDS {
        advice.push(SHORT_COMBAT_ADVICE.to_string());
    }

    advice
}

fn plural(count: impl Into<i64>, word: &str) -> String {
    let count = count.into();
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

pub fn compose_summary(
    combat: &CombatState,
    totals: &CombatTotals,
    reports: &[CombatantReport],
    analysis: &TacticalAnalysis,
) -> CombatSummary {
    let overview = format!(
        "The combat lasted {} with {} total damage dealt and {} total healing.",
        plural(combat.round, "round"),
        totals.total_damage,
        totals.total_healing
    );

    let mvp = totals.mvp.map(|mvp| MvpSummary {
        combatant_id: mvp.combatant_id,
        combatant_kind: mvp.combatant_kind,
        name: combat
            .combatant(mvp.combatant_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        damage_dealt: mvp.damage,
    });

    let key_moments = reports
        .iter()
        .flat_map(|r| {
            r.highlights
                .iter()
                .map(move |h| format!("{}: {}", r.analytics.name, h))
        })
        .collect();

    CombatSummary {
        overview,
        mvp,
        key_moments,
        tactical: TacticalScores::from(analysis),
        outcome_factors: outcome_factors(combat, totals, reports),
    }
}

fn outcome_factors(
    combat: &CombatState,
    totals: &CombatTotals,
    reports: &[CombatantReport],
) -> Vec<String> {
    let mut factors = Vec::new();

    let crits: u32 = reports.iter().map(|r| r.analytics.critical_hits).sum();
    if crits > 0 {
        factors.push(format!("{} swung the fight", plural(crits, "critical hit")));
    }
    if totals.total_healing > 0 {
        factors.push(format!(
            "Healing restored {} hit points",
            totals.total_healing
        ));
    }
    if combat.round > LONG_COMBAT_ROUNDS {
        factors.push("A drawn-out battle of attrition".to_string());
    } else if combat.round < SHORT_COMBAT_ROUNDS {
        factors.push("A swift, decisive engagement".to_string());
    }

    let survivors = reports.iter().filter(|r| r.analytics.survived()).count();
    factors.push(format!(
        "{} of {} combatants left standing",
        survivors,
        reports.len()
    ));

    factors
}
