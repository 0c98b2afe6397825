//! Per-combatant performance rating and highlights.

use crate::combat::tables::*;
use crate::entities::{CombatantAnalytics, CombatantReport, PerformanceTier};

/// Heuristic point score for one combatant.
pub fn performance_score(stats: &CombatantAnalytics) -> i32 {
    let mut score = 0;

    if let Some(rate) = stats.hit_rate() {
        score += HIT_RATE_POINTS
            .iter()
            .find(|(threshold, _)| rate > *threshold)
            .map_or(0, |(_, points)| *points);
    }

    if stats.survived() {
        score += SURVIVAL_POINTS;
        if stats.damage_taken == 0 {
            score += UNTOUCHED_POINTS;
        }
    }

    if stats.damage_dealt > stats.damage_taken * DAMAGE_RATIO_THRESHOLD {
        score += DAMAGE_RATIO_POINTS;
    }
    if stats.critical_hits > 0 {
        score += CRITICAL_HIT_POINTS;
    }
    if stats.healing_done > 0 {
        score += HEALER_POINTS;
    }

    score
}

impl PerformanceTier {
    pub fn from_score(score: i32) -> Self {
        if score >= EXCELLENT_MIN_SCORE {
            Self::Excellent
        } else if score >= GOOD_MIN_SCORE {
            Self::Good
        } else if score >= FAIR_MIN_SCORE {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

pub fn highlights(stats: &CombatantAnalytics) -> Vec<String> {
    let mut highlights = Vec::new();

    if let Some(rate) = stats.hit_rate().filter(|r| *r > HIGHLIGHT_HIT_RATE) {
        highlights.push(format!(
            "Exceptional accuracy: {:.0}% of attacks landed",
            rate * 100.0
        ));
    }
    if stats.critical_hits > HIGHLIGHT_CRITICAL_HITS {
        highlights.push(format!("Scored {} critical hits", stats.critical_hits));
    }
    if stats.damage_dealt > HIGHLIGHT_DAMAGE {
        highlights.push(format!("Dealt {} damage", stats.damage_dealt));
    }
    if stats.healing_done > HIGHLIGHT_HEALING {
        highlights.push(format!("Restored {} hit points to allies", stats.healing_done));
    }
    if stats.damage_taken == 0 && stats.rounds_survived > HIGHLIGHT_UNTOUCHED_ROUNDS {
        highlights.push(format!(
            "Went untouched for {} rounds",
            stats.rounds_survived
        ));
    }
    if stats.saves_made > stats.saves_failed && stats.saves_made > HIGHLIGHT_SAVES_MADE {
        highlights.push(format!("Resisted {} saving throws", stats.saves_made));
    }

    highlights
}

/// Rate a combatant and collect their highlights.
pub fn combatant_report(stats: CombatantAnalytics) -> CombatantReport {
    let performance = PerformanceTier::from_score(performance_score(&stats));
    let highlights = highlights(&stats);
    CombatantReport {
        analytics: stats,
        performance,
        highlights,
    }
}
