//! Four-axis tactical scoring over a finished combat's action log.
//!
//! Each axis starts at `TACTICAL_BASE_SCORE`, is nudged by independent
//! heuristics and is clamped to its own range, so extreme logs can never
//! push a score out of bounds.

use std::collections::{BTreeMap, HashMap};

use crate::combat::tables::*;
use crate::entities::{
    ActionOutcome, ActionType, CombatActionLog, CombatState, CombatantAnalytics, CombatantKind,
    TacticalAnalysis,
};
use crate::CombatantId;

pub const AOE_MISSED_MESSAGE: &str =
    "AoE opportunities missed: several rounds had clustered enemies met with single-target attacks";
pub const UNUSED_SLOTS_MESSAGE: &str =
    "High-level spell slots unused: slots of level 3 or higher were still available at the end";

pub fn analyze_tactics(
    combat: &CombatState,
    log: &[CombatActionLog],
    stats: &[CombatantAnalytics],
) -> TacticalAnalysis {
    TacticalAnalysis {
        positioning: positioning_score(log),
        resource_management: resource_management_score(log),
        target_prioritization: target_prioritization_score(combat, log),
        teamwork: teamwork_score(log, stats),
        missed_opportunities: missed_opportunities(log),
    }
}

fn clamp_to((min, max): (i32, i32), score: i32) -> i32 {
    score.clamp(min, max)
}

fn tiered_bonus(count: usize, moderate: usize, high: usize) -> i32 {
    if count > high {
        2
    } else if count > moderate {
        1
    } else {
        0
    }
}

pub fn positioning_score(log: &[CombatActionLog]) -> i32 {
    let cover = log.iter().filter(|a| a.used_cover()).count();
    let high_ground = log.iter().filter(|a| a.used_high_ground()).count();

    let score = TACTICAL_BASE_SCORE
        + tiered_bonus(cover, COVER_MODERATE, COVER_HIGH)
        + tiered_bonus(high_ground, HIGH_GROUND_MODERATE, HIGH_GROUND_HIGH);
    clamp_to(POSITIONING_RANGE, score)
}

pub fn resource_management_score(log: &[CombatActionLog]) -> i32 {
    let mut wasteful = 0;
    let mut overheals = 0;
    let mut efficient = 0;

    for action in log {
        if action.outcome == ActionOutcome::Overheal {
            overheals += 1;
        }
        let Some(level) = action.spell_level().filter(|l| *l > 0) else {
            continue;
        };
        let amount = action.amount as i64;
        if action.action_type == ActionType::Spell
            && level >= HIGH_SPELL_LEVEL
            && amount < level * LOW_DAMAGE_PER_SPELL_LEVEL
        {
            wasteful += 1;
        }
        if action.action_type.deals_damage()
            && amount > level * EFFICIENT_DAMAGE_PER_SPELL_LEVEL
        {
            efficient += 1;
        }
    }

    let mut score = TACTICAL_BASE_SCORE;
    if wasteful > WASTEFUL_SPELL_LIMIT {
        score -= WASTEFUL_SPELL_PENALTY;
    }
    if overheals > OVERHEAL_LIMIT {
        score -= OVERHEAL_PENALTY;
    }
    if efficient > EFFICIENT_SPELL_MIN {
        score += EFFICIENT_SPELL_BONUS;
    }
    clamp_to(RESOURCE_RANGE, score)
}

/// Enemies whose max HP is at least the mean of all enemies on the roster.
fn dangerous_enemies(combat: &CombatState) -> Vec<CombatantId> {
    let enemies: Vec<_> = combat
        .combatants
        .iter()
        .filter(|c| c.kind == CombatantKind::Npc)
        .collect();
    if enemies.is_empty() {
        return Vec::new();
    }
    let mean = enemies.iter().map(|c| c.max_hp as f64).sum::<f64>() / enemies.len() as f64;
    enemies
        .into_iter()
        .filter(|c| c.max_hp as f64 >= mean)
        .map(|c| c.id)
        .collect()
}

pub fn target_prioritization_score(combat: &CombatState, log: &[CombatActionLog]) -> i32 {
    let dangerous = dangerous_enemies(combat);
    let early_kills = log
        .iter()
        .filter(|a| {
            a.outcome == ActionOutcome::KillingBlow
                && a.round < PRIORITY_KILL_BEFORE_ROUND
                && a.target_id.is_some_and(|t| dangerous.contains(&t))
        })
        .count();

    let bonus = early_kills.min(PRIORITY_KILL_MAX_BONUS as usize) as i32;
    clamp_to(TARGETING_RANGE, TACTICAL_BASE_SCORE + bonus)
}

pub fn teamwork_score(log: &[CombatActionLog], stats: &[CombatantAnalytics]) -> i32 {
    let combos = log
        .windows(2)
        .filter(|pair| {
            let (first, second) = (&pair[0], &pair[1]);
            first.action_type == ActionType::Attack
                && second.action_type == ActionType::Attack
                && first.round == second.round
                && first.target_id.is_some()
                && first.target_id == second.target_id
        })
        .count();

    let in_trouble: HashMap<CombatantId, bool> = stats
        .iter()
        .map(|s| (s.combatant_id, s.damage_taken > s.final_hp as i64))
        .collect();
    let timely_heals = log
        .iter()
        .filter(|a| a.action_type == ActionType::Heal)
        .filter(|a| {
            a.target_id
                .and_then(|t| in_trouble.get(&t).copied())
                .unwrap_or(false)
        })
        .count();

    let condition_plays = log
        .iter()
        .filter(|a| a.action_type.is_spell_or_ability() && !a.conditions_applied.is_empty())
        .count();

    let mut score = TACTICAL_BASE_SCORE;
    if combos > COMBO_ATTACK_MIN {
        score += COMBO_ATTACK_BONUS;
    }
    if timely_heals > TIMELY_HEAL_MIN {
        score += TIMELY_HEAL_BONUS;
    }
    if condition_plays > CONDITION_SPELL_MIN {
        score += CONDITION_SPELL_BONUS;
    }
    clamp_to(TEAMWORK_RANGE, score)
}

pub fn missed_opportunities(log: &[CombatActionLog]) -> Vec<String> {
    let mut missed = Vec::new();

    // (enemy actions, single-target player attack seen) per round
    let mut rounds: BTreeMap<u32, (usize, bool)> = BTreeMap::new();
    for action in log {
        let entry = rounds.entry(action.round).or_default();
        if action.actor_kind == CombatantKind::Npc {
            entry.0 += 1;
        } else if action.action_type == ActionType::Attack && action.target_id.is_some() {
            entry.1 = true;
        }
    }
    let aoe_rounds = rounds
        .values()
        .filter(|(enemy_actions, single_target)| {
            *enemy_actions >= AOE_ENEMY_ACTIONS && *single_target
        })
        .count();
    if aoe_rounds > AOE_MISSED_ROUNDS {
        missed.push(AOE_MISSED_MESSAGE.to_string());
    }

    if let Some(final_round) = log.iter().map(|a| a.round).max() {
        let unused = log
            .iter()
            .filter(|a| a.round == final_round)
            .filter_map(|a| a.resources_used.as_ref()?.get_document("spell_slots_remaining"))
            .any(|slots| {
                slots.iter().any(|(level, _)| {
                    level.parse::<i64>().is_ok_and(|l| l >= HIGH_SPELL_LEVEL)
                        && slots.get_i64(level).is_some_and(|remaining| remaining > 0)
                })
            });
        if unused {
            missed.push(UNUSED_SLOTS_MESSAGE.to_string());
        }
    }

    missed
}
