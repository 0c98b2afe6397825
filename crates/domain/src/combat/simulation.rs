//! Deterministic pieces of the auto-resolve simulation.
//!
//! The engine supplies the dice and jitter; everything here is a pure
//! function of those draws so each step can be checked on its own.

use crate::combat::tables::*;
use crate::entities::{EncounterDifficulty, EnemyInfo, OutcomeTier, PartyMember, Rarity};

/// Mean party level, 1 for an empty party.
pub fn party_level(party: &[PartyMember]) -> f64 {
    if party.is_empty() {
        return 1.0;
    }
    party.iter().map(|m| m.level as f64).sum::<f64>() / party.len() as f64
}

pub fn party_max_hp(party: &[PartyMember]) -> i32 {
    party.iter().map(|m| m.max_hp.max(0)).sum()
}

/// Sum of CR x count over all groups.
pub fn raw_challenge_rating(enemies: &[EnemyInfo]) -> f64 {
    enemies
        .iter()
        .map(|e| e.challenge_rating().value() * e.count as f64)
        .sum()
}

/// Encounter CR including the coordination bonus for multiple groups.
pub fn encounter_challenge_rating(enemies: &[EnemyInfo]) -> f64 {
    let raw = raw_challenge_rating(enemies);
    if enemies.len() > 1 {
        raw * MULTI_GROUP_CR_MULTIPLIER
    } else {
        raw
    }
}

pub fn enemy_count(enemies: &[EnemyInfo]) -> u32 {
    enemies.iter().map(|e| e.count).sum()
}

pub fn party_strength(level: f64, party_size: usize, d20: i32) -> f64 {
    level * party_size as f64 * PARTY_STRENGTH_PER_LEVEL + d20 as f64 * STRENGTH_PER_D20
}

pub fn encounter_strength(challenge_rating: f64, d20: i32) -> f64 {
    challenge_rating * ENCOUNTER_STRENGTH_PER_CR + d20 as f64 * STRENGTH_PER_D20
}

/// Outcome tier for a party/encounter strength ratio.
pub fn outcome_for_ratio(ratio: f64) -> OutcomeTier {
    OUTCOME_RATIO_THRESHOLDS
        .iter()
        .find(|(threshold, _)| ratio > *threshold)
        .map(|(_, tier)| *tier)
        .unwrap_or(OutcomeTier::Defeat)
}

/// Highest spell slot level a party of this level can be spending.
pub fn max_spell_level(party_level: f64) -> u32 {
    ((party_level / 2.0).ceil().max(0.0) as u32).min(MAX_SPELL_SLOT_LEVEL)
}

/// Chance that a given slot level was used in a fight of this length.
pub fn spell_slot_chance(rounds: u32) -> f64 {
    SPELL_SLOT_BASE_CHANCE + SPELL_SLOT_CHANCE_PER_ROUND * rounds as f64
}

/// Gold before variance.
pub fn base_gold(difficulty: EncounterDifficulty, enemies: &[EnemyInfo]) -> f64 {
    gold_multiplier(difficulty) * raw_challenge_rating(enemies)
}

/// Map a percentile draw in `0..100` onto the difficulty's rarity table.
pub fn rarity_for_roll(difficulty: EncounterDifficulty, percentile: u32) -> Rarity {
    let mut cumulative = 0;
    for (rarity, weight) in Rarity::ALL.iter().zip(rarity_weights(difficulty)) {
        cumulative += weight;
        if percentile < cumulative {
            return *rarity;
        }
    }
    Rarity::Common
}

/// Experience for defeating the encounter.
pub fn experience(enemies: &[EnemyInfo], party_size: usize) -> i64 {
    let base: i64 = enemies
        .iter()
        .map(|e| e.challenge_rating().experience() * e.count as i64)
        .sum();

    let mut multiplier = encounter_size_multiplier(enemy_count(enemies));
    if party_size < SMALL_PARTY_SIZE {
        multiplier *= SMALL_PARTY_XP_MULTIPLIER;
    } else if party_size > LARGE_PARTY_SIZE {
        multiplier *= LARGE_PARTY_XP_MULTIPLIER;
    }

    (base as f64 * multiplier) as i64
}

pub fn outcome_narratives(tier: OutcomeTier) -> [&'static str; 3] {
    match tier {
        OutcomeTier::DecisiveVictory => [
            "The party overwhelms their foes with precise, coordinated strikes.",
            "Enemies scatter as the heroes sweep through their ranks with ease.",
            "Barely breaking a sweat, the party dispatches the threat.",
        ],
        OutcomeTier::Victory => [
            "After a hard-fought exchange the party stands victorious.",
            "Steel rings and spells flare until the last enemy falls.",
            "The heroes hold their ground and win the day.",
        ],
        OutcomeTier::CostlyVictory => [
            "Victory comes at a steep price; the party is battered and bloodied.",
            "The enemy falls, but not before leaving deep wounds on the heroes.",
            "Exhausted and hurting, the party claims a narrow win.",
        ],
        OutcomeTier::Retreat => [
            "Outmatched, the party falls back to regroup.",
            "Sensing the tide turning, the heroes withdraw under pressure.",
            "The party breaks off the fight and escapes with their lives.",
        ],
        OutcomeTier::Defeat => [
            "The party is overwhelmed and falls before the enemy.",
            "Despite their courage, the heroes are beaten back and defeated.",
            "Darkness closes in as the last of the party collapses.",
        ],
    }
}

/// Flavor sentence for a known terrain label.
pub fn terrain_flavor(terrain: &str) -> Option<&'static str> {
    let sentence = match terrain.trim().to_ascii_lowercase().as_str() {
        "forest" | "woods" => "Tangled roots and dense undergrowth shaped every clash.",
        "cave" | "underground" | "dungeon" => {
            "Echoes and darkness turned the narrow passages into a deadly maze."
        }
        "desert" => "Scorching sand and blinding sun wore on every combatant.",
        "swamp" | "marsh" => "Sucking mud and fetid water slowed every step.",
        "mountain" | "hills" => "Rocky slopes and sheer drops made every foothold precious.",
        "urban" | "city" | "town" => "Alleys and rooftops offered cover to both sides.",
        "water" | "coastal" | "ship" => {
            "Crashing waves and slick footing kept everyone off balance."
        }
        _ => return None,
    };
    Some(sentence)
}

/// Assemble the narrative blurb from a chosen canned line.
pub fn compose_narrative(tier: OutcomeTier, variant: usize, terrain: &str, rounds: u32) -> String {
    let lines = outcome_narratives(tier);
    let mut narrative = lines[variant % lines.len()].to_string();
    if let Some(flavor) = terrain_flavor(terrain) {
        narrative.push(' ');
        narrative.push_str(flavor);
    }
    let unit = if rounds == 1 { "round" } else { "rounds" };
    narrative.push_str(&format!(" The battle lasted {} {}.", rounds, unit));
    narrative
}
