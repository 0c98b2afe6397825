//! Aggregation of a combat action log into totals and per-combatant stats.

use std::collections::HashMap;

use crate::entities::{
    ActionOutcome, ActionType, CombatActionLog, CombatState, CombatantAnalytics, CombatantKind,
    KillingBlow,
};
use crate::{AnalyticsId, CombatantId};

/// The combatant who dealt the most damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mvp {
    pub combatant_id: CombatantId,
    pub combatant_kind: CombatantKind,
    pub damage: i64,
}

/// Combat-wide totals from one pass over the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatTotals {
    pub total_damage: i64,
    pub total_healing: i64,
    pub killing_blows: Vec<KillingBlow>,
    pub mvp: Option<Mvp>,
}

pub fn aggregate_totals(log: &[CombatActionLog]) -> CombatTotals {
    let mut totals = CombatTotals::default();
    // First-seen order so ties keep the earliest actor.
    let mut damage_by_actor: Vec<(CombatantId, CombatantKind, i64)> = Vec::new();

    for action in log {
        if action.action_type.counts_toward_total_damage() {
            totals.total_damage += action.amount as i64;
            match damage_by_actor
                .iter_mut()
                .find(|(id, _, _)| *id == action.actor_id)
            {
                Some(entry) => entry.2 += action.amount as i64,
                None => damage_by_actor.push((
                    action.actor_id,
                    action.actor_kind,
                    action.amount as i64,
                )),
            }
        } else if action.action_type == ActionType::Heal {
            totals.total_healing += action.amount as i64;
        }

        if action.outcome == ActionOutcome::KillingBlow {
            totals.killing_blows.push(KillingBlow {
                actor_id: action.actor_id,
                actor_kind: action.actor_kind,
                target_id: action.target_id,
                action_type: action.action_type,
                amount: action.amount,
                round: action.round,
            });
        }
    }

    let mut best: Option<Mvp> = None;
    for (combatant_id, combatant_kind, damage) in damage_by_actor {
        if damage > best.map_or(0, |b| b.damage) {
            best = Some(Mvp {
                combatant_id,
                combatant_kind,
                damage,
            });
        }
    }
    totals.mvp = best;

    totals
}

/// Per-combatant statistics for everyone on the roster at combat end.
///
/// Actions by or against combatants no longer on the roster are ignored.
pub fn combatant_statistics(
    analytics_id: AnalyticsId,
    combat: &CombatState,
    log: &[CombatActionLog],
) -> Vec<CombatantAnalytics> {
    let mut records: Vec<CombatantAnalytics> = combat
        .combatants
        .iter()
        .map(|c| {
            let mut stats = CombatantAnalytics::new(analytics_id, c.id, c.kind, c.name.clone());
            stats.final_hp = c.current_hp;
            stats.rounds_survived = if c.is_down() {
                log.iter()
                    .find(|a| a.outcome == ActionOutcome::KillingBlow && a.target_id == Some(c.id))
                    .map(|a| a.round)
                    .unwrap_or(combat.round)
            } else {
                combat.round
            };
            stats
        })
        .collect();

    let index: HashMap<CombatantId, usize> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (r.combatant_id, i))
        .collect();

    for action in log {
        let actor = index.get(&action.actor_id).copied();
        let target = action.target_id.and_then(|t| index.get(&t).copied());
        let amount = action.amount as i64;

        if let Some(a) = actor {
            let stats = &mut records[a];
            match action.action_type {
                ActionType::Attack => {
                    stats.attacks_made += 1;
                    if action.outcome.is_hit() {
                        stats.attacks_hit += 1;
                    } else if action.outcome.is_miss() {
                        stats.attacks_missed += 1;
                    }
                    match action.outcome {
                        ActionOutcome::Critical => stats.critical_hits += 1,
                        ActionOutcome::CriticalMiss => stats.critical_misses += 1,
                        _ => {}
                    }
                }
                ActionType::Spell | ActionType::Ability => {
                    stats.abilities_used.push(action.action_type.to_string());
                }
                ActionType::Heal => stats.healing_done += amount,
                ActionType::Save => match action.outcome {
                    ActionOutcome::Success => stats.saves_made += 1,
                    ActionOutcome::Failure => stats.saves_failed += 1,
                    _ => {}
                },
                ActionType::Unknown => {}
            }

            if action.action_type.deals_damage() {
                stats.damage_dealt += amount;
            }
        }

        if let Some(t) = target {
            let stats = &mut records[t];
            if action.action_type.deals_damage() {
                stats.damage_taken += amount;
            }
            if action.action_type == ActionType::Heal {
                stats.healing_received += amount;
            }
            if !action.conditions_applied.is_empty() {
                stats
                    .conditions_suffered
                    .extend(action.conditions_applied.iter().cloned());
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Combatant;
    use crate::SessionId;
    use proptest::prelude::*;

    fn act(
        actor: &Combatant,
        action: ActionType,
        outcome: ActionOutcome,
        round: u32,
    ) -> CombatActionLog {
        CombatActionLog::new(actor.id, actor.kind, action, outcome, round)
    }

    fn attack(
        actor: &Combatant,
        target: &Combatant,
        outcome: ActionOutcome,
        amount: i32,
        round: u32,
    ) -> CombatActionLog {
        act(actor, ActionType::Attack, outcome, round)
            .with_target(target.id)
            .with_amount(amount)
    }

    #[test]
    fn totals_split_damage_and_healing() {
        let fighter = Combatant::player("Fighter", 40);
        let cleric = Combatant::player("Cleric", 30);
        let orc = Combatant::npc("Orc", 15);

        let log = vec![
            attack(&fighter, &orc, ActionOutcome::Hit, 8, 1),
            act(&cleric, ActionType::Heal, ActionOutcome::Success, 1)
                .with_target(fighter.id)
                .with_amount(6),
            act(&cleric, ActionType::Spell, ActionOutcome::KillingBlow, 2)
                .with_target(orc.id)
                .with_amount(9),
            // Abilities count for the combatant but not the combat-wide total.
            act(&fighter, ActionType::Ability, ActionOutcome::Hit, 2)
                .with_target(orc.id)
                .with_amount(4),
        ];

        let totals = aggregate_totals(&log);
        assert_eq!(totals.total_damage, 17);
        assert_eq!(totals.total_healing, 6);
        assert_eq!(totals.killing_blows.len(), 1);
        assert_eq!(totals.killing_blows[0].actor_id, cleric.id);
        assert_eq!(totals.killing_blows[0].round, 2);
        let mvp = totals.mvp.unwrap();
        assert_eq!(mvp.combatant_id, cleric.id);
        assert_eq!(mvp.damage, 9);
    }

    #[test]
    fn mvp_ties_keep_first_actor() {
        let a = Combatant::player("A", 10);
        let b = Combatant::player("B", 10);
        let target = Combatant::npc("T", 50);
        let log = vec![
            attack(&a, &target, ActionOutcome::Hit, 5, 1),
            attack(&b, &target, ActionOutcome::Hit, 5, 1),
        ];
        assert_eq!(aggregate_totals(&log).mvp.unwrap().combatant_id, a.id);
    }

    #[test]
    fn no_damage_means_no_mvp() {
        assert!(aggregate_totals(&[]).mvp.is_none());
    }

    #[test]
    fn attack_counters_from_ten_attacks() {
        let ranger = Combatant::player("Ranger", 35);
        let troll = Combatant::npc("Troll", 84);
        let mut log = Vec::new();
        for _ in 0..5 {
            log.push(attack(&ranger, &troll, ActionOutcome::Hit, 7, 1));
        }
        for _ in 0..3 {
            log.push(attack(&ranger, &troll, ActionOutcome::Critical, 14, 2));
        }
        for _ in 0..2 {
            log.push(attack(&ranger, &troll, ActionOutcome::Miss, 0, 3));
        }

        let combat = CombatState::new(SessionId::new(), 3, vec![ranger.clone(), troll.clone()]);
        let stats = combatant_statistics(AnalyticsId::new(), &combat, &log);
        let r = &stats[0];
        assert_eq!(r.attacks_made, 10);
        assert_eq!(r.attacks_hit, 8);
        assert_eq!(r.attacks_missed, 2);
        assert_eq!(r.critical_hits, 3);
        assert_eq!(r.damage_dealt, 77);
        assert_eq!(stats[1].damage_taken, 77);
    }

    #[test]
    fn downed_combatants_survive_until_their_killing_blow() {
        let wizard = Combatant::player("Wizard", 18).with_current_hp(0);
        let ogre = Combatant::npc("Ogre", 59);
        let log = vec![
            attack(&ogre, &wizard, ActionOutcome::Hit, 8, 1),
            attack(&ogre, &wizard, ActionOutcome::KillingBlow, 10, 3),
        ];
        let combat = CombatState::new(SessionId::new(), 6, vec![wizard, ogre]);
        let stats = combatant_statistics(AnalyticsId::new(), &combat, &log);

        assert_eq!(stats[0].rounds_survived, 3);
        assert_eq!(stats[0].final_hp, 0);
        assert_eq!(stats[1].rounds_survived, 6);
    }

    #[test]
    fn downed_without_killing_blow_keeps_current_round() {
        let bard = Combatant::player("Bard", 20).with_current_hp(0);
        let combat = CombatState::new(SessionId::new(), 4, vec![bard]);
        let stats = combatant_statistics(AnalyticsId::new(), &combat, &[]);
        assert_eq!(stats[0].rounds_survived, 4);
    }

    #[test]
    fn replay_tracks_heals_saves_conditions_and_abilities() {
        let cleric = Combatant::player("Cleric", 30);
        let paladin = Combatant::player("Paladin", 45);
        let lich = Combatant::npc("Lich", 135);
        let ghost = Combatant::npc("Ghost", 1);

        let log = vec![
            act(&cleric, ActionType::Heal, ActionOutcome::Success, 1)
                .with_target(paladin.id)
                .with_amount(12),
            act(&lich, ActionType::Spell, ActionOutcome::Hit, 1)
                .with_target(paladin.id)
                .with_amount(20)
                .with_condition("frightened"),
            act(&paladin, ActionType::Save, ActionOutcome::Success, 2),
            act(&paladin, ActionType::Save, ActionOutcome::Failure, 2),
            act(&paladin, ActionType::Ability, ActionOutcome::Hit, 2)
                .with_target(lich.id)
                .with_amount(15),
            // Actors missing from the roster still damage their target.
            attack(&ghost, &paladin, ActionOutcome::Hit, 3, 2),
        ];

        let combat = CombatState::new(SessionId::new(), 2, vec![cleric, paladin, lich]);
        let stats = combatant_statistics(AnalyticsId::new(), &combat, &log);
        let (cleric, paladin, lich) = (&stats[0], &stats[1], &stats[2]);

        assert_eq!(cleric.healing_done, 12);
        assert_eq!(paladin.healing_received, 12);
        assert_eq!(paladin.damage_taken, 23);
        assert_eq!(paladin.conditions_suffered, vec!["frightened".to_string()]);
        assert_eq!((paladin.saves_made, paladin.saves_failed), (1, 1));
        assert_eq!(paladin.abilities_used, vec!["ability".to_string()]);
        assert_eq!(paladin.damage_dealt, 15);
        assert_eq!(lich.abilities_used, vec!["spell".to_string()]);
        assert_eq!(lich.damage_dealt, 20);
        assert_eq!(lich.damage_taken, 15);
    }

    fn outcome_strategy() -> impl Strategy<Value = ActionOutcome> {
        prop_oneof![
            Just(ActionOutcome::Hit),
            Just(ActionOutcome::Miss),
            Just(ActionOutcome::Critical),
            Just(ActionOutcome::CriticalMiss),
            Just(ActionOutcome::KillingBlow),
            Just(ActionOutcome::Success),
            Just(ActionOutcome::Failure),
            Just(ActionOutcome::Overheal),
            Just(ActionOutcome::Unknown),
        ]
    }

    proptest! {
        #[test]
        fn hits_and_misses_never_exceed_attacks(
            outcomes in proptest::collection::vec(outcome_strategy(), 0..40)
        ) {
            let a = Combatant::player("A", 20);
            let b = Combatant::npc("B", 20);
            let log: Vec<_> = outcomes
                .into_iter()
                .map(|o| attack(&a, &b, o, 3, 1))
                .collect();
            let combat = CombatState::new(SessionId::new(), 1, vec![a, b]);
            for stats in combatant_statistics(AnalyticsId::new(), &combat, &log) {
                prop_assert!(stats.attacks_hit + stats.attacks_missed <= stats.attacks_made);
            }
        }
    }
}
