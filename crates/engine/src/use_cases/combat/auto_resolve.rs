//! Statistical auto-resolution of skipped encounters.

use std::collections::BTreeMap;
use std::sync::Arc;

use skirmish_domain::combat::simulation::{
    base_gold, compose_narrative, encounter_challenge_rating, encounter_strength, experience,
    max_spell_level, outcome_for_ratio, party_level, party_max_hp, party_strength,
    rarity_for_roll, spell_slot_chance,
};
use skirmish_domain::combat::tables::{
    item_chance, item_names, outcome_band, GOLD_VARIANCE, MAX_CONSUMABLES_USED,
    MAX_SLOTS_SPENT_PER_LEVEL,
};
use skirmish_domain::{
    AutoCombatResolution, EncounterDifficulty, EnemyInfo, LootEntry, OutcomeTier, PartyMember,
    ResolutionId, ResolutionType, ResourcesUsed, SessionId,
};

use super::{roll_d20, CombatError};
use crate::infrastructure::ports::{ClockPort, CombatResolutionRepo, DicePort, RandomPort};

/// Resolve an encounter without playing it out.
///
/// Strength checks use the dice port; rounds, losses, resources, loot and the
/// narrative variant use the random port so they can be seeded separately.
pub struct AutoResolveCombat {
    resolutions: Arc<dyn CombatResolutionRepo>,
    dice: Arc<dyn DicePort>,
    random: Arc<dyn RandomPort>,
    clock: Arc<dyn ClockPort>,
}

impl AutoResolveCombat {
    pub fn new(
        resolutions: Arc<dyn CombatResolutionRepo>,
        dice: Arc<dyn DicePort>,
        random: Arc<dyn RandomPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            resolutions,
            dice,
            random,
            clock,
        }
    }

    /// Simulate and persist one encounter.
    ///
    /// # Arguments
    /// * `difficulty` - Free-form label; unknown labels are treated as medium
    /// * `terrain` - Free-form label; known terrains add a flavor sentence
    /// * `use_resources` - Track spell slots, hit dice and consumables
    pub async fn execute(
        &self,
        session_id: SessionId,
        party: Vec<PartyMember>,
        enemies: Vec<EnemyInfo>,
        difficulty: &str,
        terrain: &str,
        use_resources: bool,
    ) -> Result<AutoCombatResolution, CombatError> {
        let difficulty = EncounterDifficulty::from_label(difficulty);
        let level = party_level(&party);
        let challenge_rating = encounter_challenge_rating(&enemies);

        // 1. Opposed strength checks
        let party_roll = roll_d20(self.dice.as_ref(), "failed to roll party strength")?;
        let enemy_roll = roll_d20(self.dice.as_ref(), "failed to roll encounter strength")?;
        let party_strength = party_strength(level, party.len(), party_roll.total);
        let encounter_strength = encounter_strength(challenge_rating, enemy_roll.total);
        let ratio = if encounter_strength > 0.0 {
            party_strength / encounter_strength
        } else {
            f64::INFINITY
        };
        let outcome = outcome_for_ratio(ratio);

        tracing::debug!(
            session_id = %session_id,
            party_level = level,
            challenge_rating,
            party_strength,
            encounter_strength,
            outcome = %outcome,
            "Auto-resolve strength check"
        );

        // 2. Duration and losses
        let band = outcome_band(outcome);
        let spread = self.random.gen_range(0, band.round_spread as i32).max(0) as u32;
        let rounds = band.base_rounds + spread;
        let resources_used = self.resources_used(outcome, &party, level, rounds, use_resources);

        // 3. Rewards
        let loot = self.loot(difficulty, &enemies);
        let experience_awarded = experience(&enemies, party.len());

        let variant = self.random.gen_range(0, 2).max(0) as usize;
        let narrative = compose_narrative(outcome, variant, terrain, rounds);

        let resolution = AutoCombatResolution {
            id: ResolutionId::new(),
            session_id,
            party,
            enemies,
            resolution_type: ResolutionType::AutoResolve,
            difficulty,
            outcome,
            rounds,
            resources_used,
            loot,
            experience_awarded,
            narrative,
            created_at: self.clock.now(),
        };

        self.resolutions
            .save(&resolution)
            .await
            .map_err(CombatError::repo("failed to save combat resolution"))?;

        tracing::info!(
            resolution_id = %resolution.id,
            session_id = %session_id,
            outcome = %resolution.outcome,
            rounds = resolution.rounds,
            xp = resolution.experience_awarded,
            gold = resolution.gold(),
            "Combat auto-resolved"
        );

        Ok(resolution)
    }

    fn resources_used(
        &self,
        outcome: OutcomeTier,
        party: &[PartyMember],
        level: f64,
        rounds: u32,
        use_resources: bool,
    ) -> ResourcesUsed {
        let (low, high) = outcome_band(outcome).hp_loss;
        let hp_loss_fraction = low + self.random.gen_f64() * (high - low);
        let hp_lost = (party_max_hp(party) as f64 * hp_loss_fraction).round() as i32;

        if !use_resources {
            return ResourcesUsed {
                hp_lost,
                hp_loss_fraction,
                ..ResourcesUsed::default()
            };
        }

        let chance = spell_slot_chance(rounds);
        let mut spell_slots = BTreeMap::new();
        for slot_level in 1..=max_spell_level(level) {
            if self.random.gen_f64() < chance {
                let spent = self.random.gen_range(1, MAX_SLOTS_SPENT_PER_LEVEL).max(1) as u32;
                spell_slots.insert(slot_level as u8, spent);
            }
        }

        ResourcesUsed {
            hp_lost,
            hp_loss_fraction,
            spell_slots,
            hit_dice: rounds / 2,
            consumables: self.random.gen_range(0, MAX_CONSUMABLES_USED).max(0) as u32,
        }
    }

    fn loot(&self, difficulty: EncounterDifficulty, enemies: &[EnemyInfo]) -> Vec<LootEntry> {
        let variance = 1.0 - GOLD_VARIANCE + self.random.gen_f64() * 2.0 * GOLD_VARIANCE;
        let gold = (base_gold(difficulty, enemies) * variance).round() as i64;
        let mut loot = vec![LootEntry::Currency { gold }];

        if self.random.gen_f64() < item_chance(difficulty) {
            let percentile = self.random.gen_range(0, 99).max(0) as u32;
            let rarity = rarity_for_roll(difficulty, percentile);
            let names = item_names(rarity);
            let pick = self.random.gen_range(0, names.len() as i32 - 1).max(0) as usize;
            if let Some(name) = names.get(pick) {
                loot.push(LootEntry::Item {
                    name: name.to_string(),
                    rarity,
                });
            }
        }

        loot
    }
}

/// List the auto-resolutions recorded for a session.
pub struct ListResolutions {
    resolutions: Arc<dyn CombatResolutionRepo>,
}

impl ListResolutions {
    pub fn new(resolutions: Arc<dyn CombatResolutionRepo>) -> Self {
        Self { resolutions }
    }

    pub async fn execute(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<AutoCombatResolution>, CombatError> {
        self.resolutions
            .list_for_session(session_id)
            .await
            .map_err(CombatError::repo("failed to list combat resolutions"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::infrastructure::clock::{FixedClock, FixedRandom, SeededRandom};
    use crate::infrastructure::ports::{
        DiceError, MockCombatResolutionRepo, MockDicePort, RepoError,
    };
    use crate::use_cases::combat::test_support::scripted_dice;

    fn level_five_party() -> Vec<PartyMember> {
        ["Fighter", "Cleric", "Rogue", "Wizard"]
            .into_iter()
            .map(|name| PartyMember::new(name, 5, 40))
            .collect()
    }

    fn four_goblins() -> Vec<EnemyInfo> {
        (0..4).map(|_| EnemyInfo::new("Goblin", "1/4", 1)).collect()
    }

    fn saving_repo() -> MockCombatResolutionRepo {
        let mut repo = MockCombatResolutionRepo::new();
        repo.expect_save().times(1).returning(|_| Ok(()));
        repo
    }

    fn use_case(
        repo: MockCombatResolutionRepo,
        dice: MockDicePort,
        random: Arc<dyn RandomPort>,
    ) -> AutoResolveCombat {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        AutoResolveCombat::new(Arc::new(repo), Arc::new(dice), random, Arc::new(clock))
    }

    #[tokio::test]
    async fn level_five_party_beats_goblins() {
        // Worst case for the party: they roll a 1, the goblins a 20.
        // 5 x 4 x 10 + 5 = 205 against 1.2 x 15 + 100 = 118.
        for seed in 0..20 {
            let auto = use_case(
                saving_repo(),
                scripted_dice(vec![1, 20]),
                Arc::new(SeededRandom::new(seed)),
            );
            let resolution = auto
                .execute(
                    SessionId::new(),
                    level_five_party(),
                    four_goblins(),
                    "easy",
                    "forest",
                    true,
                )
                .await
                .unwrap();

            assert!(resolution.outcome <= OutcomeTier::Victory);
            assert!((2..=6).contains(&resolution.rounds));
            assert!(resolution.experience_awarded > 0);
            assert!(resolution
                .loot
                .iter()
                .any(|l| matches!(l, LootEntry::Currency { .. })));
            assert_eq!(resolution.difficulty, EncounterDifficulty::Easy);
        }
    }

    #[tokio::test]
    async fn low_draws_hit_band_minimums() {
        let auto = use_case(
            saving_repo(),
            scripted_dice(vec![1, 20]),
            Arc::new(FixedRandom::low()),
        );
        let resolution = auto
            .execute(
                SessionId::new(),
                level_five_party(),
                four_goblins(),
                "easy",
                "",
                true,
            )
            .await
            .unwrap();

        assert_eq!(resolution.outcome, OutcomeTier::DecisiveVictory);
        assert_eq!(resolution.rounds, 2);
        assert!((resolution.resources_used.hp_loss_fraction - 0.10).abs() < 1e-9);
        assert_eq!(resolution.resources_used.hp_lost, 16);
        // Every slot level up to 3 is used once at the minimum draw.
        assert_eq!(resolution.resources_used.spell_slots.len(), 3);
        assert_eq!(resolution.resources_used.total_spell_slots(), 3);
        assert_eq!(resolution.resources_used.hit_dice, 1);
        assert_eq!(resolution.resources_used.consumables, 0);
        // 25 x 1.0 x 0.75 gold, then a common item.
        assert_eq!(resolution.gold(), 19);
        assert_eq!(resolution.loot.len(), 2);
        assert_eq!(resolution.experience_awarded, 400);
        assert!(resolution
            .narrative
            .starts_with("The party overwhelms their foes"));
        assert!(resolution.narrative.ends_with("The battle lasted 2 rounds."));
    }

    #[tokio::test]
    async fn outmatched_party_is_defeated() {
        let auto = use_case(
            saving_repo(),
            scripted_dice(vec![1, 20]),
            Arc::new(FixedRandom::high()),
        );
        let party = vec![PartyMember::new("Squire", 1, 10)];
        let enemies = vec![EnemyInfo::new("Young Dragon", "10", 1)];

        let resolution = auto
            .execute(SessionId::new(), party, enemies, "deadly", "cave", true)
            .await
            .unwrap();

        assert_eq!(resolution.outcome, OutcomeTier::Defeat);
        assert_eq!(resolution.rounds, 7);
        assert!(resolution.resources_used.hp_loss_fraction <= 0.90);
        assert!(resolution.narrative.contains("narrow passages"));
    }

    #[tokio::test]
    async fn empty_encounter_and_unknown_difficulty() {
        let auto = use_case(
            saving_repo(),
            scripted_dice(vec![10, 10]),
            Arc::new(FixedRandom::low()),
        );
        let resolution = auto
            .execute(SessionId::new(), Vec::new(), Vec::new(), "apocalyptic", "", false)
            .await
            .unwrap();

        assert_eq!(resolution.difficulty, EncounterDifficulty::Medium);
        assert_eq!(resolution.experience_awarded, 0);
        assert_eq!(resolution.gold(), 0);
        assert!(resolution.resources_used.spell_slots.is_empty());
        assert_eq!(resolution.resources_used.hit_dice, 0);
    }

    #[tokio::test]
    async fn dice_failure_aborts_before_saving() {
        let mut dice = MockDicePort::new();
        dice.expect_roll()
            .returning(|_| Err(DiceError::Unavailable("tray empty".into())));
        let mut repo = MockCombatResolutionRepo::new();
        repo.expect_save().never();

        let auto = use_case(repo, dice, Arc::new(FixedRandom::low()));
        let err = auto
            .execute(SessionId::new(), level_five_party(), four_goblins(), "easy", "", true)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CombatError::Dice {
                context: "failed to roll party strength",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn save_failure_is_reported() {
        let mut repo = MockCombatResolutionRepo::new();
        repo.expect_save()
            .returning(|_| Err(RepoError::database("save_resolution", "locked")));

        let auto = use_case(repo, scripted_dice(vec![]), Arc::new(FixedRandom::low()));
        let err = auto
            .execute(SessionId::new(), level_five_party(), four_goblins(), "easy", "", true)
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("failed to save combat resolution"));
    }

    #[tokio::test]
    async fn saved_record_matches_returned_record() {
        let session_id = SessionId::new();
        let mut repo = MockCombatResolutionRepo::new();
        repo.expect_save()
            .withf(move |r: &AutoCombatResolution| {
                r.session_id == session_id && r.resolution_type == ResolutionType::AutoResolve
            })
            .times(1)
            .returning(|_| Ok(()));

        let auto = use_case(repo, scripted_dice(vec![12, 8]), Arc::new(SeededRandom::new(3)));
        auto.execute(session_id, level_five_party(), four_goblins(), "hard", "", true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn same_seed_replays_the_simulation_with_fresh_ids() {
        let session_id = SessionId::new();
        let mut runs = Vec::new();
        for _ in 0..2 {
            let auto = use_case(
                saving_repo(),
                scripted_dice(vec![9, 11]),
                Arc::new(SeededRandom::new(21)),
            );
            let resolution = auto
                .execute(session_id, level_five_party(), four_goblins(), "medium", "swamp", true)
                .await
                .unwrap();
            runs.push(resolution);
        }

        let (first, second) = (&runs[0], &runs[1]);
        assert_ne!(first.id, second.id);
        assert_eq!(first.outcome, second.outcome);
        assert_eq!(first.rounds, second.rounds);
        assert_eq!(first.resources_used, second.resources_used);
        assert_eq!(first.loot, second.loot);
        assert_eq!(first.narrative, second.narrative);
    }

    #[tokio::test]
    async fn lists_resolutions_for_session() {
        let session_id = SessionId::new();
        let mut repo = MockCombatResolutionRepo::new();
        repo.expect_list_for_session()
            .withf(move |id| *id == session_id)
            .returning(|_| Ok(Vec::new()));

        let list = ListResolutions::new(Arc::new(repo));
        assert!(list.execute(session_id).await.unwrap().is_empty());
    }
}
