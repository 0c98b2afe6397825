//! Initiative rolls under per-combatant house rules.

use std::sync::Arc;

use skirmish_domain::{
    order_initiative, Combatant, CombatantId, InitiativeEntry, SessionId, SmartInitiativeRule,
};

use super::{roll_d20, CombatError};
use crate::infrastructure::ports::{ClockPort, DicePort, InitiativeRuleRepo};

/// Roll initiative for everyone and return them in turn order.
pub struct RollSmartInitiative {
    rules: Arc<dyn InitiativeRuleRepo>,
    dice: Arc<dyn DicePort>,
}

impl RollSmartInitiative {
    pub fn new(rules: Arc<dyn InitiativeRuleRepo>, dice: Arc<dyn DicePort>) -> Self {
        Self { rules, dice }
    }

    /// Any dice failure aborts the whole roll; a missing rule just means
    /// dexterity only.
    pub async fn execute(
        &self,
        session_id: SessionId,
        combatants: &[Combatant],
    ) -> Result<Vec<InitiativeEntry>, CombatError> {
        let mut entries = Vec::with_capacity(combatants.len());

        for combatant in combatants {
            let rule = self
                .rules
                .get(session_id, combatant.id)
                .await
                .map_err(CombatError::repo("failed to load initiative rule"))?;

            let bonus = combatant.dexterity_modifier + rule.as_ref().map_or(0, |r| r.bonus());

            let mut roll = roll_d20(self.dice.as_ref(), "failed to roll initiative")?.total;
            if rule.as_ref().is_some_and(|r| r.advantage_on_initiative) {
                let second = roll_d20(self.dice.as_ref(), "failed to roll initiative")?.total;
                roll = roll.max(second);
            }

            let priority = rule.as_ref().map_or(0, |r| r.priority_offset());
            let initiative = i64::from(roll + bonus).saturating_add(priority);

            tracing::debug!(
                combatant_id = %combatant.id,
                roll,
                bonus,
                priority,
                initiative,
                "Rolled initiative"
            );

            entries.push(InitiativeEntry {
                combatant_id: combatant.id,
                combatant_kind: combatant.kind,
                name: combatant.name.clone(),
                roll,
                bonus,
                initiative,
            });
        }

        order_initiative(&mut entries);

        tracing::info!(
            session_id = %session_id,
            combatants = entries.len(),
            "Initiative order set"
        );

        Ok(entries)
    }
}

/// CRUD for initiative house rules.
pub struct InitiativeRuleOps {
    rules: Arc<dyn InitiativeRuleRepo>,
    clock: Arc<dyn ClockPort>,
}

impl InitiativeRuleOps {
    pub fn new(rules: Arc<dyn InitiativeRuleRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { rules, clock }
    }

    /// Validate and store a rule, replacing any existing one for the combatant.
    pub async fn set_rule(
        &self,
        mut rule: SmartInitiativeRule,
    ) -> Result<SmartInitiativeRule, CombatError> {
        rule.validate()?;
        rule.updated_at = self.clock.now();

        self.rules
            .save(&rule)
            .await
            .map_err(CombatError::repo("failed to save initiative rule"))?;

        tracing::info!(
            session_id = %rule.session_id,
            combatant_id = %rule.combatant_id,
            bonus = rule.bonus(),
            "Initiative rule saved"
        );
        Ok(rule)
    }

    pub async fn get_rule(
        &self,
        session_id: SessionId,
        combatant_id: CombatantId,
    ) -> Result<Option<SmartInitiativeRule>, CombatError> {
        self.rules
            .get(session_id, combatant_id)
            .await
            .map_err(CombatError::repo("failed to load initiative rule"))
    }

    pub async fn remove_rule(
        &self,
        session_id: SessionId,
        combatant_id: CombatantId,
    ) -> Result<(), CombatError> {
        self.rules
            .delete(session_id, combatant_id)
            .await
            .map_err(CombatError::repo("failed to delete initiative rule"))
    }

    pub async fn list_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<SmartInitiativeRule>, CombatError> {
        self.rules
            .list_for_session(session_id)
            .await
            .map_err(CombatError::repo("failed to list initiative rules"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use skirmish_domain::Document;

    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{
        DiceError, MockDicePort, MockInitiativeRuleRepo, RepoError,
    };
    use crate::use_cases::combat::test_support::scripted_dice;

    fn no_rules() -> MockInitiativeRuleRepo {
        let mut rules = MockInitiativeRuleRepo::new();
        rules.expect_get().returning(|_, _| Ok(None));
        rules
    }

    fn rules_with(rule: SmartInitiativeRule) -> MockInitiativeRuleRepo {
        let mut rules = MockInitiativeRuleRepo::new();
        rules.expect_get().returning(move |_, combatant_id| {
            Ok((combatant_id == rule.combatant_id).then(|| rule.clone()))
        });
        rules
    }

    #[tokio::test]
    async fn dexterity_only_without_rule() {
        let rogue = Combatant::player("Rogue", 30).with_dexterity_modifier(2);
        let roll =
            RollSmartInitiative::new(Arc::new(no_rules()), Arc::new(scripted_dice(vec![13])));

        let entries = roll.execute(SessionId::new(), &[rogue.clone()]).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].combatant_id, rogue.id);
        assert_eq!(entries[0].bonus, 2);
        assert_eq!(entries[0].roll, 13);
        assert_eq!(entries[0].initiative, 15);
    }

    #[tokio::test]
    async fn alert_feat_and_base_bonus_stack_with_dexterity() {
        let session = SessionId::new();
        let scout = Combatant::player("Scout", 28).with_dexterity_modifier(4);
        let rule = SmartInitiativeRule::new(session, scout.id, Utc::now())
            .with_alert_feat()
            .with_base_bonus(2);

        let roll = RollSmartInitiative::new(
            Arc::new(rules_with(rule)),
            Arc::new(scripted_dice(vec![7])),
        );
        let entries = roll.execute(session, &[scout]).await.unwrap();

        assert_eq!(entries[0].bonus, 11);
        assert_eq!(entries[0].initiative, 18);
    }

    #[tokio::test]
    async fn advantage_keeps_the_higher_die() {
        let session = SessionId::new();
        let monk = Combatant::player("Monk", 33);
        let rule = SmartInitiativeRule::new(session, monk.id, Utc::now()).with_advantage();

        let roll = RollSmartInitiative::new(
            Arc::new(rules_with(rule)),
            Arc::new(scripted_dice(vec![4, 17])),
        );
        let entries = roll.execute(session, &[monk]).await.unwrap();
        assert_eq!(entries[0].roll, 17);
    }

    #[tokio::test]
    async fn priority_pins_combatant_to_the_front() {
        let session = SessionId::new();
        let herald = Combatant::npc("Herald", 10);
        let fighter = Combatant::player("Fighter", 40).with_dexterity_modifier(5);
        let rule = SmartInitiativeRule::new(session, herald.id, Utc::now()).with_priority(1);

        let roll = RollSmartInitiative::new(
            Arc::new(rules_with(rule)),
            Arc::new(scripted_dice(vec![20, 1])),
        );
        let entries = roll
            .execute(session, &[fighter.clone(), herald.clone()])
            .await
            .unwrap();

        assert_eq!(entries[0].combatant_id, herald.id);
        assert_eq!(entries[0].initiative, 101);
        assert_eq!(entries[1].initiative, 25);
    }

    #[tokio::test]
    async fn huge_priorities_still_pin_first_and_last() {
        let session = SessionId::new();
        let herald = Combatant::npc("Herald", 10);
        let fighter = Combatant::player("Fighter", 40).with_dexterity_modifier(5);
        let straggler = Combatant::npc("Straggler", 10);

        let mut rules = MockInitiativeRuleRepo::new();
        let (herald_id, straggler_id) = (herald.id, straggler.id);
        rules.expect_get().returning(move |session_id, combatant_id| {
            let rule = SmartInitiativeRule::new(session_id, combatant_id, Utc::now());
            Ok(if combatant_id == herald_id {
                Some(rule.with_priority(30_000_000))
            } else if combatant_id == straggler_id {
                Some(rule.with_priority(-30_000_000))
            } else {
                None
            })
        });

        let roll = RollSmartInitiative::new(
            Arc::new(rules),
            Arc::new(scripted_dice(vec![20, 1, 20])),
        );
        let entries = roll
            .execute(session, &[fighter.clone(), herald.clone(), straggler.clone()])
            .await
            .unwrap();

        assert_eq!(entries[0].combatant_id, herald.id);
        assert_eq!(entries[0].initiative, 3_000_000_001);
        assert_eq!(entries[1].combatant_id, fighter.id);
        assert_eq!(entries[2].combatant_id, straggler.id);
        assert_eq!(entries[2].initiative, -2_999_999_980);
    }

    #[tokio::test]
    async fn ties_go_to_the_higher_bonus() {
        let slow = Combatant::npc("Zombie", 22).with_dexterity_modifier(-2);
        let quick = Combatant::player("Ranger", 30).with_dexterity_modifier(3);

        // 17 - 2 = 15 and 12 + 3 = 15.
        let roll = RollSmartInitiative::new(
            Arc::new(no_rules()),
            Arc::new(scripted_dice(vec![17, 12])),
        );
        let entries = roll
            .execute(SessionId::new(), &[slow.clone(), quick.clone()])
            .await
            .unwrap();

        assert_eq!(entries[0].combatant_id, quick.id);
        assert_eq!(entries[1].combatant_id, slow.id);
    }

    #[tokio::test]
    async fn dice_failure_aborts() {
        let mut dice = MockDicePort::new();
        dice.expect_roll()
            .returning(|_| Err(DiceError::Unavailable("no dice".into())));
        let roll = RollSmartInitiative::new(Arc::new(no_rules()), Arc::new(dice));

        let err = roll
            .execute(SessionId::new(), &[Combatant::player("A", 10)])
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to roll initiative"));
    }

    #[tokio::test]
    async fn empty_roster_is_empty_order() {
        let mut dice = MockDicePort::new();
        dice.expect_roll().never();
        let rules = MockInitiativeRuleRepo::new();
        let roll = RollSmartInitiative::new(Arc::new(rules), Arc::new(dice));
        assert!(roll.execute(SessionId::new(), &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_rule_validates_and_stamps() {
        let now = Utc::now();
        let mut rules = MockInitiativeRuleRepo::new();
        rules
            .expect_save()
            .withf(move |r: &SmartInitiativeRule| {
                r.updated_at == now && r.base_initiative_bonus == 3
            })
            .times(1)
            .returning(|_| Ok(()));
        let ops = InitiativeRuleOps::new(Arc::new(rules), Arc::new(FixedClock(now)));

        let rule = SmartInitiativeRule::new(SessionId::new(), CombatantId::new(), Utc::now())
            .with_base_bonus(3);
        let saved = ops.set_rule(rule).await.unwrap();
        assert_eq!(saved.updated_at, now);
    }

    #[tokio::test]
    async fn set_rule_rejects_out_of_range_bonus() {
        let mut rules = MockInitiativeRuleRepo::new();
        rules.expect_save().never();
        let ops = InitiativeRuleOps::new(Arc::new(rules), Arc::new(FixedClock(Utc::now())));

        let rule = SmartInitiativeRule::new(SessionId::new(), CombatantId::new(), Utc::now())
            .with_base_bonus(21);
        assert!(matches!(
            ops.set_rule(rule).await,
            Err(CombatError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn set_rule_rejects_non_numeric_priority() {
        let mut rules = MockInitiativeRuleRepo::new();
        rules.expect_save().never();
        let ops = InitiativeRuleOps::new(Arc::new(rules), Arc::new(FixedClock(Utc::now())));

        let mut rule = SmartInitiativeRule::new(SessionId::new(), CombatantId::new(), Utc::now());
        rule.special_rules = Document::new().with("priority", "first");
        assert!(matches!(
            ops.set_rule(rule).await,
            Err(CombatError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn remove_rule_surfaces_storage_errors() {
        let mut rules = MockInitiativeRuleRepo::new();
        rules
            .expect_delete()
            .returning(|_, _| Err(RepoError::database("delete_initiative_rule", "locked")));
        let ops = InitiativeRuleOps::new(Arc::new(rules), Arc::new(FixedClock(Utc::now())));

        let err = ops
            .remove_rule(SessionId::new(), CombatantId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CombatError::Repo { .. }));
    }
}
