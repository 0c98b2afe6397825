//! Combat use cases.
//!
//! Three independent flows share this module:
//! 1. Auto-resolution of an encounter the table wants to skip (AutoResolveCombat)
//! 2. Initiative ordering under per-combatant house rules (RollSmartInitiative)
//! 3. Post-combat analytics over a finished action log (FinalizeCombatAnalytics)
//!
//! Each use case is stateless apart from its ports, so a single instance can
//! serve concurrent sessions.

use std::sync::Arc;

use skirmish_domain::{DiceRollResult, DomainError};

mod analytics;
mod auto_resolve;
mod initiative;

pub use analytics::{CombatReport, CombatReportBundle, FinalizeCombatAnalytics, GetCombatReport};
pub use auto_resolve::{AutoResolveCombat, ListResolutions};
pub use initiative::{InitiativeRuleOps, RollSmartInitiative};

use crate::infrastructure::ports::{DiceError, DicePort, RepoError};

/// Container for combat use cases.
pub struct CombatUseCases {
    pub auto_resolve: Arc<AutoResolveCombat>,
    pub list_resolutions: Arc<ListResolutions>,
    pub initiative: Arc<RollSmartInitiative>,
    pub initiative_rules: Arc<InitiativeRuleOps>,
    pub finalize_analytics: Arc<FinalizeCombatAnalytics>,
    pub report: Arc<GetCombatReport>,
}

impl CombatUseCases {
    pub fn new(
        auto_resolve: Arc<AutoResolveCombat>,
        list_resolutions: Arc<ListResolutions>,
        initiative: Arc<RollSmartInitiative>,
        initiative_rules: Arc<InitiativeRuleOps>,
        finalize_analytics: Arc<FinalizeCombatAnalytics>,
        report: Arc<GetCombatReport>,
    ) -> Self {
        Self {
            auto_resolve,
            list_resolutions,
            initiative,
            initiative_rules,
            finalize_analytics,
            report,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    #[error("{context}: {source}")]
    Dice {
        context: &'static str,
        #[source]
        source: DiceError,
    },
    #[error("{context}: {source}")]
    Repo {
        context: &'static str,
        #[source]
        source: RepoError,
    },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
}

impl CombatError {
    pub(crate) fn dice(context: &'static str) -> impl FnOnce(DiceError) -> Self {
        move |source| Self::Dice { context, source }
    }

    pub(crate) fn repo(context: &'static str) -> impl FnOnce(RepoError) -> Self {
        move |source| Self::Repo { context, source }
    }

    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}

impl From<DomainError> for CombatError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            DomainError::Validation(msg) | DomainError::Parse(msg) => Self::Validation(msg),
        }
    }
}

const D20: &str = "1d20";

/// Roll a single d20 through the dice port.
fn roll_d20(dice: &dyn DicePort, context: &'static str) -> Result<DiceRollResult, CombatError> {
    dice.roll(D20).map_err(CombatError::dice(context))
}
