//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::{SeededRandom, SystemClock, SystemRandom},
    config::EngineConfig,
    dice::FormulaDice,
    ports::{
        ClockPort, CombatAnalyticsRepo, CombatResolutionRepo, DicePort, InitiativeRuleRepo,
        RandomPort, RepoError,
    },
    sqlite::SqliteCombatStore,
};
use crate::use_cases;
use crate::use_cases::combat::{
    AutoResolveCombat, FinalizeCombatAnalytics, GetCombatReport, InitiativeRuleOps,
    ListResolutions, RollSmartInitiative,
};

/// Main application state.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub combat: use_cases::CombatUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        resolutions: Arc<dyn CombatResolutionRepo>,
        analytics: Arc<dyn CombatAnalyticsRepo>,
        rules: Arc<dyn InitiativeRuleRepo>,
        dice: Arc<dyn DicePort>,
        random: Arc<dyn RandomPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let combat = use_cases::CombatUseCases::new(
            Arc::new(AutoResolveCombat::new(
                resolutions.clone(),
                dice.clone(),
                random,
                clock.clone(),
            )),
            Arc::new(ListResolutions::new(resolutions)),
            Arc::new(RollSmartInitiative::new(rules.clone(), dice)),
            Arc::new(InitiativeRuleOps::new(rules, clock.clone())),
            Arc::new(FinalizeCombatAnalytics::new(analytics.clone(), clock)),
            Arc::new(GetCombatReport::new(analytics)),
        );

        Self {
            use_cases: UseCases { combat },
        }
    }

    /// Wire the SQLite store, system clock and configured randomness.
    pub async fn from_config(config: &EngineConfig) -> Result<Self, RepoError> {
        let store = Arc::new(SqliteCombatStore::new(&config.db_path).await?);

        let random: Arc<dyn RandomPort> = match config.rng_seed {
            Some(seed) => {
                tracing::info!(seed, "Using seeded randomness");
                Arc::new(SeededRandom::new(seed))
            }
            None => Arc::new(SystemRandom::new()),
        };
        let dice: Arc<dyn DicePort> = Arc::new(FormulaDice::new(random.clone()));
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

        tracing::info!(db_path = %config.db_path, "Engine ready");

        Ok(Self::new(
            store.clone(),
            store.clone(),
            store,
            dice,
            random,
            clock,
        ))
    }
}
