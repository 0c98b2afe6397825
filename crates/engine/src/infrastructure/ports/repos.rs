//! Repository port traits for combat record storage.

use async_trait::async_trait;
use skirmish_domain::{
    AnalyticsId, AutoCombatResolution, CombatAnalytics, CombatId, CombatantAnalytics, CombatantId,
    ResolutionId, SessionId, SmartInitiativeRule,
};

use super::error::RepoError;

// =============================================================================
// Auto-resolution records
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CombatResolutionRepo: Send + Sync {
    async fn save(&self, resolution: &AutoCombatResolution) -> Result<(), RepoError>;
    async fn get(&self, id: ResolutionId) -> Result<Option<AutoCombatResolution>, RepoError>;
    /// Oldest first.
    async fn list_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<AutoCombatResolution>, RepoError>;
}

// =============================================================================
// Post-combat analytics
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CombatAnalyticsRepo: Send + Sync {
    async fn create(&self, analytics: &CombatAnalytics) -> Result<(), RepoError>;
    /// Overwrite an existing record; `NotFound` when it was never created.
    async fn update(&self, analytics: &CombatAnalytics) -> Result<(), RepoError>;
    async fn get_for_combat(&self, combat_id: CombatId)
        -> Result<Option<CombatAnalytics>, RepoError>;
    async fn save_combatant(&self, analytics: &CombatantAnalytics) -> Result<(), RepoError>;
    async fn list_combatants(
        &self,
        analytics_id: AnalyticsId,
    ) -> Result<Vec<CombatantAnalytics>, RepoError>;
}

// =============================================================================
// Initiative house rules
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InitiativeRuleRepo: Send + Sync {
    async fn get(
        &self,
        session_id: SessionId,
        combatant_id: CombatantId,
    ) -> Result<Option<SmartInitiativeRule>, RepoError>;
    async fn save(&self, rule: &SmartInitiativeRule) -> Result<(), RepoError>;
    async fn delete(&self, session_id: SessionId, combatant_id: CombatantId)
        -> Result<(), RepoError>;
    async fn list_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<SmartInitiativeRule>, RepoError>;
}
