//! Post-combat analytics.
//!
//! The aggregate record is created first, then every per-combatant record,
//! then the aggregate is patched with its summary. Only the patch is best
//! effort: if it fails the caller still gets the full report.

use std::sync::Arc;

use skirmish_domain::combat::{
    aggregate_totals, analyze_tactics, combatant_report, combatant_statistics, compose_summary,
    recommendations,
};
use skirmish_domain::{
    AnalyticsId, CombatActionLog, CombatAnalytics, CombatId, CombatState, CombatantReport,
    TacticalAnalysis,
};

use super::CombatError;
use crate::infrastructure::ports::{ClockPort, CombatAnalyticsRepo};

/// Everything produced for one finished combat.
#[derive(Debug, Clone)]
pub struct CombatReportBundle {
    pub analytics: CombatAnalytics,
    pub combatants: Vec<CombatantReport>,
    pub tactical: TacticalAnalysis,
    pub recommendations: Vec<String>,
}

pub struct FinalizeCombatAnalytics {
    analytics: Arc<dyn CombatAnalyticsRepo>,
    clock: Arc<dyn ClockPort>,
}

impl FinalizeCombatAnalytics {
    pub fn new(analytics: Arc<dyn CombatAnalyticsRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { analytics, clock }
    }

    pub async fn execute(
        &self,
        combat: &CombatState,
        log: &[CombatActionLog],
    ) -> Result<CombatReportBundle, CombatError> {
        // 1. Combat-wide totals
        let totals = aggregate_totals(log);
        let mut record = CombatAnalytics {
            id: AnalyticsId::new(),
            combat_id: combat.id,
            session_id: combat.session_id,
            duration_rounds: combat.round,
            total_damage: totals.total_damage,
            total_healing: totals.total_healing,
            killing_blows: totals.killing_blows.clone(),
            mvp_id: totals.mvp.map(|m| m.combatant_id),
            mvp_kind: totals.mvp.map(|m| m.combatant_kind),
            summary: None,
            tactical_rating: None,
            created_at: self.clock.now(),
        };
        self.analytics
            .create(&record)
            .await
            .map_err(CombatError::repo("failed to save combat analytics"))?;

        // 2. Per-combatant statistics
        let stats = combatant_statistics(record.id, combat, log);
        for combatant in &stats {
            self.analytics
                .save_combatant(combatant)
                .await
                .map_err(CombatError::repo("failed to save combatant analytics"))?;
        }

        // 3. Ratings and advice
        let tactical = analyze_tactics(combat, log, &stats);
        let combatants: Vec<CombatantReport> = stats.into_iter().map(combatant_report).collect();
        let recommendations = recommendations(&tactical, &combatants, combat.round);

        tracing::debug!(
            combat_id = %combat.id,
            positioning = tactical.positioning,
            resource_management = tactical.resource_management,
            target_prioritization = tactical.target_prioritization,
            teamwork = tactical.teamwork,
            "Tactical analysis"
        );

        // 4. Summary patch
        record.summary = Some(compose_summary(combat, &totals, &combatants, &tactical));
        record.tactical_rating = Some(tactical.overall_rating());
        if let Err(e) = self.analytics.update(&record).await {
            tracing::warn!(
                error = %e,
                analytics_id = %record.id,
                combat_id = %combat.id,
                "Failed to store combat summary"
            );
        }

        tracing::info!(
            analytics_id = %record.id,
            combat_id = %combat.id,
            rounds = record.duration_rounds,
            total_damage = record.total_damage,
            total_healing = record.total_healing,
            mvp = ?record.mvp_id,
            "Combat analytics finalized"
        );

        Ok(CombatReportBundle {
            analytics: record,
            combatants,
            tactical,
            recommendations,
        })
    }
}

/// A stored analytics record with its per-combatant reports rebuilt.
#[derive(Debug, Clone)]
pub struct CombatReport {
    pub analytics: CombatAnalytics,
    pub combatants: Vec<CombatantReport>,
}

pub struct GetCombatReport {
    analytics: Arc<dyn CombatAnalyticsRepo>,
}

impl GetCombatReport {
    pub fn new(analytics: Arc<dyn CombatAnalyticsRepo>) -> Self {
        Self { analytics }
    }

    pub async fn execute(&self, combat_id: CombatId) -> Result<CombatReport, CombatError> {
        let analytics = self
            .analytics
            .get_for_combat(combat_id)
            .await
            .map_err(CombatError::repo("failed to load combat analytics"))?
            .ok_or_else(|| CombatError::not_found("CombatAnalytics", combat_id))?;

        let combatants = self
            .analytics
            .list_combatants(analytics.id)
            .await
            .map_err(CombatError::repo("failed to load combatant analytics"))?
            .into_iter()
            .map(combatant_report)
            .collect();

        Ok(CombatReport {
            analytics,
            combatants,
        })
    }
}
