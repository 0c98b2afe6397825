//! SQLite-backed storage for combat records.
//!
//! Every record is stored as a JSON document next to the columns it is
//! looked up by, so the schema only changes when a lookup does.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use skirmish_domain::{
    AnalyticsId, AutoCombatResolution, CombatAnalytics, CombatId, CombatantAnalytics, CombatantId,
    ResolutionId, SessionId, SmartInitiativeRule,
};

use crate::infrastructure::ports::{
    CombatAnalyticsRepo, CombatResolutionRepo, InitiativeRuleRepo, RepoError,
};

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS combat_resolutions (
        id TEXT PRIMARY KEY,
        session_id TEXT NOT NULL,
        data_json TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS combat_analytics (
        id TEXT PRIMARY KEY,
        combat_id TEXT NOT NULL UNIQUE,
        session_id TEXT NOT NULL,
        data_json TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS combatant_analytics (
        id TEXT PRIMARY KEY,
        analytics_id TEXT NOT NULL,
        combatant_id TEXT NOT NULL,
        data_json TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS initiative_rules (
        session_id TEXT NOT NULL,
        combatant_id TEXT NOT NULL,
        data_json TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        PRIMARY KEY (session_id, combatant_id)
    )
    "#,
];

/// SQLite implementation of the three combat record repositories.
pub struct SqliteCombatStore {
    pool: SqlitePool,
}

impl SqliteCombatStore {
    pub async fn new(db_path: &str) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| RepoError::database("schema", e))?;
        }

        tracing::debug!(db_path, "Combat store ready");
        Ok(Self { pool })
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, RepoError> {
    serde_json::to_string(value).map_err(RepoError::serialization)
}

fn from_row<T: DeserializeOwned>(row: &SqliteRow) -> Result<T, RepoError> {
    let json: String = row.get("data_json");
    serde_json::from_str(&json).map_err(RepoError::serialization)
}

#[async_trait]
impl CombatResolutionRepo for SqliteCombatStore {
    async fn save(&self, resolution: &AutoCombatResolution) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO combat_resolutions (id, session_id, data_json, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                data_json = excluded.data_json
            "#,
        )
        .bind(resolution.id.to_string())
        .bind(resolution.session_id.to_string())
        .bind(to_json(resolution)?)
        .bind(resolution.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save_resolution", e))?;
        Ok(())
    }

    async fn get(&self, id: ResolutionId) -> Result<Option<AutoCombatResolution>, RepoError> {
        let row = sqlx::query("SELECT data_json FROM combat_resolutions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_resolution", e))?;

        row.as_ref().map(from_row).transpose()
    }

    async fn list_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<AutoCombatResolution>, RepoError> {
        let rows = sqlx::query(
            "SELECT data_json FROM combat_resolutions WHERE session_id = ? \
             ORDER BY created_at, rowid",
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_resolutions", e))?;

        rows.iter().map(from_row).collect()
    }
}

#[async_trait]
impl CombatAnalyticsRepo for SqliteCombatStore {
    async fn create(&self, analytics: &CombatAnalytics) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO combat_analytics (id, combat_id, session_id, data_json, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(analytics.id.to_string())
        .bind(analytics.combat_id.to_string())
        .bind(analytics.session_id.to_string())
        .bind(to_json(analytics)?)
        .bind(analytics.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::constraint(
                format!("analytics already recorded for combat {}", analytics.combat_id),
            ),
            other => RepoError::database("create_analytics", other),
        })?;
        Ok(())
    }

    async fn update(&self, analytics: &CombatAnalytics) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE combat_analytics SET data_json = ? WHERE id = ?")
            .bind(to_json(analytics)?)
            .bind(analytics.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("update_analytics", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("CombatAnalytics", analytics.id));
        }
        Ok(())
    }

    async fn get_for_combat(
        &self,
        combat_id: CombatId,
    ) -> Result<Option<CombatAnalytics>, RepoError> {
        let row = sqlx::query("SELECT data_json FROM combat_analytics WHERE combat_id = ?")
            .bind(combat_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_analytics", e))?;

        row.as_ref().map(from_row).transpose()
    }

    async fn save_combatant(&self, analytics: &CombatantAnalytics) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO combatant_analytics (id, analytics_id, combatant_id, data_json)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                data_json = excluded.data_json
            "#,
        )
        .bind(analytics.id.to_string())
        .bind(analytics.analytics_id.to_string())
        .bind(analytics.combatant_id.to_string())
        .bind(to_json(analytics)?)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save_combatant_analytics", e))?;
        Ok(())
    }

    async fn list_combatants(
        &self,
        analytics_id: AnalyticsId,
    ) -> Result<Vec<CombatantAnalytics>, RepoError> {
        let rows = sqlx::query(
            "SELECT data_json FROM combatant_analytics WHERE analytics_id = ? ORDER BY rowid",
        )
        .bind(analytics_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_combatant_analytics", e))?;

        rows.iter().map(from_row).collect()
    }
}

#[async_trait]
impl InitiativeRuleRepo for SqliteCombatStore {
    async fn get(
        &self,
        session_id: SessionId,
        combatant_id: CombatantId,
    ) -> Result<Option<SmartInitiativeRule>, RepoError> {
        let row = sqlx::query(
            "SELECT data_json FROM initiative_rules WHERE session_id = ? AND combatant_id = ?",
        )
        .bind(session_id.to_string())
        .bind(combatant_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_initiative_rule", e))?;

        row.as_ref().map(from_row).transpose()
    }

    async fn save(&self, rule: &SmartInitiativeRule) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO initiative_rules (session_id, combatant_id, data_json, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(session_id, combatant_id) DO UPDATE SET
                data_json = excluded.data_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(rule.session_id.to_string())
        .bind(rule.combatant_id.to_string())
        .bind(to_json(rule)?)
        .bind(rule.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save_initiative_rule", e))?;
        Ok(())
    }

    async fn delete(
        &self,
        session_id: SessionId,
        combatant_id: CombatantId,
    ) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM initiative_rules WHERE session_id = ? AND combatant_id = ?")
            .bind(session_id.to_string())
            .bind(combatant_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("delete_initiative_rule", e))?;
        Ok(())
    }

    async fn list_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<SmartInitiativeRule>, RepoError> {
        let rows = sqlx::query(
            "SELECT data_json FROM initiative_rules WHERE session_id = ? ORDER BY rowid",
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_initiative_rules", e))?;

        rows.iter().map(from_row).collect()
    }
}
