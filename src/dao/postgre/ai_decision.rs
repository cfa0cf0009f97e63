use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Error, FromRow};

use crate::model::{AI_Decision, Table};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AIDecisionStats {
    pub total: i64,
    pub buy_decisions: i64,
    pub sell_decisions: i64,
    pub hold_decisions: i64,
    pub executed: i64,
    pub avg_confidence: Option<BigDecimal>,
    pub avg_confluence: Option<BigDecimal>,
}

impl Table<AI_Decision> {
    /// Stores the decision and returns the persisted row with its
    /// generated `id` and `created_at`.
    pub async fn insert(&self, data: &AI_Decision) -> Result<AI_Decision, Error> {
        const SQL: &str = r#"
        INSERT INTO "ai_decisions" (
            "symbol",
            "current_price",
            "action",
            "confidence",
            "reasoning",
            "signals",
            "ml_direction",
            "ml_confidence",
            "sentiment_direction",
            "sentiment_confidence",
            "llm_direction",
            "llm_confidence",
            "pattern_direction",
            "pattern_confidence",
            "bigcandle_direction",
            "bigcandle_confidence",
            "confluence_count",
            "risk_level",
            "executed"
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
        RETURNING *
        "#;

        sqlx::query_as(SQL)
            .bind(&data.symbol)
            .bind(&data.current_price)
            .bind(&data.action)
            .bind(&data.confidence)
            .bind(&data.reasoning)
            .bind(&data.signals)
            .bind(&data.ml_direction)
            .bind(&data.ml_confidence)
            .bind(&data.sentiment_direction)
            .bind(&data.sentiment_confidence)
            .bind(&data.llm_direction)
            .bind(&data.llm_confidence)
            .bind(&data.pattern_direction)
            .bind(&data.pattern_confidence)
            .bind(&data.bigcandle_direction)
            .bind(&data.bigcandle_confidence)
            .bind(data.confluence_count)
            .bind(&data.risk_level)
            .bind(data.executed)
            .persistent(true)
            .fetch_one(&self.pool)
            .await
    }

    /// Newest first. `symbol` and `action` narrow the result when given.
    pub async fn get_many(
        &self,
        limit: i64,
        symbol: Option<&str>,
        action: Option<&str>,
    ) -> Result<Vec<AI_Decision>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "ai_decisions"
        WHERE
            ($1::VARCHAR IS NULL OR "symbol" = $1) AND
            ($2::VARCHAR IS NULL OR "action" = $2)
        ORDER BY "created_at" DESC
        LIMIT $3
        "#;

        sqlx::query_as(SQL)
            .bind(symbol)
            .bind(action)
            .bind(limit)
            .persistent(true)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get_by_id(
        &self,
        id: i32,
    ) -> Result<AI_Decision, crate::error::Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "ai_decisions"
        WHERE "id" = $1
        "#;

        sqlx::query_as(SQL)
            .bind(id)
            .persistent(true)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                crate::error::Error::not_found_or(e, format!("ai decision {}", id))
            })
    }

    pub async fn get_stats(
        &self,
        since: DateTime<Utc>,
    ) -> Result<AIDecisionStats, Error> {
        const SQL: &str = r#"
        SELECT
            COUNT(*) AS "total",
            COUNT(*) FILTER (WHERE "action" = 'buy') AS "buy_decisions",
            COUNT(*) FILTER (WHERE "action" = 'sell') AS "sell_decisions",
            COUNT(*) FILTER (WHERE "action" = 'hold') AS "hold_decisions",
            COUNT(*) FILTER (WHERE "executed") AS "executed",
            AVG("confidence") AS "avg_confidence",
            AVG("confluence_count") AS "avg_confluence"
        FROM "ai_decisions"
        WHERE "created_at" >= $1
        "#;

        sqlx::query_as(SQL)
            .bind(since)
            .persistent(true)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn mark_executed(&self, id: i32) -> Result<(), Error> {
        const SQL: &str = r#"
        UPDATE "ai_decisions"
        SET "executed" = TRUE
        WHERE "id" = $1
        "#;

        sqlx::query(SQL)
            .bind(id)
            .persistent(true)
            .execute(&self.pool)
            .await
            .map(drop)
    }

    /// Returns the number of rows removed.
    pub async fn delete_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, Error> {
        const SQL: &str = r#"
        DELETE FROM "ai_decisions"
        WHERE "created_at" < $1
        "#;

        let result = sqlx::query(SQL)
            .bind(cutoff)
            .persistent(true)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
