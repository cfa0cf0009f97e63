use chrono::{DateTime, Utc};
use sqlx::Error;
use uuid::Uuid;

use crate::model::{Balance_Snapshot, Table};

impl Table<Balance_Snapshot> {
    pub async fn insert(&self, data: &Balance_Snapshot) -> Result<Uuid, Error> {
        const SQL: &str = r#"
        INSERT INTO "user_balance_snapshots" (
            "user_id",
            "snapshot_type",
            "total_balance",
            "unrealized_pnl"
        )
        VALUES ($1, $2, $3, $4)
        RETURNING "id"
        "#;

        let (id,): (Uuid,) = sqlx::query_as(SQL)
            .bind(data.user_id)
            .bind(&data.snapshot_type)
            .bind(&data.total_balance)
            .bind(&data.unrealized_pnl)
            .persistent(true)
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    pub async fn get_latest(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Balance_Snapshot>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "user_balance_snapshots"
        WHERE "user_id" = $1
        ORDER BY "created_at" DESC
        LIMIT 1
        "#;

        sqlx::query_as(SQL)
            .bind(user_id)
            .persistent(true)
            .fetch_optional(&self.pool)
            .await
    }

    /// The latest snapshot taken at or before `timestamp`.
    pub async fn get_near(
        &self,
        user_id: Uuid,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<Balance_Snapshot>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "user_balance_snapshots"
        WHERE
            "user_id" = $1 AND
            "created_at" <= $2
        ORDER BY "created_at" DESC
        LIMIT 1
        "#;

        sqlx::query_as(SQL)
            .bind(user_id)
            .bind(timestamp)
            .persistent(true)
            .fetch_optional(&self.pool)
            .await
    }
}
