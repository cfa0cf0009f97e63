use chrono::{DateTime, Utc};
use sqlx::Error;
use uuid::Uuid;

use crate::{
    helpers::SettlementStatus,
    model::{Profit_Period, Table},
};

impl Table<Profit_Period> {
    pub async fn insert(&self, data: &Profit_Period) -> Result<Uuid, Error> {
        const SQL: &str = r#"
        INSERT INTO "user_profit_tracking" (
            "user_id",
            "period_start",
            "period_end",
            "starting_balance",
            "ending_balance",
            "deposits",
            "withdrawals",
            "gross_profit",
            "loss_carryforward",
            "net_profit",
            "high_water_mark",
            "profit_share_rate",
            "profit_share_due",
            "settlement_status"
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING "id"
        "#;

        let (id,): (Uuid,) = sqlx::query_as(SQL)
            .bind(data.user_id)
            .bind(data.period_start)
            .bind(data.period_end)
            .bind(&data.starting_balance)
            .bind(&data.ending_balance)
            .bind(&data.deposits)
            .bind(&data.withdrawals)
            .bind(&data.gross_profit)
            .bind(&data.loss_carryforward)
            .bind(&data.net_profit)
            .bind(&data.high_water_mark)
            .bind(&data.profit_share_rate)
            .bind(&data.profit_share_due)
            .bind(&data.settlement_status)
            .persistent(true)
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    pub async fn get_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Profit_Period>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "user_profit_tracking"
        WHERE "user_id" = $1
        ORDER BY "period_start" DESC
        LIMIT $2
        "#;

        sqlx::query_as(SQL)
            .bind(user_id)
            .bind(limit)
            .persistent(true)
            .fetch_all(&self.pool)
            .await
    }

    /// The most recent period that ended before `before`.
    pub async fn get_latest_before(
        &self,
        user_id: Uuid,
        before: DateTime<Utc>,
    ) -> Result<Option<Profit_Period>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "user_profit_tracking"
        WHERE
            "user_id" = $1 AND
            "period_end" < $2
        ORDER BY "period_end" DESC
        LIMIT 1
        "#;

        sqlx::query_as(SQL)
            .bind(user_id)
            .bind(before)
            .persistent(true)
            .fetch_optional(&self.pool)
            .await
    }

    /// Moves an open period to `status`. Paid and waived close the period
    /// and stamp `settled_at`; a closed period is never updated again.
    /// Returns `false` when the period is unknown or already closed.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: SettlementStatus,
        stripe_invoice_id: Option<&str>,
    ) -> Result<bool, Error> {
        const SQL: &str = r#"
        UPDATE "user_profit_tracking" SET
            "settlement_status" = $2,
            "stripe_invoice_id" = COALESCE($3, "stripe_invoice_id"),
            "settled_at" = CASE WHEN $4 THEN NOW() ELSE "settled_at" END
        WHERE
            "id" = $1 AND
            "settled_at" IS NULL
        "#;

        let result = sqlx::query(SQL)
            .bind(id)
            .bind(status.as_str())
            .bind(stripe_invoice_id)
            .bind(status.is_final())
            .persistent(true)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Pending periods with something owed, oldest first.
    pub async fn get_pending(&self) -> Result<Vec<Profit_Period>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "user_profit_tracking"
        WHERE
            "settlement_status" = 'pending' AND
            "profit_share_due" > 0
        ORDER BY "period_end" ASC
        "#;

        sqlx::query_as(SQL).persistent(true).fetch_all(&self.pool).await
    }
}
