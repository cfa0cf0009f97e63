use chrono::{DateTime, Utc};
use sqlx::Error;
use uuid::Uuid;

use crate::model::{Table, User_Transaction};

impl Table<User_Transaction> {
    pub async fn insert(&self, data: &User_Transaction) -> Result<Uuid, Error> {
        const SQL: &str = r#"
        INSERT INTO "user_transactions" (
            "user_id",
            "type",
            "amount",
            "currency",
            "tx_hash",
            "status"
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING "id"
        "#;

        let (id,): (Uuid,) = sqlx::query_as(SQL)
            .bind(data.user_id)
            .bind(&data.tx_type)
            .bind(&data.amount)
            .bind(&data.currency)
            .bind(&data.tx_hash)
            .bind(&data.status)
            .persistent(true)
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    /// Transactions created in `[start, end)`, oldest first.
    pub async fn get_by_user(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<User_Transaction>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "user_transactions"
        WHERE
            "user_id" = $1 AND
            "created_at" >= $2 AND
            "created_at" < $3
        ORDER BY "created_at" ASC
        "#;

        sqlx::query_as(SQL)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .persistent(true)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<(), Error> {
        const SQL: &str = r#"
        UPDATE "user_transactions"
        SET "status" = $2
        WHERE "id" = $1
        "#;

        sqlx::query(SQL)
            .bind(id)
            .bind(status)
            .persistent(true)
            .execute(&self.pool)
            .await
            .map(drop)
    }

    pub async fn confirm(&self, id: Uuid) -> Result<(), Error> {
        const SQL: &str = r#"
        UPDATE "user_transactions" SET
            "status" = 'confirmed',
            "confirmed_at" = NOW()
        WHERE "id" = $1
        "#;

        sqlx::query(SQL)
            .bind(id)
            .persistent(true)
            .execute(&self.pool)
            .await
            .map(drop)
    }
}
