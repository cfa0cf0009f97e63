use chrono::{DateTime, NaiveDate, Utc};
use sqlx::Error;
use tracing::debug;
use uuid::Uuid;

use crate::{
    helpers::needs_settlement_at,
    model::{Table, User},
};

impl Table<User> {
    pub async fn insert(&self, email: &str, timezone: &str) -> Result<User, Error> {
        const SQL: &str = r#"
        INSERT INTO "users" (
            "email",
            "timezone"
        )
        VALUES ($1, $2)
        RETURNING "id", "email", "timezone", "last_settlement_date", "created_at"
        "#;

        sqlx::query_as(SQL)
            .bind(email)
            .bind(timezone)
            .persistent(true)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn get_users_for_settlement_check(
        &self,
    ) -> Result<Vec<User>, Error> {
        const SQL: &str = r#"
        SELECT
            "id",
            "email",
            COALESCE("timezone", 'UTC') AS "timezone",
            "last_settlement_date",
            "created_at"
        FROM "users"
        ORDER BY "created_at" ASC
        "#;

        sqlx::query_as(SQL).persistent(true).fetch_all(&self.pool).await
    }

    /// `Ok(None)` both for unknown users and users never settled.
    pub async fn get_last_settlement_date(
        &self,
        user_id: Uuid,
    ) -> Result<Option<NaiveDate>, Error> {
        const SQL: &str = r#"
        SELECT "last_settlement_date"
        FROM "users"
        WHERE "id" = $1
        "#;

        let row: Option<(Option<NaiveDate>,)> = sqlx::query_as(SQL)
            .bind(user_id)
            .persistent(true)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.and_then(|(date,)| date))
    }

    pub async fn update_last_settlement_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<(), Error> {
        const SQL: &str = r#"
        UPDATE "users"
        SET "last_settlement_date" = $2
        WHERE "id" = $1
        "#;

        sqlx::query(SQL)
            .bind(user_id)
            .bind(date)
            .persistent(true)
            .execute(&self.pool)
            .await
            .map(drop)
    }

    /// Users whose local calendar day has moved past their last settlement.
    pub async fn get_users_needing_settlement(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<User>, Error> {
        let users = self.get_users_for_settlement_check().await?;
        let total = users.len();

        let due: Vec<User> = users
            .into_iter()
            .filter(|user| {
                needs_settlement_at(user.last_settlement_date, &user.timezone, now)
            })
            .collect();

        debug!("{} of {} users need settlement", due.len(), total);

        Ok(due)
    }
}
