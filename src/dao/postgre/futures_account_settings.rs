use sqlx::Error;

use crate::model::{Futures_Account_Settings, Table};

impl Table<Futures_Account_Settings> {
    /// Stored settings for the symbol, or the exchange defaults when the
    /// symbol has never been configured.
    pub async fn get(
        &self,
        symbol: &str,
    ) -> Result<Futures_Account_Settings, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "futures_account_settings"
        WHERE "symbol" = $1
        "#;

        let settings: Option<Futures_Account_Settings> = sqlx::query_as(SQL)
            .bind(symbol)
            .persistent(true)
            .fetch_optional(&self.pool)
            .await?;

        Ok(settings
            .unwrap_or_else(|| Futures_Account_Settings::default_for(symbol)))
    }

    pub async fn upsert(
        &self,
        data: &Futures_Account_Settings,
    ) -> Result<i32, Error> {
        const SQL: &str = r#"
        INSERT INTO "futures_account_settings" (
            "symbol",
            "leverage",
            "margin_type",
            "position_mode"
        )
        VALUES ($1, $2, $3, $4)
        ON CONFLICT ("symbol") DO UPDATE SET
            "leverage" = EXCLUDED."leverage",
            "margin_type" = EXCLUDED."margin_type",
            "position_mode" = EXCLUDED."position_mode",
            "updated_at" = NOW()
        RETURNING "id"
        "#;

        let (id,): (i32,) = sqlx::query_as(SQL)
            .bind(&data.symbol)
            .bind(data.leverage)
            .bind(&data.margin_type)
            .bind(&data.position_mode)
            .persistent(true)
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }
}
