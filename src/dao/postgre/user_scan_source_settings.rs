use sqlx::Error;
use uuid::Uuid;

use crate::model::{Table, User_Scan_Source_Settings};

impl Table<User_Scan_Source_Settings> {
    pub async fn get(
        &self,
        user_id: Uuid,
    ) -> Result<Option<User_Scan_Source_Settings>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "user_scan_source_settings"
        WHERE "user_id" = $1
        "#;

        sqlx::query_as(SQL)
            .bind(user_id)
            .persistent(true)
            .fetch_optional(&self.pool)
            .await
    }

    /// Upserts on `user_id`. `max_coins` is clamped before it is stored.
    pub async fn upsert(
        &self,
        data: &User_Scan_Source_Settings,
    ) -> Result<(), Error> {
        const SQL: &str = r#"
        INSERT INTO "user_scan_source_settings" (
            "user_id",
            "max_coins",
            "use_saved_coins",
            "saved_coins",
            "use_llm_list",
            "use_market_movers",
            "mover_gainers",
            "mover_losers",
            "mover_volume",
            "mover_volatility",
            "mover_new_listings",
            "gainers_limit",
            "losers_limit",
            "volume_limit",
            "volatility_limit",
            "new_listings_limit"
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        ON CONFLICT ("user_id") DO UPDATE SET
            "max_coins" = EXCLUDED."max_coins",
            "use_saved_coins" = EXCLUDED."use_saved_coins",
            "saved_coins" = EXCLUDED."saved_coins",
            "use_llm_list" = EXCLUDED."use_llm_list",
            "use_market_movers" = EXCLUDED."use_market_movers",
            "mover_gainers" = EXCLUDED."mover_gainers",
            "mover_losers" = EXCLUDED."mover_losers",
            "mover_volume" = EXCLUDED."mover_volume",
            "mover_volatility" = EXCLUDED."mover_volatility",
            "mover_new_listings" = EXCLUDED."mover_new_listings",
            "gainers_limit" = EXCLUDED."gainers_limit",
            "losers_limit" = EXCLUDED."losers_limit",
            "volume_limit" = EXCLUDED."volume_limit",
            "volatility_limit" = EXCLUDED."volatility_limit",
            "new_listings_limit" = EXCLUDED."new_listings_limit",
            "updated_at" = NOW()
        "#;

        sqlx::query(SQL)
            .bind(data.user_id)
            .bind(data.clamped_max_coins())
            .bind(data.use_saved_coins)
            .bind(&data.saved_coins)
            .bind(data.use_llm_list)
            .bind(data.use_market_movers)
            .bind(data.mover_gainers)
            .bind(data.mover_losers)
            .bind(data.mover_volume)
            .bind(data.mover_volatility)
            .bind(data.mover_new_listings)
            .bind(data.gainers_limit)
            .bind(data.losers_limit)
            .bind(data.volume_limit)
            .bind(data.volatility_limit)
            .bind(data.new_listings_limit)
            .persistent(true)
            .execute(&self.pool)
            .await
            .map(drop)
    }

    /// Empty when the user has no settings row.
    pub async fn get_saved_coins(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<String>, Error> {
        const SQL: &str = r#"
        SELECT "saved_coins"
        FROM "user_scan_source_settings"
        WHERE "user_id" = $1
        "#;

        let coins: Option<(Vec<String>,)> = sqlx::query_as(SQL)
            .bind(user_id)
            .persistent(true)
            .fetch_optional(&self.pool)
            .await?;

        Ok(coins.map(|(coins,)| coins).unwrap_or_default())
    }
}
