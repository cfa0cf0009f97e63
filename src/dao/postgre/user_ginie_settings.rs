use bigdecimal::BigDecimal;
use sqlx::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::model::{Table, User_Ginie_Settings};

use super::QueryResult;

impl Table<User_Ginie_Settings> {
    /// `None` when the user has never stored settings.
    pub async fn get(
        &self,
        user_id: Uuid,
    ) -> Result<Option<User_Ginie_Settings>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "user_ginie_settings"
        WHERE "user_id" = $1
        "#;

        sqlx::query_as(SQL)
            .bind(user_id)
            .persistent(true)
            .fetch_optional(&self.pool)
            .await
    }

    /// Full upsert keyed by `user_id`. Overwrites the counters too, so it
    /// must not race with `update_pnl_stats` for the same user.
    pub async fn save(&self, data: &User_Ginie_Settings) -> Result<(), Error> {
        const SQL: &str = r#"
        INSERT INTO "user_ginie_settings" (
            "user_id",
            "dry_run_mode",
            "auto_start",
            "max_positions",
            "auto_mode_enabled",
            "auto_mode_max_positions",
            "auto_mode_max_leverage",
            "auto_mode_max_position_size",
            "auto_mode_max_total_usd",
            "auto_mode_allow_averaging",
            "auto_mode_max_averages",
            "auto_mode_min_hold_minutes",
            "auto_mode_quick_profit_mode",
            "auto_mode_min_profit_exit",
            "total_pnl",
            "daily_pnl",
            "total_trades",
            "winning_trades",
            "daily_trades",
            "pnl_last_update",
            "updated_at"
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, NOW())
        ON CONFLICT ("user_id") DO UPDATE SET
            "dry_run_mode" = EXCLUDED."dry_run_mode",
            "auto_start" = EXCLUDED."auto_start",
            "max_positions" = EXCLUDED."max_positions",
            "auto_mode_enabled" = EXCLUDED."auto_mode_enabled",
            "auto_mode_max_positions" = EXCLUDED."auto_mode_max_positions",
            "auto_mode_max_leverage" = EXCLUDED."auto_mode_max_leverage",
            "auto_mode_max_position_size" = EXCLUDED."auto_mode_max_position_size",
            "auto_mode_max_total_usd" = EXCLUDED."auto_mode_max_total_usd",
            "auto_mode_allow_averaging" = EXCLUDED."auto_mode_allow_averaging",
            "auto_mode_max_averages" = EXCLUDED."auto_mode_max_averages",
            "auto_mode_min_hold_minutes" = EXCLUDED."auto_mode_min_hold_minutes",
            "auto_mode_quick_profit_mode" = EXCLUDED."auto_mode_quick_profit_mode",
            "auto_mode_min_profit_exit" = EXCLUDED."auto_mode_min_profit_exit",
            "total_pnl" = EXCLUDED."total_pnl",
            "daily_pnl" = EXCLUDED."daily_pnl",
            "total_trades" = EXCLUDED."total_trades",
            "winning_trades" = EXCLUDED."winning_trades",
            "daily_trades" = EXCLUDED."daily_trades",
            "pnl_last_update" = EXCLUDED."pnl_last_update",
            "updated_at" = NOW()
        "#;

        sqlx::query(SQL)
            .bind(data.user_id)
            .bind(data.dry_run_mode)
            .bind(data.auto_start)
            .bind(data.max_positions)
            .bind(data.auto_mode_enabled)
            .bind(data.auto_mode_max_positions)
            .bind(data.auto_mode_max_leverage)
            .bind(&data.auto_mode_max_position_size)
            .bind(&data.auto_mode_max_total_usd)
            .bind(data.auto_mode_allow_averaging)
            .bind(data.auto_mode_max_averages)
            .bind(data.auto_mode_min_hold_minutes)
            .bind(data.auto_mode_quick_profit_mode)
            .bind(&data.auto_mode_min_profit_exit)
            .bind(&data.total_pnl)
            .bind(&data.daily_pnl)
            .bind(data.total_trades)
            .bind(data.winning_trades)
            .bind(data.daily_trades)
            .bind(data.pnl_last_update)
            .persistent(true)
            .execute(&self.pool)
            .await
            .map(drop)
    }

    /// Records one closed trade for the user. The counters are bumped in a
    /// single statement so concurrent callers never lose an increment.
    /// A user without a row gets default settings first, then one retry.
    pub async fn update_pnl_stats(
        &self,
        user_id: Uuid,
        pnl: &BigDecimal,
        is_win: bool,
    ) -> Result<(), Error> {
        let result = self.increment_pnl(user_id, pnl, is_win).await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        debug!("No ginie settings for user {}, initializing defaults", user_id);
        self.insert_defaults(user_id).await?;

        let result = self.increment_pnl(user_id, pnl, is_win).await?;
        if result.rows_affected() == 0 {
            info!("PnL update for user {} affected no rows after init", user_id);
        }

        Ok(())
    }

    async fn increment_pnl(
        &self,
        user_id: Uuid,
        pnl: &BigDecimal,
        is_win: bool,
    ) -> Result<QueryResult, Error> {
        const SQL: &str = r#"
        UPDATE "user_ginie_settings" SET
            "total_trades" = "total_trades" + 1,
            "daily_trades" = "daily_trades" + 1,
            "winning_trades" = "winning_trades" + CASE WHEN $3 THEN 1 ELSE 0 END,
            "total_pnl" = "total_pnl" + $2,
            "daily_pnl" = "daily_pnl" + $2,
            "pnl_last_update" = NOW(),
            "updated_at" = NOW()
        WHERE "user_id" = $1
        "#;

        sqlx::query(SQL)
            .bind(user_id)
            .bind(pnl)
            .bind(is_win)
            .persistent(true)
            .execute(&self.pool)
            .await
    }

    /// Creates the default row unless one already exists. Never touches an
    /// existing row, so a concurrent initializer cannot reset counters.
    async fn insert_defaults(&self, user_id: Uuid) -> Result<(), Error> {
        const SQL: &str = r#"
        INSERT INTO "user_ginie_settings" ("user_id")
        VALUES ($1)
        ON CONFLICT ("user_id") DO NOTHING
        "#;

        sqlx::query(SQL)
            .bind(user_id)
            .persistent(true)
            .execute(&self.pool)
            .await
            .map(drop)
    }

    pub async fn reset_daily_pnl(
        &self,
        user_id: Uuid,
    ) -> Result<QueryResult, Error> {
        const SQL: &str = r#"
        UPDATE "user_ginie_settings" SET
            "daily_pnl" = 0,
            "daily_trades" = 0,
            "pnl_last_update" = NOW(),
            "updated_at" = NOW()
        WHERE "user_id" = $1
        "#;

        sqlx::query(SQL)
            .bind(user_id)
            .persistent(true)
            .execute(&self.pool)
            .await
    }
}
