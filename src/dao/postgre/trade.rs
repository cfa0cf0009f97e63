use bigdecimal::BigDecimal;
use serde::Serialize;
use sqlx::Error;

use crate::{
    helpers::TradeStatus,
    model::{AI_Decision, Table, Trade},
};

/// A spot trade together with the AI decision it was opened on, if any.
#[derive(Debug, Clone, Serialize)]
pub struct TradeWithDecision {
    pub trade: Trade,
    pub ai_decision: Option<AI_Decision>,
}

impl Table<Trade> {
    pub async fn insert(&self, data: &Trade) -> Result<i32, Error> {
        const SQL: &str = r#"
        INSERT INTO "trades" (
            "symbol",
            "side",
            "entry_price",
            "exit_price",
            "quantity",
            "entry_time",
            "exit_time",
            "stop_loss",
            "take_profit",
            "pnl",
            "pnl_percent",
            "strategy_name",
            "status",
            "ai_decision_id",
            "trailing_stop_enabled",
            "trailing_stop_percent",
            "highest_price",
            "lowest_price",
            "take_profit_order_id",
            "stop_loss_order_id"
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
        RETURNING "id"
        "#;

        let (id,): (i32,) = sqlx::query_as(SQL)
            .bind(&data.symbol)
            .bind(&data.side)
            .bind(&data.entry_price)
            .bind(&data.exit_price)
            .bind(&data.quantity)
            .bind(data.entry_time)
            .bind(data.exit_time)
            .bind(&data.stop_loss)
            .bind(&data.take_profit)
            .bind(&data.pnl)
            .bind(&data.pnl_percent)
            .bind(&data.strategy_name)
            .bind(&data.status)
            .bind(data.ai_decision_id)
            .bind(data.trailing_stop_enabled)
            .bind(&data.trailing_stop_percent)
            .bind(&data.highest_price)
            .bind(&data.lowest_price)
            .bind(data.take_profit_order_id)
            .bind(data.stop_loss_order_id)
            .persistent(true)
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    pub async fn link_ai_decision(
        &self,
        trade_id: i32,
        ai_decision_id: i32,
    ) -> Result<(), Error> {
        const SQL: &str = r#"
        UPDATE "trades"
        SET "ai_decision_id" = $1
        WHERE "id" = $2
        "#;

        sqlx::query(SQL)
            .bind(ai_decision_id)
            .bind(trade_id)
            .persistent(true)
            .execute(&self.pool)
            .await
            .map(drop)
    }

    pub async fn update_trailing_info(
        &self,
        trade_id: i32,
        highest_price: &BigDecimal,
        lowest_price: &BigDecimal,
        stop_loss: &BigDecimal,
    ) -> Result<(), Error> {
        const SQL: &str = r#"
        UPDATE "trades" SET
            "highest_price" = $1,
            "lowest_price" = $2,
            "stop_loss" = $3,
            "updated_at" = NOW()
        WHERE "id" = $4
        "#;

        sqlx::query(SQL)
            .bind(highest_price)
            .bind(lowest_price)
            .bind(stop_loss)
            .bind(trade_id)
            .persistent(true)
            .execute(&self.pool)
            .await
            .map(drop)
    }

    pub async fn get_by_id(
        &self,
        trade_id: i32,
    ) -> Result<Trade, crate::error::Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "trades"
        WHERE "id" = $1
        "#;

        sqlx::query_as(SQL)
            .bind(trade_id)
            .persistent(true)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                crate::error::Error::not_found_or(e, format!("trade {}", trade_id))
            })
    }

    pub async fn get_with_ai_decision(
        &self,
        trade_id: i32,
    ) -> Result<TradeWithDecision, crate::error::Error> {
        let trade = self.get_by_id(trade_id).await?;
        let ai_decision = match trade.ai_decision_id {
            Some(id) => self.get_decision(id).await?,
            None => None,
        };

        Ok(TradeWithDecision { trade, ai_decision })
    }

    /// Open trades, newest entry first, each with its linked decision.
    pub async fn get_open(&self) -> Result<Vec<TradeWithDecision>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "trades"
        WHERE "status" = $1
        ORDER BY "entry_time" DESC
        "#;

        let trades: Vec<Trade> = sqlx::query_as(SQL)
            .bind(TradeStatus::Open.as_str())
            .persistent(true)
            .fetch_all(&self.pool)
            .await?;

        let mut items = Vec::with_capacity(trades.len());
        for trade in trades {
            let ai_decision = match trade.ai_decision_id {
                Some(id) => self.get_decision(id).await?,
                None => None,
            };
            items.push(TradeWithDecision { trade, ai_decision });
        }

        Ok(items)
    }

    async fn get_decision(&self, id: i32) -> Result<Option<AI_Decision>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "ai_decisions"
        WHERE "id" = $1
        "#;

        sqlx::query_as(SQL)
            .bind(id)
            .persistent(true)
            .fetch_optional(&self.pool)
            .await
    }
}
