use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Error, FromRow};

use crate::{
    helpers::TradeStatus,
    model::{Futures_Trade, Table},
};

#[derive(Debug, Clone, Default, FromRow)]
pub struct FuturesTradeTotals {
    pub total_trades: i64,
    pub winning_trades: i64,
    pub losing_trades: i64,
    pub total_realized_pnl: BigDecimal,
    pub total_unrealized_pnl: BigDecimal,
    pub average_win: BigDecimal,
    pub average_loss: BigDecimal,
    pub largest_win: BigDecimal,
    pub largest_loss: BigDecimal,
    pub total_wins: BigDecimal,
    pub total_losses: BigDecimal,
    pub average_leverage: BigDecimal,
    pub open_positions: i64,
    pub last_trade_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FuturesTradingMetrics {
    pub total_trades: i64,
    pub winning_trades: i64,
    pub losing_trades: i64,
    pub win_rate: f64,
    pub total_realized_pnl: BigDecimal,
    pub total_unrealized_pnl: BigDecimal,
    pub total_funding_fees: BigDecimal,
    pub average_pnl: BigDecimal,
    pub average_win: BigDecimal,
    pub average_loss: BigDecimal,
    pub largest_win: BigDecimal,
    pub largest_loss: BigDecimal,
    pub profit_factor: BigDecimal,
    pub average_leverage: BigDecimal,
    pub open_positions: i64,
    pub open_orders: i64,
    pub last_trade_time: Option<DateTime<Utc>>,
}

impl FuturesTradingMetrics {
    pub fn from_totals(
        totals: FuturesTradeTotals,
        total_funding_fees: BigDecimal,
        open_orders: i64,
    ) -> Self {
        let (win_rate, average_pnl) = if totals.total_trades > 0 {
            (
                totals.winning_trades as f64 / totals.total_trades as f64
                    * 100.0,
                (&totals.total_realized_pnl
                    / BigDecimal::from(totals.total_trades))
                .round(8),
            )
        } else {
            (0.0, BigDecimal::zero())
        };

        let profit_factor = if totals.total_losses > BigDecimal::zero() {
            (&totals.total_wins / &totals.total_losses).round(4)
        } else {
            BigDecimal::zero()
        };

        FuturesTradingMetrics {
            total_trades: totals.total_trades,
            winning_trades: totals.winning_trades,
            losing_trades: totals.losing_trades,
            win_rate,
            total_realized_pnl: totals.total_realized_pnl,
            total_unrealized_pnl: totals.total_unrealized_pnl,
            total_funding_fees,
            average_pnl,
            average_win: totals.average_win.round(8),
            average_loss: totals.average_loss.round(8),
            largest_win: totals.largest_win,
            largest_loss: totals.largest_loss,
            profit_factor,
            average_leverage: totals.average_leverage.round(2),
            open_positions: totals.open_positions,
            open_orders,
            last_trade_time: totals.last_trade_time,
        }
    }
}

impl Table<Futures_Trade> {
    pub async fn insert(&self, data: &Futures_Trade) -> Result<i32, Error> {
        const SQL: &str = r#"
        INSERT INTO "futures_trades" (
            "user_id",
            "symbol",
            "position_side",
            "side",
            "entry_price",
            "mark_price",
            "quantity",
            "leverage",
            "margin_type",
            "isolated_margin",
            "unrealized_pnl",
            "liquidation_price",
            "stop_loss",
            "take_profit",
            "trailing_stop",
            "status",
            "entry_time",
            "trade_source",
            "notes",
            "ai_decision_id",
            "strategy_id",
            "strategy_name",
            "trading_mode"
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)
        RETURNING "id"
        "#;

        let (id,): (i32,) = sqlx::query_as(SQL)
            .bind(data.user_id)
            .bind(&data.symbol)
            .bind(&data.position_side)
            .bind(&data.side)
            .bind(&data.entry_price)
            .bind(&data.mark_price)
            .bind(&data.quantity)
            .bind(data.leverage)
            .bind(&data.margin_type)
            .bind(&data.isolated_margin)
            .bind(&data.unrealized_pnl)
            .bind(&data.liquidation_price)
            .bind(&data.stop_loss)
            .bind(&data.take_profit)
            .bind(&data.trailing_stop)
            .bind(&data.status)
            .bind(data.entry_time)
            .bind(&data.trade_source)
            .bind(&data.notes)
            .bind(data.ai_decision_id)
            .bind(data.strategy_id)
            .bind(&data.strategy_name)
            .bind(&data.trading_mode)
            .persistent(true)
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    /// Writes the mutable part of a position: exit, marks, pnl, protective
    /// levels, status and notes.
    pub async fn update(&self, data: &Futures_Trade) -> Result<(), Error> {
        const SQL: &str = r#"
        UPDATE "futures_trades" SET
            "exit_price" = $2,
            "mark_price" = $3,
            "realized_pnl" = $4,
            "unrealized_pnl" = $5,
            "realized_pnl_percent" = $6,
            "stop_loss" = $7,
            "take_profit" = $8,
            "trailing_stop" = $9,
            "status" = $10,
            "exit_time" = $11,
            "notes" = $12,
            "updated_at" = NOW()
        WHERE "id" = $1
        "#;

        sqlx::query(SQL)
            .bind(data.id)
            .bind(&data.exit_price)
            .bind(&data.mark_price)
            .bind(&data.realized_pnl)
            .bind(&data.unrealized_pnl)
            .bind(&data.realized_pnl_percent)
            .bind(&data.stop_loss)
            .bind(&data.take_profit)
            .bind(&data.trailing_stop)
            .bind(&data.status)
            .bind(data.exit_time)
            .bind(&data.notes)
            .persistent(true)
            .execute(&self.pool)
            .await
            .map(drop)
    }

    pub async fn get_by_id(
        &self,
        id: i32,
    ) -> Result<Futures_Trade, crate::error::Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "futures_trades"
        WHERE "id" = $1
        "#;

        sqlx::query_as(SQL)
            .bind(id)
            .persistent(true)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                crate::error::Error::not_found_or(e, format!("futures trade {}", id))
            })
    }

    pub async fn get_open(&self) -> Result<Vec<Futures_Trade>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "futures_trades"
        WHERE "status" = $1
        ORDER BY "entry_time" DESC
        "#;

        sqlx::query_as(SQL)
            .bind(TradeStatus::Open.as_str())
            .persistent(true)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get_open_by_symbol(
        &self,
        symbol: &str,
    ) -> Result<Option<Futures_Trade>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "futures_trades"
        WHERE
            "status" = $1 AND
            "symbol" = $2
        ORDER BY "entry_time" DESC
        LIMIT 1
        "#;

        sqlx::query_as(SQL)
            .bind(TradeStatus::Open.as_str())
            .bind(symbol)
            .persistent(true)
            .fetch_optional(&self.pool)
            .await
    }

    /// Closed and liquidated positions, most recent exit first.
    pub async fn get_history(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Futures_Trade>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "futures_trades"
        WHERE "status" != $1
        ORDER BY "exit_time" DESC NULLS LAST
        LIMIT $2 OFFSET $3
        "#;

        sqlx::query_as(SQL)
            .bind(TradeStatus::Open.as_str())
            .bind(limit)
            .bind(offset)
            .persistent(true)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn link_ai_decision(
        &self,
        trade_id: i32,
        ai_decision_id: i32,
    ) -> Result<(), Error> {
        const SQL: &str = r#"
        UPDATE "futures_trades" SET
            "ai_decision_id" = $1,
            "updated_at" = NOW()
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

    pub async fn get_metrics(&self) -> Result<FuturesTradingMetrics, Error> {
        const TOTALS: &str = r#"
        SELECT
            COUNT(*) FILTER (WHERE "status" != 'OPEN') AS "total_trades",
            COUNT(*) FILTER (WHERE "status" = 'CLOSED' AND "realized_pnl" > 0) AS "winning_trades",
            COUNT(*) FILTER (WHERE "status" = 'CLOSED' AND "realized_pnl" < 0) AS "losing_trades",
            COALESCE(SUM("realized_pnl") FILTER (WHERE "status" != 'OPEN'), 0) AS "total_realized_pnl",
            COALESCE(SUM("unrealized_pnl") FILTER (WHERE "status" = 'OPEN'), 0) AS "total_unrealized_pnl",
            COALESCE(AVG("realized_pnl") FILTER (WHERE "status" = 'CLOSED' AND "realized_pnl" > 0), 0) AS "average_win",
            COALESCE(AVG("realized_pnl") FILTER (WHERE "status" = 'CLOSED' AND "realized_pnl" < 0), 0) AS "average_loss",
            COALESCE(MAX("realized_pnl") FILTER (WHERE "status" = 'CLOSED'), 0) AS "largest_win",
            COALESCE(MIN("realized_pnl") FILTER (WHERE "status" = 'CLOSED'), 0) AS "largest_loss",
            COALESCE(SUM("realized_pnl") FILTER (WHERE "status" = 'CLOSED' AND "realized_pnl" > 0), 0) AS "total_wins",
            COALESCE(ABS(SUM("realized_pnl") FILTER (WHERE "status" = 'CLOSED' AND "realized_pnl" < 0)), 1) AS "total_losses",
            COALESCE(AVG("leverage"), 10) AS "average_leverage",
            COUNT(*) FILTER (WHERE "status" = 'OPEN') AS "open_positions",
            MAX("exit_time") FILTER (WHERE "status" != 'OPEN') AS "last_trade_time"
        FROM "futures_trades"
        "#;

        const FUNDING: &str = r#"
        SELECT COALESCE(SUM("funding_fee"), 0)
        FROM "funding_fees"
        "#;

        const OPEN_ORDERS: &str = r#"
        SELECT COUNT(*)
        FROM "futures_orders"
        WHERE "status" = 'NEW'
        "#;

        let (totals, (funding,), (open_orders,)) = tokio::try_join!(
            sqlx::query_as::<_, FuturesTradeTotals>(TOTALS)
                .persistent(true)
                .fetch_one(&self.pool),
            sqlx::query_as::<_, (BigDecimal,)>(FUNDING)
                .persistent(true)
                .fetch_one(&self.pool),
            sqlx::query_as::<_, (i64,)>(OPEN_ORDERS)
                .persistent(true)
                .fetch_one(&self.pool),
        )?;

        Ok(FuturesTradingMetrics::from_totals(totals, funding, open_orders))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[test]
    fn metrics_without_trades_are_zero() {
        let metrics = FuturesTradingMetrics::from_totals(
            FuturesTradeTotals::default(),
            BigDecimal::zero(),
            0,
        );

        assert_eq!(metrics.win_rate, 0.0);
        assert_eq!(metrics.average_pnl, BigDecimal::zero());
        assert_eq!(metrics.profit_factor, BigDecimal::zero());
    }

    #[test]
    fn metrics_derive_rates_from_totals() {
        let totals = FuturesTradeTotals {
            total_trades: 4,
            winning_trades: 3,
            losing_trades: 1,
            total_realized_pnl: dec("50"),
            total_wins: dec("60"),
            total_losses: dec("10"),
            average_leverage: dec("12.5"),
            ..Default::default()
        };

        let metrics =
            FuturesTradingMetrics::from_totals(totals, dec("-1.25"), 2);

        assert_eq!(metrics.win_rate, 75.0);
        assert_eq!(metrics.average_pnl, dec("12.5"));
        assert_eq!(metrics.profit_factor, dec("6"));
        assert_eq!(metrics.total_funding_fees, dec("-1.25"));
        assert_eq!(metrics.open_orders, 2);
    }
}
