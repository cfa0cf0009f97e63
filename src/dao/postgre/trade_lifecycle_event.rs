use std::{collections::BTreeMap, str::FromStr as _};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::Error;

use crate::{
    helpers::EventType,
    model::{Table, Trade_Lifecycle_Event},
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TradeLifecycleSummary {
    pub futures_trade_id: i32,
    pub total_events: usize,
    pub sl_revisions: usize,
    pub tp_levels_hit: usize,
    pub trailing_updates: usize,
    pub moved_to_breakeven: bool,
    pub trailing_activated: bool,
    pub close_reason: Option<String>,
    pub close_source: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i64>,
    pub event_counts: BTreeMap<String, usize>,
}

impl TradeLifecycleSummary {
    /// Folds a timestamp-ordered event list into a summary. `None` for an
    /// empty list. The position start falls back to the first event when no
    /// `position_opened` was recorded.
    pub fn from_events(
        futures_trade_id: i32,
        events: &[Trade_Lifecycle_Event],
    ) -> Option<Self> {
        let first = events.first()?;

        let mut summary = TradeLifecycleSummary {
            futures_trade_id,
            total_events: events.len(),
            sl_revisions: 0,
            tp_levels_hit: 0,
            trailing_updates: 0,
            moved_to_breakeven: false,
            trailing_activated: false,
            close_reason: None,
            close_source: None,
            start_time: None,
            end_time: None,
            duration_seconds: None,
            event_counts: BTreeMap::new(),
        };

        for event in events {
            *summary
                .event_counts
                .entry(event.event_type.clone())
                .or_insert(0) += 1;

            let Ok(event_type) = EventType::from_str(&event.event_type) else {
                continue;
            };

            match event_type {
                EventType::PositionOpened => {
                    summary.start_time = Some(event.timestamp)
                },
                EventType::SLRevised => summary.sl_revisions += 1,
                EventType::TPHit => summary.tp_levels_hit += 1,
                EventType::MovedToBreakeven => summary.moved_to_breakeven = true,
                EventType::TrailingActivated => summary.trailing_activated = true,
                EventType::TrailingUpdated => summary.trailing_updates += 1,
                EventType::PositionClosed | EventType::ExternalClose => {
                    summary.end_time = Some(event.timestamp);
                    summary.close_reason = event.reason.clone();
                    summary.close_source = Some(event.source.clone());
                },
                EventType::SLTPPlaced
                | EventType::TPRevised
                | EventType::OrderCancelled
                | EventType::SLHit => {},
            }
        }

        let start = summary.start_time.unwrap_or(first.timestamp);
        summary.start_time = Some(start);

        if let Some(end) = summary.end_time {
            summary.duration_seconds = Some((end - start).num_seconds());
        }

        Some(summary)
    }
}

impl Table<Trade_Lifecycle_Event> {
    /// Appends an event and returns its id.
    pub async fn insert(&self, data: &Trade_Lifecycle_Event) -> Result<i64, Error> {
        const SQL: &str = r#"
        INSERT INTO "trade_lifecycle_events" (
            "futures_trade_id",
            "user_id",
            "event_type",
            "event_subtype",
            "timestamp",
            "trigger_price",
            "old_value",
            "new_value",
            "mode",
            "source",
            "tp_level",
            "quantity_closed",
            "pnl_realized",
            "pnl_percent",
            "sl_revision_count",
            "conditions_met",
            "reason",
            "details"
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
        RETURNING "id"
        "#;

        let (id,): (i64,) = sqlx::query_as(SQL)
            .bind(data.futures_trade_id)
            .bind(data.user_id)
            .bind(&data.event_type)
            .bind(&data.event_subtype)
            .bind(data.timestamp)
            .bind(&data.trigger_price)
            .bind(&data.old_value)
            .bind(&data.new_value)
            .bind(&data.mode)
            .bind(&data.source)
            .bind(data.tp_level)
            .bind(&data.quantity_closed)
            .bind(&data.pnl_realized)
            .bind(&data.pnl_percent)
            .bind(data.sl_revision_count)
            .bind(&data.conditions_met)
            .bind(&data.reason)
            .bind(&data.details)
            .persistent(true)
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    /// The full timeline of one position, oldest first.
    pub async fn get_by_trade(
        &self,
        futures_trade_id: i32,
    ) -> Result<Vec<Trade_Lifecycle_Event>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "trade_lifecycle_events"
        WHERE "futures_trade_id" = $1
        ORDER BY "timestamp" ASC, "id" ASC
        "#;

        sqlx::query_as(SQL)
            .bind(futures_trade_id)
            .persistent(true)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get_by_trade_and_type(
        &self,
        futures_trade_id: i32,
        event_type: EventType,
    ) -> Result<Vec<Trade_Lifecycle_Event>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "trade_lifecycle_events"
        WHERE
            "futures_trade_id" = $1 AND
            "event_type" = $2
        ORDER BY "timestamp" ASC, "id" ASC
        "#;

        sqlx::query_as(SQL)
            .bind(futures_trade_id)
            .bind(event_type.as_str())
            .persistent(true)
            .fetch_all(&self.pool)
            .await
    }

    /// Latest events across all positions.
    pub async fn get_recent(
        &self,
        limit: i64,
    ) -> Result<Vec<Trade_Lifecycle_Event>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "trade_lifecycle_events"
        ORDER BY "timestamp" DESC
        LIMIT $1
        "#;

        sqlx::query_as(SQL)
            .bind(limit)
            .persistent(true)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn count_sl_revisions(
        &self,
        futures_trade_id: i32,
    ) -> Result<i64, Error> {
        const SQL: &str = r#"
        SELECT COUNT(*)
        FROM "trade_lifecycle_events"
        WHERE
            "futures_trade_id" = $1 AND
            "event_type" = $2
        "#;

        let (count,): (i64,) = sqlx::query_as(SQL)
            .bind(futures_trade_id)
            .bind(EventType::SLRevised.as_str())
            .persistent(true)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn get_summary(
        &self,
        futures_trade_id: i32,
    ) -> Result<Option<TradeLifecycleSummary>, Error> {
        let events = self.get_by_trade(futures_trade_id).await?;
        Ok(TradeLifecycleSummary::from_events(futures_trade_id, &events))
    }
}
