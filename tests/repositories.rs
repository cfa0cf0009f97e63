//! Repository tests against a live Postgres. They only run when
//! `TEST_DATABASE_URL` points at a disposable database.

use std::{path::PathBuf, str::FromStr};

use bigdecimal::BigDecimal;
use chrono::{Duration, Utc};
use tokio::sync::OnceCell;
use uuid::Uuid;

use trade_store::{
    dao::{PoolOption, PoolType},
    error::Error,
    helpers::{
        local_date, EventSource, EventType, SettlementStatus, TradeStatus,
    },
    migration::run_migrations,
    model::{
        AI_Decision, Futures_Trade, Futures_Transaction, Profit_Period,
        Symbol_Requirements, Trade, Trade_Lifecycle_Event, User,
        User_Scan_Source_Settings, User_Transaction,
    },
    provider::DatabasePool,
};

static MIGRATED: OnceCell<()> = OnceCell::const_new();

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

async fn connect(url: &str) -> PoolType {
    PoolOption::new()
        .max_connections(10)
        .connect(url)
        .await
        .unwrap()
}

async fn setup() -> Option<DatabasePool> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return None;
    };

    MIGRATED
        .get_or_init(|| async {
            let pool = connect(&url).await;
            run_migrations(&pool, &migrations_dir()).await.unwrap();
        })
        .await;

    Some(DatabasePool::from_pool(connect(&url).await))
}

fn unique_symbol() -> String {
    format!("T{}", &Uuid::new_v4().simple().to_string()[..10]).to_uppercase()
}

async fn new_user(database: &DatabasePool, timezone: &str) -> User {
    database
        .user
        .insert(&format!("{}@test.local", Uuid::new_v4()), timezone)
        .await
        .unwrap()
}

fn requirements(symbol: &str, tick_size: &str) -> Symbol_Requirements {
    let now = Utc::now();
    Symbol_Requirements {
        id: 0,
        symbol: symbol.to_owned(),
        price_precision: 2,
        quantity_precision: 3,
        tick_size: BigDecimal::from_str(tick_size).unwrap(),
        min_price: None,
        max_price: None,
        step_size: BigDecimal::from_str("0.001").unwrap(),
        min_qty: BigDecimal::from_str("0.001").unwrap(),
        max_qty: BigDecimal::from(1000),
        min_notional: Some(BigDecimal::from(5)),
        market_min_qty: None,
        market_max_qty: None,
        market_step_size: None,
        base_asset: Some(String::from("BTC")),
        quote_asset: Some(String::from("USDT")),
        margin_asset: Some(String::from("USDT")),
        contract_type: Some(String::from("PERPETUAL")),
        status: String::from("TRADING"),
        last_synced_at: now,
        created_at: now,
        updated_at: now,
    }
}

fn decision(symbol: &str) -> AI_Decision {
    AI_Decision {
        id: 0,
        symbol: symbol.to_owned(),
        current_price: BigDecimal::from(100),
        action: String::from("BUY"),
        confidence: Some(BigDecimal::from_str("0.8").unwrap()),
        reasoning: Some(String::from("trend and volume agree")),
        signals: serde_json::json!({ "rsi": 31 }),
        ml_direction: Some(String::from("up")),
        ml_confidence: None,
        sentiment_direction: None,
        sentiment_confidence: None,
        llm_direction: None,
        llm_confidence: None,
        pattern_direction: None,
        pattern_confidence: None,
        bigcandle_direction: None,
        bigcandle_confidence: None,
        confluence_count: 2,
        risk_level: Some(String::from("low")),
        executed: false,
        created_at: Utc::now(),
    }
}

fn open_trade(symbol: &str) -> Trade {
    let now = Utc::now();
    Trade {
        id: 0,
        symbol: symbol.to_owned(),
        side: String::from("BUY"),
        entry_price: BigDecimal::from(100),
        exit_price: None,
        quantity: BigDecimal::from_str("0.5").unwrap(),
        entry_time: now,
        exit_time: None,
        stop_loss: None,
        take_profit: None,
        pnl: None,
        pnl_percent: None,
        strategy_name: None,
        status: TradeStatus::Open.to_string(),
        created_at: now,
        updated_at: now,
        ai_decision_id: None,
        trailing_stop_enabled: None,
        trailing_stop_percent: None,
        highest_price: None,
        lowest_price: None,
        take_profit_order_id: None,
        stop_loss_order_id: None,
    }
}

fn futures_trade(symbol: &str, status: TradeStatus) -> Futures_Trade {
    let now = Utc::now();
    Futures_Trade {
        id: 0,
        user_id: None,
        symbol: symbol.to_owned(),
        position_side: String::from("LONG"),
        side: String::from("BUY"),
        entry_price: BigDecimal::from(100),
        exit_price: None,
        mark_price: None,
        quantity: BigDecimal::from(1),
        leverage: 5,
        margin_type: String::from("CROSSED"),
        isolated_margin: None,
        realized_pnl: None,
        unrealized_pnl: None,
        realized_pnl_percent: None,
        liquidation_price: None,
        stop_loss: None,
        take_profit: None,
        trailing_stop: None,
        status: status.to_string(),
        entry_time: now,
        exit_time: None,
        trade_source: String::from("manual"),
        notes: None,
        ai_decision_id: None,
        strategy_id: None,
        strategy_name: None,
        trading_mode: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let Some(database) = setup().await else {
        return;
    };

    let report = run_migrations(database.get_pool(), &migrations_dir())
        .await
        .unwrap();

    assert_eq!(report.groups.len(), 9);
    assert_eq!(report.skipped(), 0);
    assert!(report.failed().is_empty());
}

#[tokio::test]
async fn upsert_keeps_one_row_per_symbol() {
    let Some(database) = setup().await else {
        return;
    };
    let symbol = unique_symbol();

    database
        .symbol_requirements
        .upsert_symbol(&requirements(&symbol, "0.1"))
        .await
        .unwrap();
    database
        .symbol_requirements
        .upsert_symbol(&requirements(&symbol, "0.01"))
        .await
        .unwrap();

    let stored = database
        .symbol_requirements
        .get_by_symbol(&symbol)
        .await
        .unwrap();

    assert_eq!(stored.tick_size, BigDecimal::from_str("0.01").unwrap());

    let (rows,): (i64,) = sqlx::query_as(
        r#"SELECT COUNT(*) FROM "symbol_requirements" WHERE "symbol" = $1"#,
    )
    .bind(&symbol)
    .fetch_one(database.get_pool())
    .await
    .unwrap();

    assert_eq!(rows, 1);
}

#[tokio::test]
async fn missing_symbol_is_not_found() {
    let Some(database) = setup().await else {
        return;
    };

    let result = database
        .symbol_requirements
        .get_by_symbol(&unique_symbol())
        .await;

    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn bulk_upsert_skips_rejected_rows() {
    let Some(database) = setup().await else {
        return;
    };

    let items = vec![
        requirements(&unique_symbol(), "0.1"),
        requirements(&"X".repeat(25), "0.1"),
        requirements(&unique_symbol(), "0.5"),
    ];

    let stored = database
        .symbol_requirements
        .bulk_upsert(&items)
        .await
        .unwrap();

    assert_eq!(stored, 2);
    assert!(database
        .symbol_requirements
        .get_by_symbol(&items[2].symbol)
        .await
        .is_ok());
}

#[tokio::test]
async fn bulk_upsert_of_nothing_is_zero() {
    let Some(database) = setup().await else {
        return;
    };

    assert_eq!(database.symbol_requirements.bulk_upsert(&[]).await.unwrap(), 0);
}

#[tokio::test]
async fn ginie_settings_absent_for_new_user() {
    let Some(database) = setup().await else {
        return;
    };
    let user = new_user(&database, "UTC").await;

    let settings = database.user_ginie_settings.get(user.id).await.unwrap();

    assert!(settings.is_none());
}

#[tokio::test]
async fn concurrent_pnl_updates_are_not_lost() {
    let Some(database) = setup().await else {
        return;
    };
    let user_id = new_user(&database, "UTC").await.id;
    let pnl = BigDecimal::from(2);

    let updates = (0..8).map(|i| {
        let table = database.user_ginie_settings.clone();
        let pnl = pnl.clone();
        async move { table.update_pnl_stats(user_id, &pnl, i % 2 == 0).await }
    });

    for result in futures::future::join_all(updates).await {
        result.unwrap();
    }

    let settings = database
        .user_ginie_settings
        .get(user_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(settings.total_trades, 8);
    assert_eq!(settings.daily_trades, 8);
    assert_eq!(settings.winning_trades, 4);
    assert_eq!(settings.total_pnl, BigDecimal::from(16));
    assert!(settings.pnl_last_update.is_some());
    assert_eq!(settings.max_positions, 10);

    database
        .user_ginie_settings
        .reset_daily_pnl(user_id)
        .await
        .unwrap();

    let settings = database
        .user_ginie_settings
        .get(user_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(settings.daily_trades, 0);
    assert_eq!(settings.daily_pnl, BigDecimal::from(0));
    assert_eq!(settings.total_trades, 8);
}

#[tokio::test]
async fn daily_reset_stamps_last_update() {
    let Some(database) = setup().await else {
        return;
    };
    let user_id = new_user(&database, "UTC").await.id;
    let table = &database.user_ginie_settings;

    table
        .update_pnl_stats(user_id, &BigDecimal::from(3), true)
        .await
        .unwrap();
    sqlx::query(
        r#"UPDATE "user_ginie_settings" SET "pnl_last_update" = NOW() - INTERVAL '2 days' WHERE "user_id" = $1"#,
    )
    .bind(user_id)
    .execute(database.get_pool())
    .await
    .unwrap();
    let before = Utc::now() - Duration::hours(1);

    table.reset_daily_pnl(user_id).await.unwrap();

    let settings = table.get(user_id).await.unwrap().unwrap();

    assert!(settings.pnl_last_update.unwrap() > before);
    assert_eq!(settings.daily_pnl, BigDecimal::from(0));
}

#[tokio::test]
async fn missing_account_settings_fall_back_to_defaults() {
    let Some(database) = setup().await else {
        return;
    };
    let symbol = unique_symbol();

    let settings = database
        .futures_account_settings
        .get(&symbol)
        .await
        .unwrap();

    assert_eq!(settings.symbol, symbol);
    assert_eq!(settings.leverage, 10);
    assert_eq!(settings.margin_type, "CROSSED");
    assert_eq!(settings.position_mode, "ONE_WAY");
}

#[tokio::test]
async fn missing_ids_are_not_found() {
    let Some(database) = setup().await else {
        return;
    };

    let decision = database.ai_decision.get_by_id(i32::MAX).await;
    let trade = database.futures_trade.get_by_id(i32::MAX).await;

    assert!(matches!(decision, Err(Error::NotFound(_))));
    assert!(matches!(trade, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn open_trades_carry_their_decision() {
    let Some(database) = setup().await else {
        return;
    };
    let symbol = unique_symbol();

    let stored = database.ai_decision.insert(&decision(&symbol)).await.unwrap();
    let linked = database.trade.insert(&open_trade(&symbol)).await.unwrap();
    let unlinked = database.trade.insert(&open_trade(&symbol)).await.unwrap();
    database
        .trade
        .link_ai_decision(linked, stored.id)
        .await
        .unwrap();

    let open = database.trade.get_open().await.unwrap();

    let linked = open.iter().find(|t| t.trade.id == linked).unwrap();
    let decision = linked.ai_decision.as_ref().unwrap();
    assert_eq!(decision.id, stored.id);
    assert_eq!(decision.action, "BUY");

    let unlinked = open.iter().find(|t| t.trade.id == unlinked).unwrap();
    assert!(unlinked.ai_decision.is_none());
}

#[tokio::test]
async fn lifecycle_summary_from_stored_events() {
    let Some(database) = setup().await else {
        return;
    };
    let trade_id = database
        .futures_trade
        .insert(&futures_trade(&unique_symbol(), TradeStatus::Open))
        .await
        .unwrap();
    let opened_at = Utc::now() - Duration::minutes(10);

    let timeline = [
        (EventType::PositionOpened, EventSource::Ginie, 0),
        (EventType::SLTPPlaced, EventSource::Ginie, 1),
        (EventType::SLRevised, EventSource::Ginie, 2),
        (EventType::TPHit, EventSource::Binance, 3),
        (EventType::SLRevised, EventSource::Ginie, 4),
        (EventType::PositionClosed, EventSource::Binance, 5),
    ];

    for (event_type, source, minute) in timeline {
        let mut event =
            Trade_Lifecycle_Event::new(Some(trade_id), event_type, source);
        event.timestamp = opened_at + Duration::minutes(minute);
        if event_type == EventType::PositionClosed {
            event.reason = Some(String::from("take profit"));
        }
        database.trade_lifecycle_event.insert(&event).await.unwrap();
    }

    let summary = database
        .trade_lifecycle_event
        .get_summary(trade_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(summary.total_events, 6);
    assert_eq!(summary.sl_revisions, 2);
    assert_eq!(summary.tp_levels_hit, 1);
    assert_eq!(summary.close_reason.as_deref(), Some("take profit"));
    assert_eq!(summary.close_source.as_deref(), Some("binance"));
    assert_eq!(summary.duration_seconds, Some(300));
    assert_eq!(summary.event_counts.get("sltp_placed"), Some(&1));
    assert_eq!(
        database
            .trade_lifecycle_event
            .count_sl_revisions(trade_id)
            .await
            .unwrap(),
        2
    );
}

#[tokio::test]
async fn scan_source_max_coins_is_clamped_on_save() {
    let Some(database) = setup().await else {
        return;
    };
    let user_id = new_user(&database, "UTC").await.id;

    let mut settings = User_Scan_Source_Settings::default_for(user_id);
    settings.max_coins = 1000;
    database
        .user_scan_source_settings
        .upsert(&settings)
        .await
        .unwrap();

    let stored = database
        .user_scan_source_settings
        .get(user_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stored.max_coins, User_Scan_Source_Settings::MAX_COINS);
}

#[tokio::test]
async fn user_transactions_respect_window() {
    let Some(database) = setup().await else {
        return;
    };
    let user_id = new_user(&database, "UTC").await.id;
    let now = Utc::now();

    let id = database
        .user_transaction
        .insert(&User_Transaction {
            id: Uuid::nil(),
            user_id,
            tx_type: String::from("deposit"),
            amount: BigDecimal::from(250),
            currency: String::from("USDT"),
            tx_hash: None,
            status: String::from("pending"),
            created_at: now,
            confirmed_at: None,
        })
        .await
        .unwrap();
    let table = &database.user_transaction;

    let around = table
        .get_by_user(user_id, now - Duration::hours(1), now + Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(around.len(), 1);
    assert_eq!(around[0].id, id);

    let created_at = around[0].created_at;
    let ending_at_creation = table
        .get_by_user(user_id, created_at - Duration::seconds(1), created_at)
        .await
        .unwrap();
    let starting_at_creation = table
        .get_by_user(user_id, created_at, created_at + Duration::seconds(1))
        .await
        .unwrap();
    let yesterday = table
        .get_by_user(user_id, now - Duration::days(2), now - Duration::days(1))
        .await
        .unwrap();

    assert!(ending_at_creation.is_empty());
    assert_eq!(starting_at_creation.len(), 1);
    assert!(yesterday.is_empty());
}

#[tokio::test]
async fn futures_metrics_reflect_closed_trades() {
    let Some(database) = setup().await else {
        return;
    };
    let table = &database.futures_trade;

    let mut closed = futures_trade(&unique_symbol(), TradeStatus::Closed);
    closed.exit_price = Some(BigDecimal::from(110));
    closed.exit_time = Some(Utc::now());
    closed.realized_pnl = Some(BigDecimal::from(10));
    table.insert(&closed).await.unwrap();
    table
        .insert(&futures_trade(&unique_symbol(), TradeStatus::Open))
        .await
        .unwrap();

    let metrics = table.get_metrics().await.unwrap();

    assert!(metrics.total_trades >= 1);
    assert!(metrics.winning_trades >= 1);
    assert!(metrics.open_positions >= 1);
    assert!(metrics.win_rate > 0.0);
    assert!(metrics.largest_win >= BigDecimal::from(10));
    assert!(metrics.last_trade_time.is_some());
}

#[tokio::test]
async fn duplicate_income_record_is_ignored() {
    let Some(database) = setup().await else {
        return;
    };

    let record = Futures_Transaction {
        id: 0,
        transaction_id: (Uuid::new_v4().as_u128() >> 65) as i64,
        symbol: Some(String::from("BTCUSDT")),
        income_type: String::from("REALIZED_PNL"),
        income: BigDecimal::from_str("12.5").unwrap(),
        asset: String::from("USDT"),
        info: None,
        timestamp: Utc::now(),
        futures_trade_id: None,
        created_at: Utc::now(),
    };

    assert!(database.futures_transaction.insert(&record).await.unwrap());
    assert!(!database.futures_transaction.insert(&record).await.unwrap());
}

#[tokio::test]
async fn profit_period_closes_once() {
    let Some(database) = setup().await else {
        return;
    };
    let user = new_user(&database, "UTC").await;
    let now = Utc::now();

    let period = Profit_Period {
        id: Uuid::nil(),
        user_id: user.id,
        period_start: now - chrono::Duration::days(1),
        period_end: now,
        starting_balance: BigDecimal::from(1000),
        ending_balance: Some(BigDecimal::from(1100)),
        deposits: BigDecimal::from(0),
        withdrawals: BigDecimal::from(0),
        gross_profit: BigDecimal::from(100),
        loss_carryforward: BigDecimal::from(0),
        net_profit: BigDecimal::from(100),
        high_water_mark: BigDecimal::from(1100),
        profit_share_rate: BigDecimal::from_str("0.2").unwrap(),
        profit_share_due: BigDecimal::from(20),
        settlement_status: SettlementStatus::Pending.to_string(),
        settled_at: None,
        stripe_invoice_id: None,
        created_at: now,
    };

    let id = database.profit_period.insert(&period).await.unwrap();
    let table = &database.profit_period;

    assert!(table
        .update_status(id, SettlementStatus::Invoiced, Some("in_123"))
        .await
        .unwrap());
    assert!(table.update_status(id, SettlementStatus::Paid, None).await.unwrap());
    assert!(!table
        .update_status(id, SettlementStatus::Failed, None)
        .await
        .unwrap());

    let stored = table.get_by_user(user.id, 10).await.unwrap();

    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].settlement_status, "paid");
    assert_eq!(stored[0].stripe_invoice_id.as_deref(), Some("in_123"));
    assert!(stored[0].settled_at.is_some());
}

#[tokio::test]
async fn settled_user_is_not_due_again_today() {
    let Some(database) = setup().await else {
        return;
    };
    let user = new_user(&database, "Asia/Kolkata").await;
    let now = Utc::now();

    let due = database
        .user
        .get_users_needing_settlement(now)
        .await
        .unwrap();
    assert!(due.iter().any(|u| u.id == user.id));

    database
        .user
        .update_last_settlement_date(user.id, local_date("Asia/Kolkata", now))
        .await
        .unwrap();

    let due = database
        .user
        .get_users_needing_settlement(now)
        .await
        .unwrap();
    assert!(!due.iter().any(|u| u.id == user.id));
}
