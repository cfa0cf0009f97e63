//! Consolidated database models
//!
//! All database entity structs organized by domain sections. Nullable
//! columns are `Option<T>`, NUMERIC columns are `BigDecimal`.

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::helpers::{EventSource, EventType};

// =============================================================================
// AI DOMAIN
// =============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct AI_Decision {
    pub id: i32,
    pub symbol: String,
    pub current_price: BigDecimal,
    pub action: String,
    pub confidence: Option<BigDecimal>,
    pub reasoning: Option<String>,
    pub signals: Value,
    pub ml_direction: Option<String>,
    pub ml_confidence: Option<BigDecimal>,
    pub sentiment_direction: Option<String>,
    pub sentiment_confidence: Option<BigDecimal>,
    pub llm_direction: Option<String>,
    pub llm_confidence: Option<BigDecimal>,
    pub pattern_direction: Option<String>,
    pub pattern_confidence: Option<BigDecimal>,
    pub bigcandle_direction: Option<String>,
    pub bigcandle_confidence: Option<BigDecimal>,
    pub confluence_count: i32,
    pub risk_level: Option<String>,
    pub executed: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SPOT TRADES
// =============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Trade {
    pub id: i32,
    pub symbol: String,
    pub side: String,
    pub entry_price: BigDecimal,
    pub exit_price: Option<BigDecimal>,
    pub quantity: BigDecimal,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub stop_loss: Option<BigDecimal>,
    pub take_profit: Option<BigDecimal>,
    pub pnl: Option<BigDecimal>,
    pub pnl_percent: Option<BigDecimal>,
    pub strategy_name: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ai_decision_id: Option<i32>,
    pub trailing_stop_enabled: Option<bool>,
    pub trailing_stop_percent: Option<BigDecimal>,
    pub highest_price: Option<BigDecimal>,
    pub lowest_price: Option<BigDecimal>,
    pub take_profit_order_id: Option<i64>,
    pub stop_loss_order_id: Option<i64>,
}

// =============================================================================
// FUTURES DOMAIN
// =============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Futures_Trade {
    pub id: i32,
    pub user_id: Option<Uuid>,
    pub symbol: String,
    pub position_side: String,
    pub side: String,
    pub entry_price: BigDecimal,
    pub exit_price: Option<BigDecimal>,
    pub mark_price: Option<BigDecimal>,
    pub quantity: BigDecimal,
    pub leverage: i32,
    pub margin_type: String,
    pub isolated_margin: Option<BigDecimal>,
    pub realized_pnl: Option<BigDecimal>,
    pub unrealized_pnl: Option<BigDecimal>,
    pub realized_pnl_percent: Option<BigDecimal>,
    pub liquidation_price: Option<BigDecimal>,
    pub stop_loss: Option<BigDecimal>,
    pub take_profit: Option<BigDecimal>,
    pub trailing_stop: Option<BigDecimal>,
    pub status: String,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub trade_source: String,
    pub notes: Option<String>,
    pub ai_decision_id: Option<i32>,
    pub strategy_id: Option<i32>,
    pub strategy_name: Option<String>,
    pub trading_mode: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Futures_Order {
    pub id: i32,
    pub order_id: i64,
    pub symbol: String,
    pub position_side: String,
    pub side: String,
    pub order_type: String,
    pub price: Option<BigDecimal>,
    pub avg_price: Option<BigDecimal>,
    pub stop_price: Option<BigDecimal>,
    pub quantity: BigDecimal,
    pub executed_qty: BigDecimal,
    pub time_in_force: String,
    pub reduce_only: bool,
    pub close_position: bool,
    pub working_type: String,
    pub status: String,
    pub futures_trade_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub filled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Funding_Fee {
    pub id: i32,
    pub symbol: String,
    pub funding_rate: BigDecimal,
    pub funding_fee: BigDecimal,
    pub position_amt: BigDecimal,
    pub asset: String,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Futures_Transaction {
    pub id: i32,
    pub transaction_id: i64,
    pub symbol: Option<String>,
    pub income_type: String,
    pub income: BigDecimal,
    pub asset: String,
    pub info: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub futures_trade_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Futures_Account_Settings {
    pub id: i32,
    pub symbol: String,
    pub leverage: i32,
    pub margin_type: String,
    pub position_mode: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Futures_Account_Settings {
    /// Settings used for a symbol that has never been configured.
    pub fn default_for(symbol: &str) -> Self {
        let now = Utc::now();
        Futures_Account_Settings {
            id: 0,
            symbol: symbol.to_owned(),
            leverage: 10,
            margin_type: String::from("CROSSED"),
            position_mode: String::from("ONE_WAY"),
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// EXCHANGE METADATA
// =============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Symbol_Requirements {
    pub id: i32,
    pub symbol: String,
    pub price_precision: i32,
    pub quantity_precision: i32,

    // PRICE_FILTER
    pub tick_size: BigDecimal,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,

    // LOT_SIZE
    pub step_size: BigDecimal,
    pub min_qty: BigDecimal,
    pub max_qty: BigDecimal,

    // MIN_NOTIONAL
    pub min_notional: Option<BigDecimal>,

    // MARKET_LOT_SIZE
    pub market_min_qty: Option<BigDecimal>,
    pub market_max_qty: Option<BigDecimal>,
    pub market_step_size: Option<BigDecimal>,

    pub base_asset: Option<String>,
    pub quote_asset: Option<String>,
    pub margin_asset: Option<String>,
    pub contract_type: Option<String>,
    pub status: String,
    pub last_synced_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// TRADE LIFECYCLE
// =============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Trade_Lifecycle_Event {
    pub id: i64,
    pub futures_trade_id: Option<i32>,
    pub user_id: Option<Uuid>,
    pub event_type: String,
    pub event_subtype: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub trigger_price: Option<BigDecimal>,
    pub old_value: Option<BigDecimal>,
    pub new_value: Option<BigDecimal>,
    pub mode: Option<String>,
    pub source: String,
    pub tp_level: Option<i32>,
    pub quantity_closed: Option<BigDecimal>,
    pub pnl_realized: Option<BigDecimal>,
    pub pnl_percent: Option<BigDecimal>,
    pub sl_revision_count: Option<i32>,
    pub conditions_met: Option<Value>,
    pub reason: Option<String>,
    pub details: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl Trade_Lifecycle_Event {
    /// A bare event stamped with the current time. Optional columns are
    /// left empty for the caller to fill in.
    pub fn new(
        futures_trade_id: Option<i32>,
        event_type: EventType,
        source: EventSource,
    ) -> Self {
        let now = Utc::now();
        Trade_Lifecycle_Event {
            id: 0,
            futures_trade_id,
            user_id: None,
            event_type: event_type.into(),
            event_subtype: None,
            timestamp: now,
            trigger_price: None,
            old_value: None,
            new_value: None,
            mode: None,
            source: source.into(),
            tp_level: None,
            quantity_closed: None,
            pnl_realized: None,
            pnl_percent: None,
            sl_revision_count: None,
            conditions_met: None,
            reason: None,
            details: None,
            created_at: now,
        }
    }
}

// =============================================================================
// USER SETTINGS
// =============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct User_Ginie_Settings {
    pub id: Uuid,
    pub user_id: Uuid,

    pub dry_run_mode: bool,
    pub auto_start: bool,
    pub max_positions: i32,

    pub auto_mode_enabled: bool,
    pub auto_mode_max_positions: i32,
    pub auto_mode_max_leverage: i32,
    pub auto_mode_max_position_size: BigDecimal,
    pub auto_mode_max_total_usd: BigDecimal,
    pub auto_mode_allow_averaging: bool,
    pub auto_mode_max_averages: i32,
    pub auto_mode_min_hold_minutes: i32,
    pub auto_mode_quick_profit_mode: bool,
    pub auto_mode_min_profit_exit: BigDecimal,

    pub total_pnl: BigDecimal,
    pub daily_pnl: BigDecimal,
    pub total_trades: i32,
    pub winning_trades: i32,
    pub daily_trades: i32,
    pub pnl_last_update: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User_Ginie_Settings {
    /// Matches the column defaults of `user_ginie_settings`.
    pub fn default_for(user_id: Uuid) -> Self {
        let now = Utc::now();
        User_Ginie_Settings {
            id: Uuid::nil(),
            user_id,
            dry_run_mode: false,
            auto_start: false,
            max_positions: 10,
            auto_mode_enabled: false,
            auto_mode_max_positions: 5,
            auto_mode_max_leverage: 10,
            auto_mode_max_position_size: BigDecimal::from(1000),
            auto_mode_max_total_usd: BigDecimal::from(5000),
            auto_mode_allow_averaging: true,
            auto_mode_max_averages: 3,
            auto_mode_min_hold_minutes: 5,
            auto_mode_quick_profit_mode: false,
            auto_mode_min_profit_exit: BigDecimal::new(15.into(), 1),
            total_pnl: BigDecimal::from(0),
            daily_pnl: BigDecimal::from(0),
            total_trades: 0,
            winning_trades: 0,
            daily_trades: 0,
            pnl_last_update: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct User_Scan_Source_Settings {
    pub id: Uuid,
    pub user_id: Uuid,
    pub max_coins: i32,
    pub use_saved_coins: bool,
    pub saved_coins: Vec<String>,
    pub use_llm_list: bool,
    pub use_market_movers: bool,
    pub mover_gainers: bool,
    pub mover_losers: bool,
    pub mover_volume: bool,
    pub mover_volatility: bool,
    pub mover_new_listings: bool,
    pub gainers_limit: i32,
    pub losers_limit: i32,
    pub volume_limit: i32,
    pub volatility_limit: i32,
    pub new_listings_limit: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User_Scan_Source_Settings {
    pub const MIN_COINS: i32 = 5;
    pub const MAX_COINS: i32 = 100;

    pub fn default_for(user_id: Uuid) -> Self {
        let now = Utc::now();
        User_Scan_Source_Settings {
            id: Uuid::nil(),
            user_id,
            max_coins: 50,
            use_saved_coins: false,
            saved_coins: vec![],
            use_llm_list: true,
            use_market_movers: true,
            mover_gainers: true,
            mover_losers: true,
            mover_volume: true,
            mover_volatility: true,
            mover_new_listings: false,
            gainers_limit: 10,
            losers_limit: 10,
            volume_limit: 15,
            volatility_limit: 10,
            new_listings_limit: 5,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn clamped_max_coins(&self) -> i32 {
        self.max_coins.clamp(Self::MIN_COINS, Self::MAX_COINS)
    }
}

// =============================================================================
// USERS & BILLING
// =============================================================================

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub timezone: String,
    pub last_settlement_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Profit_Period {
    pub id: Uuid,
    pub user_id: Uuid,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub starting_balance: BigDecimal,
    pub ending_balance: Option<BigDecimal>,
    pub deposits: BigDecimal,
    pub withdrawals: BigDecimal,
    pub gross_profit: BigDecimal,
    pub loss_carryforward: BigDecimal,
    pub net_profit: BigDecimal,
    pub high_water_mark: BigDecimal,
    pub profit_share_rate: BigDecimal,
    pub profit_share_due: BigDecimal,
    pub settlement_status: String,
    pub settled_at: Option<DateTime<Utc>>,
    pub stripe_invoice_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Balance_Snapshot {
    pub id: Uuid,
    pub user_id: Uuid,
    pub snapshot_type: String,
    pub total_balance: BigDecimal,
    pub unrealized_pnl: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct User_Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub tx_type: String,
    pub amount: BigDecimal,
    pub currency: String,
    pub tx_hash: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}
