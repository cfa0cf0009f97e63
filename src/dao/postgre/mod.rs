use sqlx::{
    postgres::{PgPoolOptions, PgQueryResult},
    PgPool, Postgres,
};

pub use self::{
    ai_decision::AIDecisionStats,
    futures_trade::{FuturesTradeTotals, FuturesTradingMetrics},
    trade::TradeWithDecision,
    trade_lifecycle_event::TradeLifecycleSummary,
};

mod ai_decision;
mod balance_snapshot;
mod funding_fee;
mod futures_account_settings;
mod futures_order;
mod futures_trade;
mod futures_transaction;
mod profit_period;
mod symbol_requirements;
mod trade;
mod trade_lifecycle_event;
mod user;
mod user_ginie_settings;
mod user_scan_source_settings;
mod user_transaction;

pub type PoolType = PgPool;
pub type PoolOption = PgPoolOptions;
pub type QueryResult = PgQueryResult;
pub type DataBase = Postgres;
