mod postgre;

pub use postgre::{
    AIDecisionStats, DataBase, FuturesTradeTotals, FuturesTradingMetrics,
    PoolOption, PoolType, QueryResult, TradeLifecycleSummary,
    TradeWithDecision,
};
