use crate::{
    configuration::Config,
    dao::{PoolOption, PoolType},
    error::Error,
    model::{
        AI_Decision, Balance_Snapshot, Funding_Fee, Futures_Account_Settings,
        Futures_Order, Futures_Trade, Futures_Transaction, Profit_Period,
        Symbol_Requirements, Table, Trade, Trade_Lifecycle_Event, User,
        User_Ginie_Settings, User_Scan_Source_Settings, User_Transaction,
    },
};

#[derive(Debug, Clone)]
pub struct DatabasePool {
    pub ai_decision: Table<AI_Decision>,
    pub trade: Table<Trade>,
    pub futures_trade: Table<Futures_Trade>,
    pub futures_order: Table<Futures_Order>,
    pub funding_fee: Table<Funding_Fee>,
    pub futures_transaction: Table<Futures_Transaction>,
    pub futures_account_settings: Table<Futures_Account_Settings>,
    pub symbol_requirements: Table<Symbol_Requirements>,
    pub trade_lifecycle_event: Table<Trade_Lifecycle_Event>,
    pub user_ginie_settings: Table<User_Ginie_Settings>,
    pub user_scan_source_settings: Table<User_Scan_Source_Settings>,
    pub user: Table<User>,
    pub profit_period: Table<Profit_Period>,
    pub balance_snapshot: Table<Balance_Snapshot>,
    pub user_transaction: Table<User_Transaction>,
    pub pool: PoolType,
}

impl DatabasePool {
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        let pool = PoolOption::new()
            .max_connections(config.max_connections)
            .connect(config.database_url.as_str())
            .await?;

        Ok(DatabasePool::from_pool(pool))
    }

    /// Builds every repository over an existing pool.
    pub fn from_pool(pool: PoolType) -> DatabasePool {
        DatabasePool {
            ai_decision: Table::new(pool.clone()),
            trade: Table::new(pool.clone()),
            futures_trade: Table::new(pool.clone()),
            futures_order: Table::new(pool.clone()),
            funding_fee: Table::new(pool.clone()),
            futures_transaction: Table::new(pool.clone()),
            futures_account_settings: Table::new(pool.clone()),
            symbol_requirements: Table::new(pool.clone()),
            trade_lifecycle_event: Table::new(pool.clone()),
            user_ginie_settings: Table::new(pool.clone()),
            user_scan_source_settings: Table::new(pool.clone()),
            user: Table::new(pool.clone()),
            profit_period: Table::new(pool.clone()),
            balance_snapshot: Table::new(pool.clone()),
            user_transaction: Table::new(pool.clone()),
            pool,
        }
    }

    pub fn get_pool(&self) -> &PoolType {
        &self.pool
    }
}
