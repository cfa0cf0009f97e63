use std::{fs, path::Path};

use tracing::warn;

use crate::error::Error;

use super::{Migration, Policy};

#[derive(Debug, Clone, Copy)]
pub enum Source {
    Inline(&'static [&'static str]),
    /// File names resolved against the configured migrations directory.
    Files(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct MigrationGroup {
    pub name: &'static str,
    pub policy: Policy,
    pub source: Source,
}

impl Source {
    /// Number of statements or files the source names.
    pub fn len(&self) -> usize {
        match self {
            Source::Inline(items) | Source::Files(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MigrationGroup {
    /// Materializes the group's migrations. For file groups a missing
    /// directory is fatal while an unreadable file is logged and skipped;
    /// the number of skipped files is returned alongside.
    pub fn load(
        &self,
        migrations_dir: &Path,
    ) -> Result<(Vec<Migration>, usize), Error> {
        match self.source {
            Source::Inline(statements) => {
                let migrations = statements
                    .iter()
                    .enumerate()
                    .map(|(i, statement)| Migration {
                        name: format!("{}#{}", self.name, i + 1),
                        statement: statement.to_string(),
                        policy: self.policy,
                    })
                    .collect();

                Ok((migrations, 0))
            },
            Source::Files(files) => {
                if !migrations_dir.is_dir() {
                    return Err(Error::MigrationsDirMissing(
                        migrations_dir.display().to_string(),
                    ));
                }

                let mut migrations = Vec::with_capacity(files.len());
                let mut unreadable = 0;

                for file in files {
                    let path = migrations_dir.join(file);
                    match fs::read_to_string(&path) {
                        Ok(statement) => migrations.push(Migration {
                            name: file.to_string(),
                            statement,
                            policy: self.policy,
                        }),
                        Err(e) => {
                            warn!(
                                "Skipping migration file {}: {}",
                                path.display(),
                                e
                            );
                            unreadable += 1;
                        },
                    }
                }

                Ok((migrations, unreadable))
            },
        }
    }
}

pub fn all_groups() -> [MigrationGroup; 9] {
    [
        MigrationGroup {
            name: "core",
            policy: Policy::Required,
            source: Source::Inline(CORE),
        },
        MigrationGroup {
            name: "ai",
            policy: Policy::Required,
            source: Source::Inline(AI),
        },
        MigrationGroup {
            name: "trade_ai_link",
            policy: Policy::BestEffort,
            source: Source::Inline(TRADE_AI_LINK),
        },
        MigrationGroup {
            name: "futures",
            policy: Policy::BestEffort,
            source: Source::Inline(FUTURES),
        },
        MigrationGroup {
            name: "symbol_requirements",
            policy: Policy::Required,
            source: Source::Inline(SYMBOL_REQUIREMENTS),
        },
        MigrationGroup {
            name: "trade_lifecycle",
            policy: Policy::BestEffort,
            source: Source::Inline(TRADE_LIFECYCLE),
        },
        MigrationGroup {
            name: "billing",
            policy: Policy::BestEffort,
            source: Source::Inline(BILLING),
        },
        MigrationGroup {
            name: "scan_source",
            policy: Policy::BestEffort,
            source: Source::Inline(SCAN_SOURCE),
        },
        MigrationGroup {
            name: "user_settings",
            policy: Policy::BestEffort,
            source: Source::Files(USER_SETTINGS_FILES),
        },
    ]
}

const USER_SETTINGS_FILES: &[&str] = &["017_user_ginie_settings.sql"];

const CORE: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS "users" (
        "id" UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        "email" VARCHAR(255) NOT NULL UNIQUE,
        "timezone" VARCHAR(64) NOT NULL DEFAULT 'UTC',
        "last_settlement_date" DATE,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "trades" (
        "id" SERIAL PRIMARY KEY,
        "symbol" VARCHAR(20) NOT NULL,
        "side" VARCHAR(4) NOT NULL,
        "entry_price" DECIMAL(20, 8) NOT NULL,
        "exit_price" DECIMAL(20, 8),
        "quantity" DECIMAL(20, 8) NOT NULL,
        "entry_time" TIMESTAMPTZ NOT NULL,
        "exit_time" TIMESTAMPTZ,
        "stop_loss" DECIMAL(20, 8),
        "take_profit" DECIMAL(20, 8),
        "pnl" DECIMAL(20, 8),
        "pnl_percent" DECIMAL(10, 4),
        "strategy_name" VARCHAR(100),
        "status" VARCHAR(20) NOT NULL DEFAULT 'OPEN',
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS "idx_trades_symbol" ON "trades" ("symbol")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_trades_status" ON "trades" ("status")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_trades_entry_time" ON "trades" ("entry_time")"#,
    r#"
    CREATE OR REPLACE FUNCTION update_updated_at_column()
    RETURNS TRIGGER AS $$
    BEGIN
        NEW.updated_at = CURRENT_TIMESTAMP;
        RETURN NEW;
    END;
    $$ LANGUAGE plpgsql
    "#,
    r#"DROP TRIGGER IF EXISTS "update_trades_updated_at" ON "trades""#,
    r#"
    CREATE TRIGGER "update_trades_updated_at" BEFORE UPDATE ON "trades"
    FOR EACH ROW EXECUTE FUNCTION update_updated_at_column()
    "#,
];

const AI: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS "ai_decisions" (
        "id" SERIAL PRIMARY KEY,
        "symbol" VARCHAR(20) NOT NULL,
        "current_price" DECIMAL(20, 8) NOT NULL,
        "action" VARCHAR(20) NOT NULL,
        "confidence" DECIMAL(5, 4),
        "reasoning" TEXT,
        "signals" JSONB NOT NULL,
        "ml_direction" VARCHAR(20),
        "ml_confidence" DECIMAL(5, 4),
        "sentiment_direction" VARCHAR(20),
        "sentiment_confidence" DECIMAL(5, 4),
        "llm_direction" VARCHAR(20),
        "llm_confidence" DECIMAL(5, 4),
        "pattern_direction" VARCHAR(20),
        "pattern_confidence" DECIMAL(5, 4),
        "bigcandle_direction" VARCHAR(20),
        "bigcandle_confidence" DECIMAL(5, 4),
        "confluence_count" INT NOT NULL DEFAULT 0,
        "risk_level" VARCHAR(20),
        "executed" BOOLEAN NOT NULL DEFAULT FALSE,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS "idx_ai_decisions_symbol" ON "ai_decisions" ("symbol")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_ai_decisions_action" ON "ai_decisions" ("action")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_ai_decisions_created_at" ON "ai_decisions" ("created_at" DESC)"#,
];

const TRADE_AI_LINK: &[&str] = &[
    r#"ALTER TABLE "trades" ADD COLUMN IF NOT EXISTS "ai_decision_id" INTEGER REFERENCES "ai_decisions" ("id")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_trades_ai_decision" ON "trades" ("ai_decision_id")"#,
    r#"ALTER TABLE "trades" ADD COLUMN IF NOT EXISTS "trailing_stop_enabled" BOOLEAN DEFAULT FALSE"#,
    r#"ALTER TABLE "trades" ADD COLUMN IF NOT EXISTS "trailing_stop_percent" DECIMAL(5, 2)"#,
    r#"ALTER TABLE "trades" ADD COLUMN IF NOT EXISTS "highest_price" DECIMAL(20, 8)"#,
    r#"ALTER TABLE "trades" ADD COLUMN IF NOT EXISTS "lowest_price" DECIMAL(20, 8)"#,
    r#"ALTER TABLE "trades" ADD COLUMN IF NOT EXISTS "take_profit_order_id" BIGINT"#,
    r#"ALTER TABLE "trades" ADD COLUMN IF NOT EXISTS "stop_loss_order_id" BIGINT"#,
];

const FUTURES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS "futures_trades" (
        "id" SERIAL PRIMARY KEY,
        "symbol" VARCHAR(20) NOT NULL,
        "position_side" VARCHAR(10) NOT NULL DEFAULT 'BOTH',
        "side" VARCHAR(10) NOT NULL,
        "entry_price" DECIMAL(20, 8) NOT NULL,
        "exit_price" DECIMAL(20, 8),
        "mark_price" DECIMAL(20, 8),
        "quantity" DECIMAL(20, 8) NOT NULL,
        "leverage" INTEGER NOT NULL DEFAULT 1,
        "margin_type" VARCHAR(10) NOT NULL DEFAULT 'CROSSED',
        "isolated_margin" DECIMAL(20, 8),
        "realized_pnl" DECIMAL(20, 8),
        "unrealized_pnl" DECIMAL(20, 8),
        "realized_pnl_percent" DECIMAL(10, 4),
        "liquidation_price" DECIMAL(20, 8),
        "stop_loss" DECIMAL(20, 8),
        "take_profit" DECIMAL(20, 8),
        "trailing_stop" DECIMAL(10, 4),
        "status" VARCHAR(20) NOT NULL DEFAULT 'OPEN',
        "entry_time" TIMESTAMPTZ NOT NULL,
        "exit_time" TIMESTAMPTZ,
        "trade_source" VARCHAR(20) NOT NULL DEFAULT 'manual',
        "notes" TEXT,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS "idx_futures_trades_symbol" ON "futures_trades" ("symbol")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_futures_trades_status" ON "futures_trades" ("status")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_futures_trades_entry_time" ON "futures_trades" ("entry_time" DESC)"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_futures_trades_position_side" ON "futures_trades" ("position_side")"#,
    r#"
    CREATE TABLE IF NOT EXISTS "futures_orders" (
        "id" SERIAL PRIMARY KEY,
        "order_id" BIGINT NOT NULL,
        "symbol" VARCHAR(20) NOT NULL,
        "position_side" VARCHAR(10) NOT NULL DEFAULT 'BOTH',
        "side" VARCHAR(10) NOT NULL,
        "order_type" VARCHAR(30) NOT NULL,
        "price" DECIMAL(20, 8),
        "avg_price" DECIMAL(20, 8),
        "stop_price" DECIMAL(20, 8),
        "quantity" DECIMAL(20, 8) NOT NULL,
        "executed_qty" DECIMAL(20, 8) NOT NULL DEFAULT 0,
        "time_in_force" VARCHAR(10) NOT NULL DEFAULT 'GTC',
        "reduce_only" BOOLEAN NOT NULL DEFAULT FALSE,
        "close_position" BOOLEAN NOT NULL DEFAULT FALSE,
        "working_type" VARCHAR(20) NOT NULL DEFAULT 'CONTRACT_PRICE',
        "status" VARCHAR(20) NOT NULL DEFAULT 'NEW',
        "futures_trade_id" INTEGER REFERENCES "futures_trades" ("id") ON DELETE SET NULL,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "filled_at" TIMESTAMPTZ
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS "idx_futures_orders_symbol" ON "futures_orders" ("symbol")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_futures_orders_status" ON "futures_orders" ("status")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_futures_orders_order_id" ON "futures_orders" ("order_id")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_futures_orders_created_at" ON "futures_orders" ("created_at" DESC)"#,
    r#"
    CREATE TABLE IF NOT EXISTS "funding_fees" (
        "id" SERIAL PRIMARY KEY,
        "symbol" VARCHAR(20) NOT NULL,
        "funding_rate" DECIMAL(20, 10) NOT NULL,
        "funding_fee" DECIMAL(20, 8) NOT NULL,
        "position_amt" DECIMAL(20, 8) NOT NULL,
        "asset" VARCHAR(10) NOT NULL DEFAULT 'USDT',
        "timestamp" TIMESTAMPTZ NOT NULL,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS "idx_funding_fees_symbol" ON "funding_fees" ("symbol")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_funding_fees_timestamp" ON "funding_fees" ("timestamp" DESC)"#,
    r#"
    CREATE TABLE IF NOT EXISTS "futures_transactions" (
        "id" SERIAL PRIMARY KEY,
        "transaction_id" BIGINT NOT NULL,
        "symbol" VARCHAR(20),
        "income_type" VARCHAR(30) NOT NULL,
        "income" DECIMAL(20, 8) NOT NULL,
        "asset" VARCHAR(10) NOT NULL DEFAULT 'USDT',
        "info" TEXT,
        "timestamp" TIMESTAMPTZ NOT NULL,
        "futures_trade_id" INTEGER REFERENCES "futures_trades" ("id") ON DELETE SET NULL,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS "idx_futures_transactions_symbol" ON "futures_transactions" ("symbol")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_futures_transactions_income_type" ON "futures_transactions" ("income_type")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_futures_transactions_timestamp" ON "futures_transactions" ("timestamp" DESC)"#,
    r#"CREATE UNIQUE INDEX IF NOT EXISTS "idx_futures_transactions_txid" ON "futures_transactions" ("transaction_id")"#,
    r#"
    CREATE TABLE IF NOT EXISTS "futures_account_settings" (
        "id" SERIAL PRIMARY KEY,
        "symbol" VARCHAR(20) NOT NULL UNIQUE,
        "leverage" INTEGER NOT NULL DEFAULT 10,
        "margin_type" VARCHAR(10) NOT NULL DEFAULT 'CROSSED',
        "position_mode" VARCHAR(10) NOT NULL DEFAULT 'ONE_WAY',
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"ALTER TABLE "futures_trades" ADD COLUMN IF NOT EXISTS "user_id" UUID REFERENCES "users" ("id")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_futures_trades_user_id" ON "futures_trades" ("user_id")"#,
    r#"ALTER TABLE "futures_trades" ADD COLUMN IF NOT EXISTS "ai_decision_id" INTEGER"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_futures_trades_ai_decision" ON "futures_trades" ("ai_decision_id")"#,
    r#"ALTER TABLE "futures_trades" ADD COLUMN IF NOT EXISTS "strategy_id" INTEGER"#,
    r#"ALTER TABLE "futures_trades" ADD COLUMN IF NOT EXISTS "strategy_name" VARCHAR(100)"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_futures_trades_strategy_id" ON "futures_trades" ("strategy_id")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_futures_trades_trade_source" ON "futures_trades" ("trade_source")"#,
    r#"ALTER TABLE "futures_trades" ADD COLUMN IF NOT EXISTS "trading_mode" VARCHAR(20)"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_futures_trades_mode" ON "futures_trades" ("trading_mode")"#,
    r#"DROP TRIGGER IF EXISTS "update_futures_trades_updated_at" ON "futures_trades""#,
    r#"
    CREATE TRIGGER "update_futures_trades_updated_at" BEFORE UPDATE ON "futures_trades"
    FOR EACH ROW EXECUTE FUNCTION update_updated_at_column()
    "#,
    r#"DROP TRIGGER IF EXISTS "update_futures_orders_updated_at" ON "futures_orders""#,
    r#"
    CREATE TRIGGER "update_futures_orders_updated_at" BEFORE UPDATE ON "futures_orders"
    FOR EACH ROW EXECUTE FUNCTION update_updated_at_column()
    "#,
];

const SYMBOL_REQUIREMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS "symbol_requirements" (
        "id" SERIAL PRIMARY KEY,
        "symbol" VARCHAR(20) NOT NULL UNIQUE,
        "price_precision" INT NOT NULL DEFAULT 4,
        "quantity_precision" INT NOT NULL DEFAULT 0,
        "tick_size" DECIMAL(20, 10) NOT NULL DEFAULT 0.0001,
        "min_price" DECIMAL(20, 8) DEFAULT 0,
        "max_price" DECIMAL(20, 8) DEFAULT 0,
        "step_size" DECIMAL(20, 10) NOT NULL DEFAULT 1,
        "min_qty" DECIMAL(20, 8) NOT NULL DEFAULT 1,
        "max_qty" DECIMAL(20, 8) NOT NULL DEFAULT 10000000,
        "min_notional" DECIMAL(20, 8) DEFAULT 5,
        "market_min_qty" DECIMAL(20, 8) DEFAULT 0,
        "market_max_qty" DECIMAL(20, 8) DEFAULT 0,
        "market_step_size" DECIMAL(20, 10) DEFAULT 0,
        "base_asset" VARCHAR(20),
        "quote_asset" VARCHAR(20),
        "margin_asset" VARCHAR(20),
        "contract_type" VARCHAR(20),
        "status" VARCHAR(20) NOT NULL DEFAULT 'TRADING',
        "last_synced_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS "idx_symbol_requirements_status" ON "symbol_requirements" ("status")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_symbol_requirements_last_synced" ON "symbol_requirements" ("last_synced_at")"#,
];

const TRADE_LIFECYCLE: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS "trade_lifecycle_events" (
        "id" BIGSERIAL PRIMARY KEY,
        "futures_trade_id" INTEGER REFERENCES "futures_trades" ("id") ON DELETE CASCADE,
        "event_type" VARCHAR(50) NOT NULL,
        "event_subtype" VARCHAR(50),
        "timestamp" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "trigger_price" DECIMAL(20, 8),
        "old_value" DECIMAL(20, 8),
        "new_value" DECIMAL(20, 8),
        "mode" VARCHAR(20),
        "source" VARCHAR(20) NOT NULL DEFAULT 'ginie',
        "tp_level" INT,
        "quantity_closed" DECIMAL(20, 8),
        "pnl_realized" DECIMAL(20, 8),
        "pnl_percent" DECIMAL(10, 4),
        "sl_revision_count" INT DEFAULT 0,
        "conditions_met" JSONB,
        "reason" TEXT,
        "details" JSONB,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS "idx_trade_lifecycle_futures_trade_id" ON "trade_lifecycle_events" ("futures_trade_id")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_trade_lifecycle_event_type" ON "trade_lifecycle_events" ("event_type")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_trade_lifecycle_timestamp" ON "trade_lifecycle_events" ("timestamp" DESC)"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_trade_lifecycle_created_at" ON "trade_lifecycle_events" ("created_at" DESC)"#,
    r#"ALTER TABLE "trade_lifecycle_events" ADD COLUMN IF NOT EXISTS "user_id" UUID REFERENCES "users" ("id")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_trade_lifecycle_user_id" ON "trade_lifecycle_events" ("user_id")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_trade_lifecycle_trade_timeline" ON "trade_lifecycle_events" ("futures_trade_id", "timestamp" ASC)"#,
];

const BILLING: &[&str] = &[
    r#"ALTER TABLE "users" ADD COLUMN IF NOT EXISTS "timezone" VARCHAR(64) NOT NULL DEFAULT 'UTC'"#,
    r#"ALTER TABLE "users" ADD COLUMN IF NOT EXISTS "last_settlement_date" DATE"#,
    r#"
    CREATE TABLE IF NOT EXISTS "user_profit_tracking" (
        "id" UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        "user_id" UUID NOT NULL REFERENCES "users" ("id") ON DELETE CASCADE,
        "period_start" TIMESTAMPTZ NOT NULL,
        "period_end" TIMESTAMPTZ NOT NULL,
        "starting_balance" DECIMAL(20, 8) NOT NULL,
        "ending_balance" DECIMAL(20, 8),
        "deposits" DECIMAL(20, 8) NOT NULL DEFAULT 0,
        "withdrawals" DECIMAL(20, 8) NOT NULL DEFAULT 0,
        "gross_profit" DECIMAL(20, 8) NOT NULL DEFAULT 0,
        "loss_carryforward" DECIMAL(20, 8) NOT NULL DEFAULT 0,
        "net_profit" DECIMAL(20, 8) NOT NULL DEFAULT 0,
        "high_water_mark" DECIMAL(20, 8) NOT NULL DEFAULT 0,
        "profit_share_rate" DECIMAL(5, 4) NOT NULL,
        "profit_share_due" DECIMAL(20, 8) NOT NULL DEFAULT 0,
        "settlement_status" VARCHAR(20) NOT NULL DEFAULT 'pending',
        "settled_at" TIMESTAMPTZ,
        "stripe_invoice_id" VARCHAR(100),
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT "valid_settlement_status" CHECK ("settlement_status" IN ('pending', 'invoiced', 'paid', 'failed', 'waived')),
        UNIQUE ("user_id", "period_start")
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS "idx_profit_tracking_user" ON "user_profit_tracking" ("user_id")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_profit_tracking_period" ON "user_profit_tracking" ("period_start", "period_end")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_profit_tracking_status" ON "user_profit_tracking" ("settlement_status")"#,
    r#"
    CREATE TABLE IF NOT EXISTS "user_balance_snapshots" (
        "id" UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        "user_id" UUID NOT NULL REFERENCES "users" ("id") ON DELETE CASCADE,
        "snapshot_type" VARCHAR(20) NOT NULL,
        "total_balance" DECIMAL(20, 8) NOT NULL,
        "unrealized_pnl" DECIMAL(20, 8) NOT NULL DEFAULT 0,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT "valid_snapshot_type" CHECK ("snapshot_type" IN ('hourly', 'daily', 'weekly', 'trade', 'deposit', 'withdrawal', 'manual'))
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS "idx_balance_snapshots_user" ON "user_balance_snapshots" ("user_id", "created_at" DESC)"#,
    r#"
    CREATE TABLE IF NOT EXISTS "user_transactions" (
        "id" UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        "user_id" UUID NOT NULL REFERENCES "users" ("id") ON DELETE CASCADE,
        "type" VARCHAR(20) NOT NULL,
        "amount" DECIMAL(20, 8) NOT NULL,
        "currency" VARCHAR(10) NOT NULL DEFAULT 'USDT',
        "tx_hash" VARCHAR(128),
        "status" VARCHAR(20) NOT NULL DEFAULT 'pending',
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "confirmed_at" TIMESTAMPTZ,
        CONSTRAINT "valid_transaction_type" CHECK ("type" IN ('deposit', 'withdrawal'))
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS "idx_user_transactions_user" ON "user_transactions" ("user_id", "created_at")"#,
];

const SCAN_SOURCE: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS "user_scan_source_settings" (
        "id" UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        "user_id" UUID NOT NULL UNIQUE REFERENCES "users" ("id") ON DELETE CASCADE,
        "max_coins" INT NOT NULL DEFAULT 50,
        "use_saved_coins" BOOLEAN NOT NULL DEFAULT FALSE,
        "saved_coins" TEXT[] NOT NULL DEFAULT '{}',
        "use_llm_list" BOOLEAN NOT NULL DEFAULT TRUE,
        "use_market_movers" BOOLEAN NOT NULL DEFAULT TRUE,
        "mover_gainers" BOOLEAN NOT NULL DEFAULT TRUE,
        "mover_losers" BOOLEAN NOT NULL DEFAULT TRUE,
        "mover_volume" BOOLEAN NOT NULL DEFAULT TRUE,
        "mover_volatility" BOOLEAN NOT NULL DEFAULT TRUE,
        "mover_new_listings" BOOLEAN NOT NULL DEFAULT FALSE,
        "gainers_limit" INT NOT NULL DEFAULT 10,
        "losers_limit" INT NOT NULL DEFAULT 10,
        "volume_limit" INT NOT NULL DEFAULT 15,
        "volatility_limit" INT NOT NULL DEFAULT 10,
        "new_listings_limit" INT NOT NULL DEFAULT 5,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"COMMENT ON TABLE "user_scan_source_settings" IS 'Per-user coin scan source configuration for Ginie autopilot'"#,
    r#"DROP TRIGGER IF EXISTS "update_user_scan_source_settings_updated_at" ON "user_scan_source_settings""#,
    r#"
    CREATE TRIGGER "update_user_scan_source_settings_updated_at" BEFORE UPDATE ON "user_scan_source_settings"
    FOR EACH ROW EXECUTE FUNCTION update_updated_at_column()
    "#,
];

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn groups_run_in_declared_order() {
        let names: Vec<&str> = all_groups().iter().map(|g| g.name).collect();
        assert_eq!(names, vec![
            "core",
            "ai",
            "trade_ai_link",
            "futures",
            "symbol_requirements",
            "trade_lifecycle",
            "billing",
            "scan_source",
            "user_settings",
        ]);
    }

    #[test]
    fn required_groups() {
        let required: Vec<&str> = all_groups()
            .iter()
            .filter(|g| g.policy == Policy::Required)
            .map(|g| g.name)
            .collect();
        assert_eq!(required, vec!["core", "ai", "symbol_requirements"]);
    }

    #[test]
    fn inline_group_inherits_policy() {
        let group = MigrationGroup {
            name: "test",
            policy: Policy::BestEffort,
            source: Source::Inline(&["SELECT 1", "SELECT 2"]),
        };

        let (migrations, unreadable) = group.load(Path::new("/nowhere")).unwrap();

        assert_eq!(unreadable, 0);
        assert_eq!(migrations.len(), 2);
        assert_eq!(migrations[1].name, "test#2");
        assert!(migrations.iter().all(|m| m.policy == Policy::BestEffort));
    }

    #[test]
    fn file_group_reads_from_configured_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = fs::File::create(dir.path().join("001_a.sql")).unwrap();
        file.write_all(b"CREATE TABLE a (id INT)").unwrap();

        let group = MigrationGroup {
            name: "files",
            policy: Policy::BestEffort,
            source: Source::Files(&["001_a.sql", "002_missing.sql"]),
        };

        let (migrations, unreadable) = group.load(dir.path()).unwrap();

        assert_eq!(migrations.len(), 1);
        assert_eq!(migrations[0].name, "001_a.sql");
        assert_eq!(migrations[0].statement, "CREATE TABLE a (id INT)");
        assert_eq!(unreadable, 1);
    }

    #[test]
    fn file_group_without_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");

        let group = MigrationGroup {
            name: "files",
            policy: Policy::BestEffort,
            source: Source::Files(&["001_a.sql"]),
        };

        assert!(matches!(
            group.load(&missing),
            Err(Error::MigrationsDirMissing(_))
        ));
    }

    #[test]
    fn shipped_migrations_directory_is_complete() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
        let group = all_groups()[8];

        let (migrations, unreadable) = group.load(&dir).unwrap();

        assert_eq!(unreadable, 0);
        assert_eq!(migrations.len(), 1);
        assert!(migrations[0].statement.contains("user_ginie_settings"));
    }
}
