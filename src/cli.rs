//! Command-line entry points
//!
//! Maintenance tasks over the trade store: schema migrations, a quick status
//! overview and the daily settlement helpers.

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use uuid::Uuid;

use crate::{
    configuration::{get_configuration, set_configuration, Config},
    error::Error,
    migration::{self, MigrationReport},
    provider::DatabasePool,
};

/// Trade store maintenance
#[derive(Parser)]
#[command(name = "trade-store")]
#[command(about = "Persistence layer for the trading bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run all migration groups (default if no command specified)
    Migrate,

    /// Show symbol sync state and pending profit periods
    Status,

    /// Zero the daily PnL counters of one user
    ResetDailyPnl {
        /// User id
        #[arg(long)]
        user: Uuid,
    },

    /// List users whose local day has rolled past their last settlement
    SettlementCheck,
}

/// Initialize configuration and return Config
pub fn init_config() -> Result<Config, Error> {
    set_configuration()?;
    get_configuration()
}

async fn connect() -> Result<(Config, DatabasePool), Error> {
    let config = init_config()?;
    let database = DatabasePool::new(&config).await?;
    Ok((config, database))
}

pub async fn run_migrate() -> Result<MigrationReport, Error> {
    let (config, database) = connect().await?;
    let report =
        migration::run_migrations(database.get_pool(), &config.migrations_dir)
            .await?;

    if let Some(failed) = report.failed().first() {
        return Err(Error::ConfigurationError(format!(
            "migration group {} not loaded: {}",
            failed.group,
            failed.error.as_deref().unwrap_or_default()
        )));
    }

    Ok(report)
}

pub async fn run_status() -> Result<(), Error> {
    let (_, database) = connect().await?;

    let (count, last_sync, pending) = tokio::try_join!(
        database.symbol_requirements.count(),
        database.symbol_requirements.get_last_sync_time(),
        database.profit_period.get_pending(),
    )?;

    info!("Symbol requirements: {}", count);
    match last_sync {
        Some(at) => info!("Last symbol sync: {}", at),
        None => info!("Symbols have never been synced"),
    }
    info!("Pending profit periods: {}", pending.len());

    Ok(())
}

pub async fn run_reset_daily_pnl(user: Uuid) -> Result<(), Error> {
    let (_, database) = connect().await?;

    let result = database.user_ginie_settings.reset_daily_pnl(user).await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("ginie settings for user {}", user)));
    }

    info!("Daily PnL reset for user {}", user);

    Ok(())
}

pub async fn run_settlement_check() -> Result<(), Error> {
    let (_, database) = connect().await?;

    let users = database
        .user
        .get_users_needing_settlement(Utc::now())
        .await?;

    for user in &users {
        info!(
            "User {} ({}) due for settlement, last settled {}",
            user.id,
            user.timezone,
            user.last_settlement_date
                .map(|date| date.to_string())
                .unwrap_or_else(|| String::from("never")),
        );
    }

    info!("{} users need settlement", users.len());

    Ok(())
}
