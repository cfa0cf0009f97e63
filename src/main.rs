use clap::Parser as _;
use tracing::{error, Level};

use trade_store::{
    cli::{
        run_migrate, run_reset_daily_pnl, run_settlement_check, run_status,
        Cli, Commands,
    },
    error::Error,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level({
            #[cfg(debug_assertions)]
            {
                Level::DEBUG
            }

            #[cfg(not(debug_assertions))]
            {
                Level::INFO
            }
        })
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Migrate) {
        Commands::Migrate => run_migrate().await.map(drop),
        Commands::Status => run_status().await,
        Commands::ResetDailyPnl { user } => run_reset_daily_pnl(user).await,
        Commands::SettlementCheck => run_settlement_check().await,
    }
}
