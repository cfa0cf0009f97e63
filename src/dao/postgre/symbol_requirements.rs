use chrono::{DateTime, Utc};
use sqlx::{Connection, Error, Transaction};
use tracing::{debug, error, info};

use crate::model::{Symbol_Requirements, Table};

use super::{DataBase, QueryResult};

const UPSERT_SQL: &str = r#"
    INSERT INTO "symbol_requirements" (
        "symbol",
        "price_precision",
        "quantity_precision",
        "tick_size",
        "min_price",
        "max_price",
        "step_size",
        "min_qty",
        "max_qty",
        "min_notional",
        "market_min_qty",
        "market_max_qty",
        "market_step_size",
        "base_asset",
        "quote_asset",
        "margin_asset",
        "contract_type",
        "status",
        "last_synced_at",
        "updated_at"
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $19)
    ON CONFLICT ("symbol") DO UPDATE SET
        "price_precision" = EXCLUDED."price_precision",
        "quantity_precision" = EXCLUDED."quantity_precision",
        "tick_size" = EXCLUDED."tick_size",
        "min_price" = EXCLUDED."min_price",
        "max_price" = EXCLUDED."max_price",
        "step_size" = EXCLUDED."step_size",
        "min_qty" = EXCLUDED."min_qty",
        "max_qty" = EXCLUDED."max_qty",
        "min_notional" = EXCLUDED."min_notional",
        "market_min_qty" = EXCLUDED."market_min_qty",
        "market_max_qty" = EXCLUDED."market_max_qty",
        "market_step_size" = EXCLUDED."market_step_size",
        "base_asset" = EXCLUDED."base_asset",
        "quote_asset" = EXCLUDED."quote_asset",
        "margin_asset" = EXCLUDED."margin_asset",
        "contract_type" = EXCLUDED."contract_type",
        "status" = EXCLUDED."status",
        "last_synced_at" = EXCLUDED."last_synced_at",
        "updated_at" = EXCLUDED."updated_at"
"#;

fn upsert_query<'a>(
    data: &'a Symbol_Requirements,
    now: DateTime<Utc>,
) -> sqlx::query::Query<'a, DataBase, sqlx::postgres::PgArguments> {
    sqlx::query(UPSERT_SQL)
        .bind(&data.symbol)
        .bind(data.price_precision)
        .bind(data.quantity_precision)
        .bind(&data.tick_size)
        .bind(&data.min_price)
        .bind(&data.max_price)
        .bind(&data.step_size)
        .bind(&data.min_qty)
        .bind(&data.max_qty)
        .bind(&data.min_notional)
        .bind(&data.market_min_qty)
        .bind(&data.market_max_qty)
        .bind(&data.market_step_size)
        .bind(&data.base_asset)
        .bind(&data.quote_asset)
        .bind(&data.margin_asset)
        .bind(&data.contract_type)
        .bind(&data.status)
        .bind(now)
        .persistent(true)
}

impl Table<Symbol_Requirements> {
    /// Inserts or fully refreshes the row for `data.symbol`.
    /// `last_synced_at` and `updated_at` share the same timestamp.
    pub async fn upsert_symbol(
        &self,
        data: &Symbol_Requirements,
    ) -> Result<QueryResult, Error> {
        upsert_query(data, Utc::now()).execute(&self.pool).await
    }

    /// Upserts every row inside one transaction. Each row runs under its
    /// own savepoint so a rejected row is rolled back and skipped without
    /// aborting the rest. Returns the number of rows persisted.
    pub async fn bulk_upsert(
        &self,
        data: &[Symbol_Requirements],
    ) -> Result<usize, Error> {
        if data.is_empty() {
            return Ok(0);
        }

        let mut transaction = self.begin().await?;
        let now = Utc::now();
        let mut success = 0;

        for item in data {
            match Self::upsert_row(item, now, &mut transaction).await {
                Ok(()) => success += 1,
                Err(e) => {
                    error!(
                        "Failed to upsert symbol requirements for {}: {}",
                        item.symbol, e
                    );
                },
            }
        }

        transaction.commit().await?;

        info!(
            "Bulk upserted {}/{} symbol requirements",
            success,
            data.len()
        );

        Ok(success)
    }

    async fn upsert_row(
        data: &Symbol_Requirements,
        now: DateTime<Utc>,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<(), Error> {
        let mut savepoint = Connection::begin(&mut **transaction).await?;

        match upsert_query(data, now).execute(&mut *savepoint).await {
            Ok(_) => savepoint.commit().await,
            Err(e) => {
                if let Err(rollback) = savepoint.rollback().await {
                    debug!("Savepoint rollback failed: {}", rollback);
                }
                Err(e)
            },
        }
    }

    pub async fn get_by_symbol(
        &self,
        symbol: &str,
    ) -> Result<Symbol_Requirements, crate::error::Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "symbol_requirements"
        WHERE "symbol" = $1
        "#;

        sqlx::query_as(SQL)
            .bind(symbol)
            .persistent(true)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                crate::error::Error::not_found_or(
                    e,
                    format!("symbol requirements for {}", symbol),
                )
            })
    }

    pub async fn get_all_active(
        &self,
    ) -> Result<Vec<Symbol_Requirements>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "symbol_requirements"
        WHERE "status" = 'TRADING'
        ORDER BY "symbol"
        "#;

        sqlx::query_as(SQL).persistent(true).fetch_all(&self.pool).await
    }

    pub async fn count(&self) -> Result<i64, Error> {
        const SQL: &str = r#"
        SELECT COUNT(*)
        FROM "symbol_requirements"
        "#;

        let (count,): (i64,) = sqlx::query_as(SQL)
            .persistent(true)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// `None` while the table is empty.
    pub async fn get_last_sync_time(
        &self,
    ) -> Result<Option<DateTime<Utc>>, Error> {
        const SQL: &str = r#"
        SELECT MAX("last_synced_at")
        FROM "symbol_requirements"
        "#;

        let (last,): (Option<DateTime<Utc>>,) = sqlx::query_as(SQL)
            .persistent(true)
            .fetch_one(&self.pool)
            .await?;

        Ok(last)
    }
}
