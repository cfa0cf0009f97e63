use sqlx::Error;

use crate::model::{Futures_Transaction, Table};

impl Table<Futures_Transaction> {
    /// Income records are keyed by the exchange `transaction_id`. Returns
    /// `false` when the record was already stored.
    pub async fn insert(&self, data: &Futures_Transaction) -> Result<bool, Error> {
        const SQL: &str = r#"
        INSERT INTO "futures_transactions" (
            "transaction_id",
            "symbol",
            "income_type",
            "income",
            "asset",
            "info",
            "timestamp",
            "futures_trade_id"
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT ("transaction_id") DO NOTHING
        "#;

        let result = sqlx::query(SQL)
            .bind(data.transaction_id)
            .bind(&data.symbol)
            .bind(&data.income_type)
            .bind(&data.income)
            .bind(&data.asset)
            .bind(&data.info)
            .bind(data.timestamp)
            .bind(data.futures_trade_id)
            .persistent(true)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_history(
        &self,
        symbol: Option<&str>,
        income_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Futures_Transaction>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "futures_transactions"
        WHERE
            ($1::VARCHAR IS NULL OR "symbol" = $1) AND
            ($2::VARCHAR IS NULL OR "income_type" = $2)
        ORDER BY "timestamp" DESC
        LIMIT $3 OFFSET $4
        "#;

        sqlx::query_as(SQL)
            .bind(symbol)
            .bind(income_type)
            .bind(limit)
            .bind(offset)
            .persistent(true)
            .fetch_all(&self.pool)
            .await
    }
}
