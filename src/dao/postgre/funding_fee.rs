use bigdecimal::BigDecimal;
use sqlx::Error;

use crate::model::{Funding_Fee, Table};

impl Table<Funding_Fee> {
    pub async fn insert(&self, data: &Funding_Fee) -> Result<i32, Error> {
        const SQL: &str = r#"
        INSERT INTO "funding_fees" (
            "symbol",
            "funding_rate",
            "funding_fee",
            "position_amt",
            "asset",
            "timestamp"
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING "id"
        "#;

        let (id,): (i32,) = sqlx::query_as(SQL)
            .bind(&data.symbol)
            .bind(&data.funding_rate)
            .bind(&data.funding_fee)
            .bind(&data.position_amt)
            .bind(&data.asset)
            .bind(data.timestamp)
            .persistent(true)
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    pub async fn get_history(
        &self,
        symbol: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Funding_Fee>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "funding_fees"
        WHERE $1::VARCHAR IS NULL OR "symbol" = $1
        ORDER BY "timestamp" DESC
        LIMIT $2 OFFSET $3
        "#;

        sqlx::query_as(SQL)
            .bind(symbol)
            .bind(limit)
            .bind(offset)
            .persistent(true)
            .fetch_all(&self.pool)
            .await
    }

    /// Sum of all funding paid or received, zero when nothing is recorded.
    pub async fn get_total(
        &self,
        symbol: Option<&str>,
    ) -> Result<BigDecimal, Error> {
        const SQL: &str = r#"
        SELECT COALESCE(SUM("funding_fee"), 0)
        FROM "funding_fees"
        WHERE $1::VARCHAR IS NULL OR "symbol" = $1
        "#;

        let (total,): (BigDecimal,) = sqlx::query_as(SQL)
            .bind(symbol)
            .persistent(true)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }
}
