use sqlx::Error;

use crate::model::{Futures_Order, Table};

impl Table<Futures_Order> {
    pub async fn insert(&self, data: &Futures_Order) -> Result<i32, Error> {
        const SQL: &str = r#"
        INSERT INTO "futures_orders" (
            "order_id",
            "symbol",
            "position_side",
            "side",
            "order_type",
            "price",
            "stop_price",
            "quantity",
            "time_in_force",
            "reduce_only",
            "close_position",
            "working_type",
            "status",
            "futures_trade_id"
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING "id"
        "#;

        let (id,): (i32,) = sqlx::query_as(SQL)
            .bind(data.order_id)
            .bind(&data.symbol)
            .bind(&data.position_side)
            .bind(&data.side)
            .bind(&data.order_type)
            .bind(&data.price)
            .bind(&data.stop_price)
            .bind(&data.quantity)
            .bind(&data.time_in_force)
            .bind(data.reduce_only)
            .bind(data.close_position)
            .bind(&data.working_type)
            .bind(&data.status)
            .bind(data.futures_trade_id)
            .persistent(true)
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    /// Applies a fill report from the exchange.
    pub async fn update(&self, data: &Futures_Order) -> Result<(), Error> {
        const SQL: &str = r#"
        UPDATE "futures_orders" SET
            "avg_price" = $2,
            "executed_qty" = $3,
            "status" = $4,
            "filled_at" = $5,
            "updated_at" = NOW()
        WHERE "id" = $1
        "#;

        sqlx::query(SQL)
            .bind(data.id)
            .bind(&data.avg_price)
            .bind(&data.executed_qty)
            .bind(&data.status)
            .bind(data.filled_at)
            .persistent(true)
            .execute(&self.pool)
            .await
            .map(drop)
    }

    /// Orders still resting on the book (`NEW`), newest first.
    pub async fn get_open(
        &self,
        symbol: Option<&str>,
    ) -> Result<Vec<Futures_Order>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "futures_orders"
        WHERE
            "status" = 'NEW' AND
            ($1::VARCHAR IS NULL OR "symbol" = $1)
        ORDER BY "created_at" DESC
        "#;

        sqlx::query_as(SQL)
            .bind(symbol)
            .persistent(true)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get_history(
        &self,
        symbol: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Futures_Order>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "futures_orders"
        WHERE $1::VARCHAR IS NULL OR "symbol" = $1
        ORDER BY "created_at" DESC
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
}
