use std::marker::PhantomData;

use sqlx::Transaction;

use crate::dao::{DataBase, PoolType};

/// Repository handle for one aggregate. Each handle owns its own clone of
/// the connection pool.
#[derive(Debug, Clone)]
pub struct Table<T> {
    pub pool: PoolType,
    _phantomdata: PhantomData<T>,
}

impl<T> Table<T> {
    pub fn new(pool: PoolType) -> Self {
        Table {
            pool,
            _phantomdata: PhantomData,
        }
    }

    pub async fn begin(
        &self,
    ) -> Result<Transaction<'static, DataBase>, sqlx::Error> {
        self.pool.begin().await
    }
}
