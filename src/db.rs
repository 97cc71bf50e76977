use crate::db::error::DbError;
use deadpool_postgres::Pool;
use tokio_postgres::Row;

mod migrations;
mod pool;

pub mod error;
pub mod repo;

pub use pool::DEFAULT_POOL_SIZE;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Clone, Debug)]
pub struct Db {
    pub(crate) pool: Pool,
}

impl Db {
    /// Checks out a pooled client. It goes back to the pool when dropped.
    pub async fn get_client(&self) -> DbResult<deadpool_postgres::Client> {
        Ok(self.pool.get().await?)
    }
}

pub(crate) fn map_row<T, E>(
    row: &Row,
    f: impl FnOnce(&Row) -> Result<T, E>,
    ctx: &str,
) -> Result<T, E>
where
    E: std::fmt::Display,
{
    match f(row) {
        Ok(v) => Ok(v),
        Err(e) => {
            tracing::error!("row deserialization failed in {ctx}: {e}");
            Err(e)
        }
    }
}

pub fn map_row_opt<T, F>(row_opt: Option<Row>, f: F, ctx: &str) -> DbResult<Option<T>>
where
    F: FnOnce(&Row) -> DbResult<T>,
{
    match row_opt {
        Some(row) => map_row(&row, f, ctx).map(Some),
        None => Ok(None),
    }
}
