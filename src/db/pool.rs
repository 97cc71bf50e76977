use super::{Db, DbResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use std::str::FromStr;
use tokio_postgres::NoTls;

pub const DEFAULT_POOL_SIZE: usize = 16;

impl Db {
    pub fn new(url: &str) -> DbResult<Self> {
        Self::with_pool_size(url, DEFAULT_POOL_SIZE)
    }

    pub fn with_pool_size(url: &str, max_size: usize) -> DbResult<Self> {
        let cfg = tokio_postgres::Config::from_str(url)?;

        let mgr = Manager::from_config(
            cfg,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let pool = Pool::builder(mgr).max_size(max_size).runtime(Runtime::Tokio1).build()?;

        Ok(Self { pool })
    }
}
