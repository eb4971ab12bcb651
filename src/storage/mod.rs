use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod models;
pub mod repository;

pub use backend::SeaOrmStorage;
pub use models::{
    ChoiceTally, Poll, PollFilter, PollPredicate, PollSort, PollSummary, SortKey, SortOrder,
};
pub use repository::PollRepository;

pub struct StorageFactory;

impl StorageFactory {
    /// 根据配置连接数据库并执行迁移
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        let storage = SeaOrmStorage::new(config).await?;
        Ok(Arc::new(storage))
    }
}
