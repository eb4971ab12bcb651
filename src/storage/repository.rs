//! Read-side interface consumed by the services.

use async_trait::async_trait;

use crate::errors::Result;
use crate::storage::models::{ChoiceTally, Poll, PollFilter, PollSort, PollSummary};

#[async_trait]
pub trait PollRepository: Send + Sync {
    async fn find_by_id(&self, poll_id: i64) -> Result<Option<Poll>>;

    /// 按创建顺序返回投票的所有选项及票数
    async fn choice_tallies(&self, poll_id: i64) -> Result<Vec<ChoiceTally>>;

    async fn find_filtered(&self, filter: &PollFilter, sort: PollSort)
    -> Result<Vec<PollSummary>>;

    async fn count_votes(&self, choice_id: i64) -> Result<u64>;

    /// 存储可用性探测
    async fn ping(&self) -> Result<()>;
}
