//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, ExprTrait, FromQueryResult, JoinType, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    sea_query::{Expr, Func, LikeExpr},
};
use tracing::{debug, error};

use super::SeaOrmStorage;
use super::converters::{model_to_poll, row_to_summary, row_to_tally};
use crate::errors::{PollError, Result};
use crate::storage::models::{
    ChoiceTally, Poll, PollFilter, PollPredicate, PollSort, PollSummary, SortKey, SortOrder,
};
use crate::storage::repository::PollRepository;

use migration::entities::{choice, poll, vote};

// ============ 查询结果类型 ============

/// 选项票数查询结果行
#[derive(Debug, FromQueryResult)]
pub struct TallyRow {
    pub choice_id: i64,
    pub choice_text: String,
    pub vote_count: i64,
}

/// 投票列表查询结果行
#[derive(Debug, FromQueryResult)]
pub struct PollSummaryRow {
    pub id: i64,
    pub question: String,
    pub pub_date: chrono::DateTime<chrono::Utc>,
    pub total_votes: i64,
}

/// 转义 LIKE 中的通配符
pub(crate) fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 将过滤条件列表转换为一个 AND 条件
fn build_condition(filter: &PollFilter) -> Condition {
    filter
        .predicates()
        .iter()
        .fold(Condition::all(), |cond, predicate| match predicate {
            PollPredicate::PublishedFrom(from) => cond.add(poll::Column::PubDate.gte(*from)),
            PollPredicate::PublishedTo(to) => cond.add(poll::Column::PubDate.lte(*to)),
            PollPredicate::QuestionContains(needle) => {
                let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
                cond.add(
                    Expr::expr(Func::lower(Expr::col((poll::Entity, poll::Column::Question))))
                        .like(LikeExpr::new(pattern).escape('\\')),
                )
            }
        })
}

/// SQLite 内置的 LOWER / LIKE 只折叠 ASCII，非 ASCII 的搜索词改为取回后在内存中匹配
fn pushes_down(backend_name: &str, predicate: &PollPredicate) -> bool {
    match predicate {
        PollPredicate::QuestionContains(needle) => backend_name != "sqlite" || needle.is_ascii(),
        _ => true,
    }
}

fn to_order(order: SortOrder) -> Order {
    match order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}

impl SeaOrmStorage {
    /// 查询投票，不存在时返回 NotFound
    pub async fn get_poll(&self, poll_id: i64) -> Result<Poll> {
        self.find_by_id(poll_id)
            .await?
            .ok_or_else(|| PollError::poll_not_found(poll_id))
    }

    /// 投票总数（所有选项票数之和）
    pub async fn total_votes(&self, poll_id: i64) -> Result<u64> {
        let total = vote::Entity::find()
            .join(JoinType::InnerJoin, vote::Relation::Choice.def())
            .filter(choice::Column::PollId.eq(poll_id))
            .count(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to count votes of poll {}: {}", poll_id, e);
                PollError::database_operation(format!("Failed to count votes: {}", e))
            })?;
        Ok(total)
    }
}

#[async_trait]
impl PollRepository for SeaOrmStorage {
    async fn find_by_id(&self, poll_id: i64) -> Result<Option<Poll>> {
        let model = poll::Entity::find_by_id(poll_id)
            .one(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to load poll {}: {}", poll_id, e);
                PollError::database_operation(format!("Failed to load poll: {}", e))
            })?;

        Ok(model.map(model_to_poll))
    }

    async fn choice_tallies(&self, poll_id: i64) -> Result<Vec<ChoiceTally>> {
        let rows = choice::Entity::find()
            .select_only()
            .column_as(choice::Column::Id, "choice_id")
            .column(choice::Column::ChoiceText)
            .column_as(vote::Column::Id.count(), "vote_count")
            .join(JoinType::LeftJoin, choice::Relation::Votes.def())
            .filter(choice::Column::PollId.eq(poll_id))
            .group_by(choice::Column::Id)
            .group_by(choice::Column::ChoiceText)
            .order_by_asc(choice::Column::Id)
            .into_model::<TallyRow>()
            .all(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to load choices of poll {}: {}", poll_id, e);
                PollError::database_operation(format!("Failed to load choices: {}", e))
            })?;

        debug!("Loaded {} choice tallies for poll {}", rows.len(), poll_id);
        Ok(rows.into_iter().map(row_to_tally).collect())
    }

    async fn find_filtered(
        &self,
        filter: &PollFilter,
        sort: PollSort,
    ) -> Result<Vec<PollSummary>> {
        let (pushed, residual) = filter.partition(|p| pushes_down(&self.backend_name, p));

        let mut query = poll::Entity::find()
            .select_only()
            .column(poll::Column::Id)
            .column(poll::Column::Question)
            .column(poll::Column::PubDate)
            .column_as(vote::Column::Id.count(), "total_votes")
            .join(JoinType::LeftJoin, poll::Relation::Choices.def())
            .join(JoinType::LeftJoin, choice::Relation::Votes.def())
            .filter(build_condition(&pushed))
            .group_by(poll::Column::Id)
            .group_by(poll::Column::Question)
            .group_by(poll::Column::PubDate);

        query = match sort.key {
            SortKey::Date => query.order_by(poll::Column::PubDate, to_order(sort.order)),
            SortKey::Popularity => query.order_by(Expr::cust("total_votes"), to_order(sort.order)),
        };

        let rows = query
            .order_by_asc(poll::Column::Id)
            .into_model::<PollSummaryRow>()
            .all(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to list polls: {}", e);
                PollError::database_operation(format!("Failed to list polls: {}", e))
            })?;

        let summaries: Vec<PollSummary> = rows
            .into_iter()
            .map(row_to_summary)
            .filter(|summary| residual.matches_summary(summary))
            .collect();

        debug!(
            "Listed {} polls ({} predicates, {} matched in memory, sort {} {})",
            summaries.len(),
            filter.predicates().len(),
            residual.predicates().len(),
            sort.key,
            sort.order
        );
        Ok(summaries)
    }

    async fn count_votes(&self, choice_id: i64) -> Result<u64> {
        vote::Entity::find()
            .filter(vote::Column::ChoiceId.eq(choice_id))
            .count(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to count votes of choice {}: {}", choice_id, e);
                PollError::database_operation(format!("Failed to count votes: {}", e))
            })
    }

    async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| PollError::database_connection(format!("Database ping failed: {}", e)))
    }
}
