use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// 最大题目 / 选项长度（与迁移中的 VARCHAR(200) 一致）
pub const MAX_TEXT_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    pub id: i64,
    pub question: String,
    pub pub_date: DateTime<Utc>,
}

/// 单个选项及其票数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceTally {
    pub choice_id: i64,
    pub choice_text: String,
    pub vote_count: u64,
}

/// 列表查询的结果行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollSummary {
    pub id: i64,
    pub question: String,
    pub pub_date: DateTime<Utc>,
    pub total_votes: u64,
}

/// 单个过滤条件，每个条件对应一个 AND 子句
#[derive(Debug, Clone, PartialEq)]
pub enum PollPredicate {
    /// pub_date >= v
    PublishedFrom(DateTime<Utc>),
    /// pub_date <= v
    PublishedTo(DateTime<Utc>),
    /// 问题中包含子串（不区分大小写）
    QuestionContains(String),
}

/// 过滤条件列表（合取）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollFilter {
    predicates: Vec<PollPredicate>,
}

impl PollFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, predicate: PollPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn push(&mut self, predicate: PollPredicate) {
        self.predicates.push(predicate);
    }

    pub fn predicates(&self) -> &[PollPredicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// 按条件拆分为两个过滤器：满足 `keep` 的在前，其余在后
    pub fn partition(&self, keep: impl Fn(&PollPredicate) -> bool) -> (PollFilter, PollFilter) {
        let (kept, rest): (Vec<_>, Vec<_>) =
            self.predicates.iter().cloned().partition(|p| keep(p));
        (PollFilter { predicates: kept }, PollFilter { predicates: rest })
    }

    /// 在内存中判断单个投票是否满足全部条件
    pub fn matches(&self, poll: &Poll) -> bool {
        self.matches_fields(&poll.question, poll.pub_date)
    }

    pub fn matches_summary(&self, summary: &PollSummary) -> bool {
        self.matches_fields(&summary.question, summary.pub_date)
    }

    // 大小写折叠使用 Unicode 规则（Какой == КАКОЙ）
    fn matches_fields(&self, question: &str, pub_date: DateTime<Utc>) -> bool {
        self.predicates.iter().all(|p| match p {
            PollPredicate::PublishedFrom(from) => pub_date >= *from,
            PollPredicate::PublishedTo(to) => pub_date <= *to,
            PollPredicate::QuestionContains(needle) => question
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Popularity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// 排序方式；相同值按 id 升序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollSort {
    pub key: SortKey,
    pub order: SortOrder,
}

impl PollSort {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }
}
