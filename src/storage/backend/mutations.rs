//! Mutation operations for SeaOrmStorage
//!
//! Used by the sample-data tooling and tests; the HTTP surface is read-only.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use tracing::{debug, error, info};

use super::SeaOrmStorage;
use super::converters::model_to_poll;
use crate::errors::{PollError, Result};
use crate::storage::models::{MAX_TEXT_LEN, Poll};
use crate::storage::repository::PollRepository;

use migration::entities::{choice, poll, vote};

/// 校验题目 / 选项文本：非空且不超过 200 字符
fn validate_text(field: &str, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(PollError::validation(format!("{} must not be empty", field)));
    }
    let len = text.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(PollError::validation(format!(
            "{} is too long ({} > {} characters)",
            field, len, MAX_TEXT_LEN
        )));
    }
    Ok(())
}

impl SeaOrmStorage {
    /// 创建投票，pub_date 缺省为当前时间
    pub async fn create_poll(&self, question: &str, pub_date: Option<DateTime<Utc>>) -> Result<Poll> {
        validate_text("Question", question)?;

        let model = poll::ActiveModel {
            question: Set(question.to_string()),
            pub_date: Set(pub_date.unwrap_or_else(Utc::now)),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            error!("Failed to create poll: {}", e);
            PollError::database_operation(format!("Failed to create poll: {}", e))
        })?;

        debug!("Poll created: id={}", model.id);
        Ok(model_to_poll(model))
    }

    /// 为投票添加选项，返回选项 id
    pub async fn add_choice(&self, poll_id: i64, choice_text: &str) -> Result<i64> {
        validate_text("Choice text", choice_text)?;

        if self.find_by_id(poll_id).await?.is_none() {
            return Err(PollError::poll_not_found(poll_id));
        }

        let model = choice::ActiveModel {
            poll_id: Set(poll_id),
            choice_text: Set(choice_text.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            error!("Failed to add choice to poll {}: {}", poll_id, e);
            PollError::database_operation(format!("Failed to add choice: {}", e))
        })?;

        Ok(model.id)
    }

    /// 投一票，voted_at 缺省为当前时间
    pub async fn cast_vote(&self, choice_id: i64, voted_at: Option<DateTime<Utc>>) -> Result<i64> {
        self.ensure_choice_exists(choice_id).await?;

        let model = vote::ActiveModel {
            choice_id: Set(choice_id),
            voted_at: Set(voted_at.unwrap_or_else(Utc::now)),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            error!("Failed to cast vote for choice {}: {}", choice_id, e);
            PollError::database_operation(format!("Failed to cast vote: {}", e))
        })?;

        Ok(model.id)
    }

    /// 批量投票（样例数据用），返回写入条数
    pub async fn cast_votes(&self, choice_id: i64, timestamps: &[DateTime<Utc>]) -> Result<u64> {
        if timestamps.is_empty() {
            return Ok(0);
        }
        self.ensure_choice_exists(choice_id).await?;

        let models = timestamps.iter().map(|ts| vote::ActiveModel {
            choice_id: Set(choice_id),
            voted_at: Set(*ts),
            ..Default::default()
        });

        vote::Entity::insert_many(models)
            .exec(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to insert votes for choice {}: {}", choice_id, e);
                PollError::database_operation(format!("Failed to insert votes: {}", e))
            })?;

        Ok(timestamps.len() as u64)
    }

    /// 删除投票（级联删除选项和票）
    pub async fn delete_poll(&self, poll_id: i64) -> Result<()> {
        let result = poll::Entity::delete_by_id(poll_id)
            .exec(&self.db)
            .await
            .map_err(|e| PollError::database_operation(format!("Failed to delete poll: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(PollError::poll_not_found(poll_id));
        }

        info!("Poll deleted: {}", poll_id);
        Ok(())
    }

    /// 删除全部投票，返回删除条数
    pub async fn delete_all_polls(&self) -> Result<u64> {
        let result = poll::Entity::delete_many()
            .exec(&self.db)
            .await
            .map_err(|e| PollError::database_operation(format!("Failed to clear polls: {}", e)))?;

        info!("Deleted {} polls", result.rows_affected);
        Ok(result.rows_affected)
    }

    async fn ensure_choice_exists(&self, choice_id: i64) -> Result<()> {
        let found = choice::Entity::find_by_id(choice_id)
            .one(&self.db)
            .await
            .map_err(|e| PollError::database_operation(format!("Failed to load choice: {}", e)))?;

        match found {
            Some(_) => Ok(()),
            None => Err(PollError::not_found(format!("Choice {} not found", choice_id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text() {
        assert!(validate_text("Question", "What's new?").is_ok());
        assert!(validate_text("Question", &"x".repeat(200)).is_ok());

        let err = validate_text("Question", "   ").unwrap_err();
        assert_eq!(err.code(), "E003");

        let err = validate_text("Choice text", &"y".repeat(201)).unwrap_err();
        assert!(err.message().contains("too long"));
    }

    #[test]
    fn test_validate_counts_characters_not_bytes() {
        // 200 个多字节字符仍然合法
        assert!(validate_text("Question", &"é".repeat(200)).is_ok());
    }
}
