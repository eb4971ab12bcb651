//! 投票数据表迁移
//!
//! 创建 polls / choices / votes 三张表：
//! - choices.poll_id → polls.id（级联删除）
//! - votes.choice_id → choices.id（级联删除）

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 polls 表
        manager
            .create_table(
                Table::create()
                    .table(Polls::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Polls::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Polls::Question).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Polls::PubDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 choices 表
        manager
            .create_table(
                Table::create()
                    .table(Choices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Choices::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Choices::PollId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Choices::ChoiceText)
                            .string_len(200)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_choices_poll_id")
                            .from(Choices::Table, Choices::PollId)
                            .to(Polls::Table, Polls::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 votes 表
        manager
            .create_table(
                Table::create()
                    .table(Votes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Votes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Votes::ChoiceId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Votes::VotedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_choice_id")
                            .from(Votes::Table, Votes::ChoiceId)
                            .to(Choices::Table, Choices::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // 发布时间索引（列表按日期过滤/排序）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_polls_pub_date")
                    .table(Polls::Table)
                    .col(Polls::PubDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_choices_poll_id")
                    .table(Choices::Table)
                    .col(Choices::PollId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_votes_choice_id")
                    .table(Votes::Table)
                    .col(Votes::ChoiceId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_votes_choice_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_choices_poll_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_polls_pub_date").to_owned())
            .await?;

        // 按依赖顺序删除表
        manager
            .drop_table(Table::drop().table(Votes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Choices::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Polls::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Polls {
    #[sea_orm(iden = "polls")]
    Table,
    Id,
    Question,
    PubDate,
}

#[derive(DeriveIden)]
enum Choices {
    #[sea_orm(iden = "choices")]
    Table,
    Id,
    PollId,
    ChoiceText,
}

#[derive(DeriveIden)]
enum Votes {
    #[sea_orm(iden = "votes")]
    Table,
    Id,
    ChoiceId,
    VotedAt,
}
