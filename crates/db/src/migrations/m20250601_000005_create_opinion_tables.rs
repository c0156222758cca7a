//! Create opinion and opinion reaction tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Opinion::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Opinion::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Opinion::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Opinion::PollId).string_len(32))
                    .col(ColumnDef::new(Opinion::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Opinion::Body).text().not_null())
                    .col(
                        ColumnDef::new(Opinion::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Opinion::LikeCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Opinion::DislikeCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Opinion::CommentCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Opinion::Version).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(Opinion::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Opinion::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_opinion_user")
                            .from(Opinion::Table, Opinion::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_opinion_poll")
                            .from(Opinion::Table, Opinion::PollId)
                            .to(Poll::Table, Poll::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OpinionReaction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OpinionReaction::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OpinionReaction::OpinionId).string_len(32).not_null())
                    .col(ColumnDef::new(OpinionReaction::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(OpinionReaction::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(OpinionReaction::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_opinion_reaction_opinion")
                            .from(OpinionReaction::Table, OpinionReaction::OpinionId)
                            .to(Opinion::Table, Opinion::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_opinion_reaction_user")
                            .from(OpinionReaction::Table, OpinionReaction::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a user's opinions)
        manager
            .create_index(
                Index::create()
                    .name("idx_opinion_user_id")
                    .table(Opinion::Table)
                    .col(Opinion::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: poll_id (for opinions attached to a poll)
        manager
            .create_index(
                Index::create()
                    .name("idx_opinion_poll_id")
                    .table(Opinion::Table)
                    .col(Opinion::PollId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (for pagination)
        manager
            .create_index(
                Index::create()
                    .name("idx_opinion_created_at")
                    .table(Opinion::Table)
                    .col(Opinion::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Unique index: (opinion_id, user_id) - one reaction per user
        manager
            .create_index(
                Index::create()
                    .name("idx_opinion_reaction_opinion_user")
                    .table(OpinionReaction::Table)
                    .col(OpinionReaction::OpinionId)
                    .col(OpinionReaction::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OpinionReaction::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Opinion::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Opinion {
    Table,
    Id,
    UserId,
    PollId,
    Title,
    Body,
    Status,
    LikeCount,
    DislikeCount,
    CommentCount,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum OpinionReaction {
    Table,
    Id,
    OpinionId,
    UserId,
    Kind,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Poll {
    Table,
    Id,
}
