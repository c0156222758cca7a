//! Create forum and thread tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Forum::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Forum::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Forum::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Forum::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Forum::Description).text())
                    .col(ColumnDef::new(Forum::Category).string_len(64))
                    .col(ColumnDef::new(Forum::IsPublic).boolean().not_null().default(true))
                    .col(ColumnDef::new(Forum::ThreadCount).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Forum::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Forum::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_user")
                            .from(Forum::Table, Forum::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Thread::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Thread::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Thread::ForumId).string_len(32).not_null())
                    .col(ColumnDef::new(Thread::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Thread::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Thread::Body).text().not_null())
                    .col(ColumnDef::new(Thread::IsPinned).boolean().not_null().default(false))
                    .col(ColumnDef::new(Thread::IsLocked).boolean().not_null().default(false))
                    .col(ColumnDef::new(Thread::CommentCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Thread::ViewCount).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Thread::LastActivityAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Thread::Version).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(Thread::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Thread::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_thread_forum")
                            .from(Thread::Table, Thread::ForumId)
                            .to(Forum::Table, Forum::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_thread_user")
                            .from(Thread::Table, Thread::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (forum_id, last_activity_at) - forum listing order
        manager
            .create_index(
                Index::create()
                    .name("idx_thread_forum_activity")
                    .table(Thread::Table)
                    .col(Thread::ForumId)
                    .col(Thread::LastActivityAt)
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for a user's threads)
        manager
            .create_index(
                Index::create()
                    .name("idx_thread_user_id")
                    .table(Thread::Table)
                    .col(Thread::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Thread::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Forum::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Forum {
    Table,
    Id,
    UserId,
    Name,
    Description,
    Category,
    IsPublic,
    ThreadCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Thread {
    Table,
    Id,
    ForumId,
    UserId,
    Title,
    Body,
    IsPinned,
    IsLocked,
    CommentCount,
    ViewCount,
    LastActivityAt,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
