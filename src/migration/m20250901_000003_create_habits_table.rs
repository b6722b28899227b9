use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Habits {
    Table,
    Id,
    UserId,
    Title,
    HabitType,
    Target,
    Frequency,
    ReminderTime,
    DurationDays,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Habits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Habits::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Habits::UserId).integer().not_null())
                    .col(ColumnDef::new(Habits::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Habits::HabitType).string_len(10).not_null())
                    .col(ColumnDef::new(Habits::Target).integer().not_null())
                    .col(
                        ColumnDef::new(Habits::Frequency)
                            .string_len(10)
                            .not_null()
                            .default("daily"),
                    )
                    .col(ColumnDef::new(Habits::ReminderTime).string_len(5).null())
                    .col(ColumnDef::new(Habits::DurationDays).integer().null())
                    .col(
                        ColumnDef::new(Habits::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Habits::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_habits_user_id")
                            .from(Habits::Table, Habits::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_habits_user_id")
                    .table(Habits::Table)
                    .col(Habits::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Habits::Table).to_owned())
            .await
    }
}
