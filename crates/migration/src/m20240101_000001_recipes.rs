//! Creates the `recipes` table.
//!
//! SQLite ignores `varchar(N)`, so the length limits are also `CHECK` constraints.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Recipes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Recipes::Title)
                            .string_len(100)
                            .not_null()
                            .check(Expr::cust("length(title) <= 100")),
                    )
                    .col(
                        ColumnDef::new(Recipes::MakingTime)
                            .string_len(100)
                            .not_null()
                            .check(Expr::cust("length(making_time) <= 100")),
                    )
                    .col(
                        ColumnDef::new(Recipes::Serves)
                            .string_len(100)
                            .not_null()
                            .check(Expr::cust("length(serves) <= 100")),
                    )
                    .col(
                        ColumnDef::new(Recipes::Ingredients)
                            .string_len(300)
                            .not_null()
                            .check(Expr::cust("length(ingredients) <= 300")),
                    )
                    .col(
                        ColumnDef::new(Recipes::Cost)
                            .integer()
                            .not_null()
                            .check(Expr::cust("cost >= 0")),
                    )
                    .col(
                        ColumnDef::new(Recipes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Recipes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
pub enum Recipes {
    Table,
    Id,
    Title,
    MakingTime,
    Serves,
    Ingredients,
    Cost,
    CreatedAt,
    UpdatedAt,
}
