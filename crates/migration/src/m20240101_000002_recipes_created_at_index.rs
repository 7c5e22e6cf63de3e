use sea_orm_migration::prelude::*;

use super::m20240101_000001_recipes::Recipes;

const INDEX_NAME: &str = "idx-recipes-created_at";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listing is always newest first.
        manager
            .create_index(
                Index::create()
                    .name(INDEX_NAME)
                    .table(Recipes::Table)
                    .col(Recipes::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(INDEX_NAME)
                    .table(Recipes::Table)
                    .to_owned(),
            )
            .await
    }
}
