pub use sea_orm_migration::prelude::*;

mod m20240101_000001_recipes;
mod m20240101_000002_recipes_created_at_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_recipes::Migration),
            Box::new(m20240101_000002_recipes_created_at_index::Migration),
        ]
    }
}
