//! Recipe use cases.
//!
//! [`Engine`] is the only entry point the transport layer talks to. It owns a
//! [`RecipeRepository`] and forwards every call to it unchanged, errors included.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use error::EngineError;
pub use recipes::{
    INGREDIENTS_MAX_CHARS, MAKING_TIME_MAX_CHARS, NewRecipe, Recipe, RecipePatch,
    SERVES_MAX_CHARS, TITLE_MAX_CHARS,
};
pub use repository::{MemoryRepository, RecipeRepository, SeaOrmRepository};

mod error;
mod recipes;
mod repository;

pub type ResultEngine<T> = Result<T, EngineError>;

#[derive(Clone, Debug)]
pub struct Engine {
    repository: Arc<dyn RecipeRepository>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// All recipes, most recently created first.
    pub async fn recipes(&self) -> ResultEngine<Vec<Recipe>> {
        self.repository.all().await
    }

    pub async fn recipe(&self, id: i32) -> ResultEngine<Recipe> {
        self.repository.by_id(id).await
    }

    pub async fn new_recipe(&self, recipe: NewRecipe) -> ResultEngine<Recipe> {
        self.repository.create(recipe).await
    }

    /// Partially update a recipe and return the stored result.
    pub async fn update_recipe(&self, id: i32, patch: RecipePatch) -> ResultEngine<Recipe> {
        self.repository.update(id, patch).await
    }

    pub async fn delete_recipe(&self, id: i32) -> ResultEngine<()> {
        self.repository.delete(id).await
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    repository: Option<Arc<dyn RecipeRepository>>,
}

impl EngineBuilder {
    /// Pass the required database. Recipes are stored through [`SeaOrmRepository`].
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.repository = Some(Arc::new(SeaOrmRepository::new(db)));
        self
    }

    /// Use an arbitrary repository, e.g. [`MemoryRepository`] in tests.
    pub fn repository(mut self, repository: Arc<dyn RecipeRepository>) -> EngineBuilder {
        self.repository = Some(repository);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let repository = self.repository.ok_or(EngineError::MissingRepository)?;
        Ok(Engine { repository })
    }
}
