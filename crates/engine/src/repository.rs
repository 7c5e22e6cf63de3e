//! Storage access for recipes.
//!
//! [`RecipeRepository`] is the only seam through which the engine reaches
//! persistent storage. Two implementations are provided:
//!
//! - [`SeaOrmRepository`] backed by a `sea_orm` connection pool.
//! - [`MemoryRepository`] keeping everything in process, used by tests.
//!
//! Every method returns a future; dropping it aborts the storage call.

use async_trait::async_trait;

use crate::{NewRecipe, Recipe, RecipePatch, ResultEngine};

pub use database::SeaOrmRepository;
pub use memory::MemoryRepository;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

mod database;
mod memory;

#[async_trait]
pub trait RecipeRepository: Send + Sync + std::fmt::Debug {
    /// Every stored recipe, most recently created first.
    async fn all(&self) -> ResultEngine<Vec<Recipe>>;

    /// The recipe with `id`, or `KeyNotFound`.
    async fn by_id(&self, id: i32) -> ResultEngine<Recipe>;

    /// Persist a new recipe, assigning its id and both timestamps.
    async fn create(&self, recipe: NewRecipe) -> ResultEngine<Recipe>;

    /// Write the supplied fields of `patch` and refresh `updated_at`.
    ///
    /// Fails with `KeyNotFound` when no recipe has `id`.
    async fn update(&self, id: i32, patch: RecipePatch) -> ResultEngine<Recipe>;

    /// Hard delete. Fails with `KeyNotFound` when nothing was removed.
    async fn delete(&self, id: i32) -> ResultEngine<()>;
}

pub(crate) fn not_found(id: i32) -> crate::EngineError {
    crate::EngineError::KeyNotFound(format!("recipe {id}"))
}
