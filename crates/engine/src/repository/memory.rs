use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;

use crate::{
    NewRecipe, Recipe, RecipePatch, ResultEngine,
    recipes::now,
};

use super::{RecipeRepository, not_found};

/// In-process repository with the same semantics as [`super::SeaOrmRepository`].
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    last_id: i32,
    recipes: BTreeMap<i32, Recipe>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored recipes.
    pub fn len(&self) -> usize {
        self.state().recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // The map is never left half-written, so a poisoned lock is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RecipeRepository for MemoryRepository {
    async fn all(&self) -> ResultEngine<Vec<Recipe>> {
        let mut recipes: Vec<Recipe> = self.state().recipes.values().cloned().collect();
        recipes.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(recipes)
    }

    async fn by_id(&self, id: i32) -> ResultEngine<Recipe> {
        self.state()
            .recipes
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn create(&self, recipe: NewRecipe) -> ResultEngine<Recipe> {
        let mut state = self.state();
        let recipe = Recipe::from_new(state.last_id + 1, recipe, now());
        recipe.check_constraints()?;
        // Ids are never reused, even after deletes.
        state.last_id = recipe.id;
        state.recipes.insert(recipe.id, recipe.clone());
        Ok(recipe)
    }

    async fn update(&self, id: i32, patch: RecipePatch) -> ResultEngine<Recipe> {
        let mut state = self.state();
        let stored = state.recipes.get_mut(&id).ok_or_else(|| not_found(id))?;
        let mut recipe = stored.clone();
        recipe.apply(patch);
        recipe.check_constraints()?;
        *stored = recipe.clone();
        Ok(recipe)
    }

    async fn delete(&self, id: i32) -> ResultEngine<()> {
        self.state()
            .recipes
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}
