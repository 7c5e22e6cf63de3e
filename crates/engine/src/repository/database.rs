use async_trait::async_trait;
use sea_orm::{ActiveValue, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    NewRecipe, Recipe, RecipePatch, ResultEngine,
    recipes::{self, next_timestamp, now},
};

use super::{RecipeRepository, not_found};

/// Production repository on top of a `sea_orm` connection pool.
#[derive(Clone, Debug)]
pub struct SeaOrmRepository {
    database: DatabaseConnection,
}

impl SeaOrmRepository {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl RecipeRepository for SeaOrmRepository {
    async fn all(&self) -> ResultEngine<Vec<Recipe>> {
        // `id` breaks ties between recipes created within the same tick.
        let models = recipes::Entity::find()
            .order_by_desc(recipes::Column::CreatedAt)
            .order_by_desc(recipes::Column::Id)
            .all(&self.database)
            .await?;

        Ok(models.into_iter().map(Recipe::from).collect())
    }

    async fn by_id(&self, id: i32) -> ResultEngine<Recipe> {
        recipes::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(Recipe::from)
            .ok_or_else(|| not_found(id))
    }

    async fn create(&self, recipe: NewRecipe) -> ResultEngine<Recipe> {
        let at = now();
        let mut model: recipes::ActiveModel = (&recipe).into();
        model.created_at = ActiveValue::Set(at);
        model.updated_at = ActiveValue::Set(at);

        let model = model.insert(&self.database).await?;
        Ok(model.into())
    }

    async fn update(&self, id: i32, patch: RecipePatch) -> ResultEngine<Recipe> {
        with_tx!(self, |db_tx| {
            let current = recipes::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| not_found(id))?;

            let updated_at = next_timestamp(current.updated_at);
            let mut model: recipes::ActiveModel = current.into();
            patch.apply_to(&mut model);
            model.updated_at = ActiveValue::Set(updated_at);

            let model = model.update(&db_tx).await?;
            Ok(Recipe::from(model))
        })
    }

    async fn delete(&self, id: i32) -> ResultEngine<()> {
        let res = recipes::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;
        if res.rows_affected == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}
