//! Recipes API endpoints

use api_types::{
    Message, format_timestamp,
    recipe::{
        RecipeCreated, RecipeListResponse, RecipeNew, RecipeResponse, RecipeUpdate,
        RecipeUpdated, RecipeView,
    },
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{EngineError, NewRecipe, Recipe, RecipePatch};

use crate::{ServerError, server::ServerState};

/// Parse the `id` path segment as a non-negative integer.
fn parse_id(raw: &str) -> Result<u64, ServerError> {
    raw.parse::<u64>().map_err(|_| {
        tracing::warn!("rejected recipe id {raw:?}");
        ServerError::InvalidId
    })
}

/// Ids are stored as `i32`; anything larger names no recipe.
fn stored_id(id: u64) -> Result<i32, EngineError> {
    i32::try_from(id).map_err(|_| EngineError::KeyNotFound(format!("recipe {id}")))
}

/// Empty strings and zero costs count as "not supplied".
fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn view(recipe: &Recipe) -> RecipeView {
    RecipeView {
        id: recipe.id,
        title: recipe.title.clone(),
        making_time: recipe.making_time.clone(),
        serves: recipe.serves.clone(),
        ingredients: recipe.ingredients.clone(),
        cost: recipe.cost.to_string(),
    }
}

/// Handle requests for listing every recipe
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<RecipeListResponse>, ServerError> {
    let recipes = state.engine.recipes().await?;
    tracing::debug!("listing {} recipes", recipes.len());

    Ok(Json(RecipeListResponse {
        recipes: recipes.iter().map(view).collect(),
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeResponse<RecipeView>>, ServerError> {
    let id = stored_id(parse_id(&id)?)?;
    let recipe = state.engine.recipe(id).await?;

    Ok(Json(RecipeResponse {
        message: "Recipe details by id".to_string(),
        recipe: vec![view(&recipe)],
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<RecipeNew>, JsonRejection>,
) -> Result<Json<RecipeResponse<RecipeCreated>>, ServerError> {
    let payload = match payload {
        Ok(Json(payload)) if payload.is_complete() => payload,
        Ok(_) => {
            tracing::warn!("recipe creation rejected: missing fields");
            return Err(ServerError::CreationFailed(StatusCode::BAD_REQUEST));
        }
        Err(rejection) => {
            tracing::warn!("recipe creation rejected: {rejection}");
            return Err(ServerError::CreationFailed(StatusCode::BAD_REQUEST));
        }
    };

    let recipe = state
        .engine
        .new_recipe(NewRecipe {
            title: payload.title,
            making_time: payload.making_time,
            serves: payload.serves,
            ingredients: payload.ingredients,
            cost: payload.cost,
        })
        .await
        .map_err(|err| {
            tracing::error!("failed to create recipe: {err}");
            ServerError::CreationFailed(StatusCode::INTERNAL_SERVER_ERROR)
        })?;
    tracing::info!("created recipe {}", recipe.id);

    Ok(Json(RecipeResponse {
        message: "Recipe successfully created!".to_string(),
        recipe: vec![RecipeCreated {
            id: recipe.id,
            title: recipe.title,
            making_time: recipe.making_time,
            serves: recipe.serves,
            ingredients: recipe.ingredients,
            cost: recipe.cost.to_string(),
            created_at: format_timestamp(&recipe.created_at),
            updated_at: format_timestamp(&recipe.updated_at),
        }],
    }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<RecipeUpdate>, JsonRejection>,
) -> Result<Json<RecipeResponse<RecipeUpdated>>, ServerError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload.map_err(|rejection| {
        tracing::warn!("recipe {id} update rejected: {rejection}");
        ServerError::InvalidBody
    })?;
    let id = stored_id(id)?;

    let patch = RecipePatch {
        title: supplied(payload.title),
        making_time: supplied(payload.making_time),
        serves: supplied(payload.serves),
        ingredients: supplied(payload.ingredients),
        cost: payload.cost.filter(|cost| *cost != 0),
    };

    let recipe = state.engine.update_recipe(id, patch).await?;

    Ok(Json(RecipeResponse {
        message: "Recipe successfully updated!".to_string(),
        recipe: vec![RecipeUpdated {
            title: recipe.title,
            making_time: recipe.making_time,
            serves: recipe.serves,
            ingredients: recipe.ingredients,
            cost: recipe.cost.to_string(),
        }],
    }))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServerError> {
    let id = stored_id(parse_id(&id)?).map_err(|_| ServerError::NotFound)?;
    state.engine.delete_recipe(id).await.map_err(|err| {
        if !matches!(err, EngineError::KeyNotFound(_)) {
            tracing::error!("failed to delete recipe {id}: {err}");
        }
        ServerError::NotFound
    })?;
    tracing::info!("deleted recipe {id}");

    Ok(Json(Message {
        message: "Recipe successfully removed!".to_string(),
    }))
}
