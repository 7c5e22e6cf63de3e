use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Layout used for `created_at`/`updated_at` in responses.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a timestamp the way clients expect it (`2006-01-02 15:04:05`).
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

pub mod recipe {
    use super::*;

    /// Fields listed to the client when a creation request is rejected.
    pub const REQUIRED_FIELDS: &str = "title, making_time, serves, ingredients, cost";

    /// Request body for `POST /recipes/`.
    ///
    /// Every field defaults to its zero value so that a missing key and an
    /// empty one are rejected the same way.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct RecipeNew {
        pub title: String,
        pub making_time: String,
        pub serves: String,
        pub ingredients: String,
        pub cost: i32,
    }

    impl RecipeNew {
        /// True when every field carries a non-zero value.
        pub fn is_complete(&self) -> bool {
            !self.title.is_empty()
                && !self.making_time.is_empty()
                && !self.serves.is_empty()
                && !self.ingredients.is_empty()
                && self.cost != 0
        }
    }

    /// Request body for `PATCH /recipes/:id`.
    ///
    /// Absent, empty and zero values all mean "keep the stored value".
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct RecipeUpdate {
        pub title: Option<String>,
        pub making_time: Option<String>,
        pub serves: Option<String>,
        pub ingredients: Option<String>,
        pub cost: Option<i32>,
    }

    /// A recipe as rendered by list/get. `cost` is sent as a string.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipeView {
        pub id: i32,
        pub title: String,
        pub making_time: String,
        pub serves: String,
        pub ingredients: String,
        pub cost: String,
    }

    /// A freshly created recipe, including its timestamps.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipeCreated {
        pub id: i32,
        pub title: String,
        pub making_time: String,
        pub serves: String,
        pub ingredients: String,
        pub cost: String,
        pub created_at: String,
        pub updated_at: String,
    }

    /// The mutable fields of a recipe after an update.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipeUpdated {
        pub title: String,
        pub making_time: String,
        pub serves: String,
        pub ingredients: String,
        pub cost: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipeListResponse {
        pub recipes: Vec<RecipeView>,
    }

    /// Envelope shared by get, create and update: a message plus a
    /// one-element `recipe` list.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipeResponse<T> {
        pub message: String,
        pub recipe: Vec<T>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CreationFailed {
        pub message: String,
        pub required: String,
    }
}
