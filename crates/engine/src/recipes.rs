//! The module contains the `Recipe` struct and its database entity.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};

use sea_orm::entity::{ActiveValue, prelude::*};

use crate::{EngineError, ResultEngine};

pub const TITLE_MAX_CHARS: usize = 100;
pub const MAKING_TIME_MAX_CHARS: usize = 100;
pub const SERVES_MAX_CHARS: usize = 100;
pub const INGREDIENTS_MAX_CHARS: usize = 300;

/// A stored recipe.
///
/// `id`, `created_at` and `updated_at` are assigned by the repository; the
/// remaining fields are free-form text plus an integer cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recipe {
    pub id: i32,
    pub title: String,
    pub making_time: String,
    pub serves: String,
    pub ingredients: String,
    pub cost: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The caller-supplied fields of a new recipe.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewRecipe {
    pub title: String,
    pub making_time: String,
    pub serves: String,
    pub ingredients: String,
    pub cost: i32,
}

/// A partial update. `None` keeps the stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub making_time: Option<String>,
    pub serves: Option<String>,
    pub ingredients: Option<String>,
    pub cost: Option<i32>,
}

impl Recipe {
    pub(crate) fn from_new(id: i32, recipe: NewRecipe, at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: recipe.title,
            making_time: recipe.making_time,
            serves: recipe.serves,
            ingredients: recipe.ingredients,
            cost: recipe.cost,
            created_at: at,
            updated_at: at,
        }
    }

    /// Apply `patch` in place and refresh `updated_at`.
    pub(crate) fn apply(&mut self, patch: RecipePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(making_time) = patch.making_time {
            self.making_time = making_time;
        }
        if let Some(serves) = patch.serves {
            self.serves = serves;
        }
        if let Some(ingredients) = patch.ingredients {
            self.ingredients = ingredients;
        }
        if let Some(cost) = patch.cost {
            self.cost = cost;
        }
        self.updated_at = next_timestamp(self.updated_at);
    }

    /// Same rules as the `CHECK` constraints on the `recipes` table, reported
    /// the way a rejected statement would be.
    pub(crate) fn check_constraints(&self) -> ResultEngine<()> {
        let limits = [
            ("title", &self.title, TITLE_MAX_CHARS),
            ("making_time", &self.making_time, MAKING_TIME_MAX_CHARS),
            ("serves", &self.serves, SERVES_MAX_CHARS),
            ("ingredients", &self.ingredients, INGREDIENTS_MAX_CHARS),
        ];
        for (column, value, max) in limits {
            if value.chars().count() > max {
                return Err(constraint_failed(&format!("length({column}) <= {max}")));
            }
        }
        if self.cost < 0 {
            return Err(constraint_failed("cost >= 0"));
        }
        Ok(())
    }
}

fn constraint_failed(check: &str) -> EngineError {
    EngineError::Database(DbErr::Custom(format!("CHECK constraint failed: {check}")))
}

impl RecipePatch {
    /// Mark the supplied fields as `Set` on `model`, leaving the others untouched.
    pub(crate) fn apply_to(self, model: &mut ActiveModel) {
        if let Some(title) = self.title {
            model.title = ActiveValue::Set(title);
        }
        if let Some(making_time) = self.making_time {
            model.making_time = ActiveValue::Set(making_time);
        }
        if let Some(serves) = self.serves {
            model.serves = ActiveValue::Set(serves);
        }
        if let Some(ingredients) = self.ingredients {
            model.ingredients = ActiveValue::Set(ingredients);
        }
        if let Some(cost) = self.cost {
            model.cost = ActiveValue::Set(cost);
        }
    }
}

/// Current time, truncated to microseconds so it survives a round trip
/// through the database unchanged.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Timestamp for a record last touched at `previous`. Always strictly later.
pub(crate) fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now();
    if now > previous {
        now
    } else {
        previous + TimeDelta::microseconds(1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub making_time: String,
    pub serves: String,
    pub ingredients: String,
    pub cost: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Recipe {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            title: value.title,
            making_time: value.making_time,
            serves: value.serves,
            ingredients: value.ingredients,
            cost: value.cost,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<&NewRecipe> for ActiveModel {
    fn from(value: &NewRecipe) -> Self {
        Self {
            id: ActiveValue::NotSet,
            title: ActiveValue::Set(value.title.clone()),
            making_time: ActiveValue::Set(value.making_time.clone()),
            serves: ActiveValue::Set(value.serves.clone()),
            ingredients: ActiveValue::Set(value.ingredients.clone()),
            cost: ActiveValue::Set(value.cost),
            created_at: ActiveValue::NotSet,
            updated_at: ActiveValue::NotSet,
        }
    }
}
