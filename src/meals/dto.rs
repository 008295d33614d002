use serde::{Deserialize, Serialize};

use crate::meals::repo::Meal;

/// Request body for meal creation. Every field is required; absence surfaces
/// as a validation error instead of a deserialization one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub on_diet: Option<bool>,
}

/// Request body for partial update. Absent fields are left untouched; `date`
/// is an RFC 3339 string validated in the handler.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub on_diet: Option<bool>,
    pub date: Option<String>,
}

impl UpdateMealRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.on_diet.is_none()
            && self.date.is_none()
    }
}

/// One meal as rendered on the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub date: String,
    pub on_diet: Option<bool>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Meal> for MealResponse {
    fn from(meal: Meal) -> Self {
        Self {
            id: meal.id,
            user_id: meal.user_id,
            name: meal.name,
            description: meal.description,
            date: meal.date,
            on_diet: meal.on_diet.map(|flag| flag != 0),
            created_at: meal.created_at,
            updated_at: meal.updated_at,
        }
    }
}

/// Envelope for GET /meals.
#[derive(Debug, Serialize)]
pub struct MealsListResponse {
    pub meals: Vec<MealResponse>,
}

/// Envelope for GET /meals/:id.
#[derive(Debug, Serialize)]
pub struct SingleMealResponse {
    pub meal: MealResponse,
}
