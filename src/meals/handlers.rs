use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{info, instrument, warn};

use crate::{
    auth::SessionUser,
    db::{now_rfc3339, AppState},
    error::ApiError,
    meals::{
        dto::{
            CreateMealRequest, MealResponse, MealsListResponse, SingleMealResponse,
            UpdateMealRequest,
        },
        metrics::{self, DietMetrics},
        repo::Meal,
    },
    users::repo::User,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal).get(list_meals))
        .route("/meals/metrics", get(get_metrics))
        .route(
            "/meals/:id",
            get(get_meal).patch(update_meal).delete(delete_meal),
        )
}

/// Lookup precedence shared by the single-meal routes: a missing id is 404,
/// an id owned by someone else is 403.
async fn fetch_owned(state: &AppState, user: &User, id: &str) -> Result<Meal, ApiError> {
    let meal = Meal::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("meal not found".to_string()))?;

    if meal.user_id != user.id {
        warn!(user_id = %user.id, meal_id = %meal.id, "meal owned by another user");
        return Err(ApiError::Forbidden(
            "meal belongs to another user".to_string(),
        ));
    }

    Ok(meal)
}

#[instrument(skip(state, user, payload))]
pub async fn create_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Json(payload): Json<CreateMealRequest>,
) -> Result<StatusCode, ApiError> {
    let name = payload
        .name
        .ok_or_else(|| ApiError::Validation("name is required".to_string()))?;
    let description = payload
        .description
        .ok_or_else(|| ApiError::Validation("description is required".to_string()))?;
    let on_diet = payload
        .on_diet
        .ok_or_else(|| ApiError::Validation("onDiet is required".to_string()))?;

    let meal = Meal::create(&state.db, &user.id, &name, &description, on_diet).await?;
    info!(user_id = %user.id, meal_id = %meal.id, "meal created");

    Ok(StatusCode::CREATED)
}

#[instrument(skip(state, user))]
pub async fn list_meals(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> Result<Json<MealsListResponse>, ApiError> {
    let meals = Meal::list_by_user(&state.db, &user.id).await?;
    Ok(Json(MealsListResponse {
        meals: meals.into_iter().map(MealResponse::from).collect(),
    }))
}

#[instrument(skip(state, user))]
pub async fn get_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<String>,
) -> Result<Json<SingleMealResponse>, ApiError> {
    let meal = fetch_owned(&state, &user, &id).await?;
    Ok(Json(SingleMealResponse { meal: meal.into() }))
}

#[instrument(skip(state, user, payload))]
pub async fn update_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateMealRequest>,
) -> Result<StatusCode, ApiError> {
    if payload.is_empty() {
        return Err(ApiError::Validation(
            "at least one field must be provided".to_string(),
        ));
    }

    let mut meal = fetch_owned(&state, &user, &id).await?;

    if let Some(name) = payload.name {
        meal.name = name;
    }
    if let Some(description) = payload.description {
        meal.description = description;
    }
    if let Some(on_diet) = payload.on_diet {
        meal.on_diet = Some(i64::from(on_diet));
    }
    if let Some(date) = payload.date {
        OffsetDateTime::parse(&date, &Rfc3339)
            .map_err(|_| ApiError::Validation("date must be an RFC 3339 timestamp".to_string()))?;
        meal.date = date;
    }
    meal.updated_at = now_rfc3339();

    meal.update(&state.db).await?;
    info!(user_id = %user.id, meal_id = %meal.id, "meal updated");

    Ok(StatusCode::OK)
}

#[instrument(skip(state, user))]
pub async fn delete_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let meal = fetch_owned(&state, &user, &id).await?;

    Meal::delete(&state.db, &meal.id).await?;
    info!(user_id = %user.id, meal_id = %meal.id, "meal deleted");

    Ok(StatusCode::OK)
}

#[instrument(skip(state, user))]
pub async fn get_metrics(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> Result<Json<DietMetrics>, ApiError> {
    let meals = Meal::list_by_user(&state.db, &user.id).await?;
    Ok(Json(metrics::compute(&meals)))
}
