pub mod dto;
pub mod handlers;
pub mod repo;

use axum::Router;

use crate::db::AppState;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
