pub mod admin;
pub mod booking;
pub mod public;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(public::router())
        .merge(booking::router())
        .nest("/admin", admin::router())
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
}
