use axum::Router;
use domain_users::handlers;

pub fn router(state: &crate::AppState) -> Router {
    handlers::router(state.users.clone())
}
