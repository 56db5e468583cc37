pub mod auth;
pub mod documents;
pub mod error;
pub mod health;
pub mod users;

use axum::Router;

use crate::bootstrap::app_context::AppContext;

/// All `/api` routes without the outer middleware layers.
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .nest("/api", health::routes(ctx.clone()))
        .nest("/api/auth", auth::routes(ctx.clone()))
        .nest("/api", documents::routes(ctx.clone()))
        .nest("/api", users::routes(ctx))
}
