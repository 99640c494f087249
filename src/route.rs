use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::{handler::*, middleware::mw_require_auth, AppState};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let app = Router::new()
        .route(
            "/api/todos",
            get(get_todos)
                .post(create_todo)
                .put(update_todo)
                .delete(delete_todo),
        )
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
        .route_layer(from_fn_with_state(app_state.clone(), mw_require_auth))
        .route("/api/auth/login", post(login))
        .route("/api/auth/signup", post(signup))
        .route("/", get(index))
        .route("/healthz", get(health_checker_handler))
        .with_state(app_state);
    app
}
