mod cors;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use tasktrail_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

use self::cors::build_cors_layer;

pub fn build_router(app_state: AppState, frontend_url: Option<&str>) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route(
            "/users",
            get(handlers::users::list_users_handler).post(handlers::users::create_user_handler),
        )
        .route(
            "/users/{user_id}",
            put(handlers::users::update_user_handler).delete(handlers::users::delete_user_handler),
        )
        .route(
            "/tasks",
            get(handlers::tasks::list_tasks_handler).post(handlers::tasks::create_task_handler),
        )
        .route(
            "/tasks/{task_id}",
            put(handlers::tasks::update_task_handler).delete(handlers::tasks::delete_task_handler),
        )
        .route(
            "/positions",
            get(handlers::positions::list_positions_handler)
                .post(handlers::positions::create_position_handler),
        )
        .route(
            "/positions/{position_id}",
            put(handlers::positions::update_position_handler)
                .delete(handlers::positions::delete_position_handler),
        )
        .route(
            "/user-positions",
            get(handlers::user_positions::list_user_positions_handler)
                .post(handlers::user_positions::create_user_position_handler),
        )
        .route(
            "/user-positions/{user_position_id}",
            delete(handlers::user_positions::delete_user_position_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    let mut router = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http());

    if let Some(frontend_url) = frontend_url {
        router = router.layer(build_cors_layer(frontend_url)?);
    }

    Ok(router)
}
