use axum::{
    routing::{get, patch, post},
    Router,
};

pub mod admin;
pub mod auth;
pub mod customers;
pub mod menu;
pub mod system;
pub mod transactions;

/// Router for everything behind the bearer-token middleware.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/auth/signout", post(auth::sign_out))
        .route("/auth/user", patch(auth::update_account))
        .route("/transactions", get(transactions::list_all))
        .nest("/customers", customers::router())
        .nest("/menu", menu::router())
        .nest("/admin", admin::router())
}

/// Router for the unauthenticated auth entry points.
pub fn public_router() -> Router {
    Router::new()
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/signin", post(auth::sign_in))
        .route("/auth/reset-password", post(auth::reset_password))
}
