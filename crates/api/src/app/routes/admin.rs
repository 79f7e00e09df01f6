//! Admin routes for identity management.
//!
//! The privileged `admin_*` surface of the identity provider is reachable
//! only through these routes, and the role table gates them to admins.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use coffeedocket_store::IdentityAdminUpdate;

use crate::app::{dto, errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/:id",
            axum::routing::patch(update_user).delete(delete_user),
        )
}

/// GET /admin/users — the staff directory (role-bearing accounts only).
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.identity.admin_list_users().await {
        Ok(accounts) => {
            let items: Vec<_> = accounts
                .iter()
                .filter(|a| a.role.is_some())
                .map(dto::account_to_json)
                .collect();
            Json(serde_json::json!({ "items": items })).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateAdminUserRequest>,
) -> axum::response::Response {
    let id = match parse_account_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let role = match body.role.as_deref().map(errors::parse_role) {
        Some(Ok(role)) => Some(role),
        Some(Err(resp)) => return resp,
        None => None,
    };

    let update = IdentityAdminUpdate {
        email: body.email,
        display_name: body.display_name,
        role,
    };

    match services.identity.admin_update_user(id, update).await {
        Ok(account) => Json(dto::account_to_json(&account)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_account_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.identity.admin_delete_user(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

fn parse_account_id(id: &str) -> Result<Uuid, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid account id")
    })
}
