use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use coffeedocket_core::CustomerId;
use coffeedocket_ledger::NewCustomer;
use coffeedocket_store::CustomerPatch;

use crate::app::routes::transactions;
use crate::app::{dto, errors, services::AppServices};
use crate::context::StaffContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_customer).get(list_customers))
        .route(
            "/:id",
            get(get_customer)
                .patch(update_customer)
                .delete(delete_customer),
        )
        .route(
            "/:id/transactions",
            get(transactions::list_for_customer).post(transactions::create),
        )
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
}

/// GET /customers?q= — the directory. A query goes through the caller's own
/// debounced search stream so their rapid keystrokes coalesce; no query is
/// the full list.
pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(staff): Extension<StaffContext>,
    Query(params): Query<ListQuery>,
) -> axum::response::Response {
    let result = match params.q.as_deref() {
        Some(q) if !q.trim().is_empty() => services.search.search(staff.staff_id(), q).await,
        _ => services.customers.list_customers().await,
    };

    match result {
        Ok(customers) => {
            let items: Vec<_> = customers.iter().map(dto::customer_to_json).collect();
            Json(serde_json::json!({ "items": items })).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCustomerRequest>,
) -> axum::response::Response {
    let new = NewCustomer {
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        phone: body.phone,
        notify_email: body.notify_email,
        notify_sms: body.notify_sms,
    };

    match services.create_customer(new).await {
        Ok(customer) => {
            (StatusCode::CREATED, Json(dto::customer_to_json(&customer))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.customers.get_customer(id).await {
        Ok(customer) => Json(dto::customer_to_json(&customer)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateCustomerRequest>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let status = match body.status.as_deref().map(errors::parse_customer_status) {
        Some(Ok(s)) => Some(s),
        Some(Err(resp)) => return resp,
        None => None,
    };

    let patch = CustomerPatch {
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        phone: body.phone,
        status,
        notify_email: body.notify_email,
        notify_sms: body.notify_sms,
    };

    match services.customers.update_customer(id, patch).await {
        Ok(customer) => Json(dto::customer_to_json(&customer)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.delete_customer(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub(super) fn parse_id(id: &str) -> Result<CustomerId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer id")
    })
}
