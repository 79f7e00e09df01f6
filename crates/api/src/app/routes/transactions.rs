//! The ledger endpoints. Records are append-only; nothing here updates or
//! deletes a transaction.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use coffeedocket_core::Money;
use coffeedocket_ledger::{TransactionDraft, TransactionKind};

use crate::app::routes::customers::parse_id;
use crate::app::{dto, errors, services::AppServices};
use crate::context::StaffContext;

/// POST /customers/:id/transactions — record a topup, serve, or refund.
pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(staff): Extension<StaffContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::CreateTransactionRequest>,
) -> axum::response::Response {
    let customer_id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let kind = match body.kind.parse::<TransactionKind>() {
        Ok(kind) => kind,
        Err(e) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string())
        }
    };

    let amount = match parse_cents(body.amount_cents, "amountCents") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let discount = match parse_cents(body.discount_cents, "discountCents") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let draft = TransactionDraft {
        customer_id,
        staff_id: staff.staff_id(),
        kind,
        coffee_count: body.coffee_count,
        amount,
        drink: body.drink,
        size: body.size,
        addons: body.addons,
        discount,
        notes: body.notes,
    };

    match services.transactions.apply_transaction(draft).await {
        Ok((transaction, customer)) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "transaction": dto::transaction_to_json(&transaction),
                "customer": dto::customer_to_json(&customer),
            })),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// GET /customers/:id/transactions — one customer's history, newest first.
pub async fn list_for_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let customer_id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services
        .transactions
        .list_transactions_for_customer(customer_id)
        .await
    {
        Ok(transactions) => {
            let items: Vec<_> = transactions.iter().map(dto::transaction_to_json).collect();
            Json(serde_json::json!({ "items": items })).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// GET /transactions — the full history (admin).
pub async fn list_all(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.transactions.list_transactions().await {
        Ok(transactions) => {
            let items: Vec<_> = transactions.iter().map(dto::transaction_to_json).collect();
            Json(serde_json::json!({ "items": items })).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

fn parse_cents(
    cents: Option<i64>,
    field: &str,
) -> Result<Option<Money>, axum::response::Response> {
    cents
        .map(Money::from_cents)
        .transpose()
        .map_err(|_| {
            errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                format!("{field} cannot be negative"),
            )
        })
}
