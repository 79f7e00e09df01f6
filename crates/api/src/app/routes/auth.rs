//! Auth endpoints: signup/signin against the identity provider, plus
//! self-service account changes.

use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Duration;

use coffeedocket_core::StaffId;
use coffeedocket_ledger::NewCustomer;
use coffeedocket_store::IdentityUpdate;

use crate::app::{dto, errors, services::AppServices};
use crate::context::StaffContext;
use crate::jwt::Hs256Jwt;

/// Lifetime of a minted staff token.
const TOKEN_TTL_HOURS: i64 = 12;

/// POST /auth/signup — customer self-signup.
pub async fn sign_up(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::SignUpRequest>,
) -> axum::response::Response {
    let new = NewCustomer {
        first_name: body.first_name,
        last_name: body.last_name,
        email: Some(body.email),
        phone: body.phone,
        notify_email: body.notify_email,
        notify_sms: body.notify_sms,
    };

    match services.sign_up_customer(new, &body.password).await {
        Ok((customer, account)) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "customer": dto::customer_to_json(&customer),
                "account": dto::account_to_json(&account),
            })),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// POST /auth/signin. A token is minted only for role-bearing (staff/admin)
/// accounts; customer accounts get their profile back without one.
pub async fn sign_in(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(jwt): Extension<Arc<Hs256Jwt>>,
    Json(body): Json<dto::SignInRequest>,
) -> axum::response::Response {
    let account = match services
        .identity
        .sign_in_with_password(&body.email, &body.password)
        .await
    {
        Ok(a) => a,
        Err(e) => return errors::store_error_to_response(e),
    };

    let token = match account.role {
        Some(role) => {
            match jwt.mint(
                StaffId::from_uuid(account.id),
                role,
                Duration::hours(TOKEN_TTL_HOURS),
            ) {
                Ok(t) => Some(t),
                Err(e) => {
                    tracing::error!(error = %e, "could not mint token");
                    return errors::json_error(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "token_error",
                        "could not mint token",
                    );
                }
            }
        }
        None => None,
    };

    Json(serde_json::json!({
        "token": token,
        "account": dto::account_to_json(&account),
    }))
    .into_response()
}

/// POST /auth/signout.
pub async fn sign_out(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(staff): Extension<StaffContext>,
) -> axum::response::Response {
    match services.identity.sign_out(*staff.staff_id().as_uuid()).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// POST /auth/reset-password. Always acknowledges, so the endpoint does not
/// leak which addresses have accounts.
pub async fn reset_password(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ResetPasswordRequest>,
) -> axum::response::Response {
    match services.identity.reset_password_for_email(&body.email).await {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({ "status": "ok" })),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// PATCH /auth/user — self-service email/password change.
pub async fn update_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(staff): Extension<StaffContext>,
    Json(body): Json<dto::UpdateAccountRequest>,
) -> axum::response::Response {
    let update = IdentityUpdate {
        email: body.email,
        password: body.password,
    };

    match services
        .identity
        .update_user(*staff.staff_id().as_uuid(), update)
        .await
    {
        Ok(account) => Json(dto::account_to_json(&account)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
