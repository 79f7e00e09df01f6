use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::context::StaffContext;

pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(staff): Extension<StaffContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "staffId": staff.staff_id().to_string(),
        "role": staff.role().as_str(),
    }))
}
