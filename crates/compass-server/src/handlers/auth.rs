//! Identity handlers

use axum::{extract::Request, Json};
use serde::Serialize;

use crate::{get_user_email, AppError};

/// Response for the identity endpoint
#[derive(Serialize)]
pub struct MeResponse {
    pub email: String,
}

/// GET /api/me - Who the server thinks is calling
pub async fn get_me(request: Request) -> Result<Json<MeResponse>, AppError> {
    let email = get_user_email(request.headers());
    Ok(Json(MeResponse { email }))
}
