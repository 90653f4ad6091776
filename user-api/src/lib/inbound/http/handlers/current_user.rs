use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::format_timestamp;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Identity asserted by the caller's bearer token.
pub async fn current_user(
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<CurrentUserData>, ApiError> {
    Ok(ApiSuccess::new(StatusCode::OK, (&user).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUserData {
    pub id: String,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub expires_at: String,
}

impl From<&AuthenticatedUser> for CurrentUserData {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            id: user.user_id.to_string(),
            username: user.username.clone(),
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            expires_at: format_timestamp(&user.expires_at),
        }
    }
}
