use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::error::AppError;

/// Header the upstream auth gateway uses to forward the verified user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller, extracted from request extensions
///
/// Authentication itself happens upstream; by the time a request reaches
/// this service the gateway has already verified the session and set the
/// user id header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Uuid);

/// Middleware that requires a valid forwarded user id
///
/// Rejects with 401 when the header is missing or not a UUID; otherwise
/// stores an [`AuthenticatedUser`] in the request extensions for
/// handlers to read.
pub async fn require_user(mut request: Request, next: Next) -> Response {
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok());

    match user_id {
        Some(user_id) => {
            request.extensions_mut().insert(AuthenticatedUser(user_id));
            next.run(request).await
        }
        None => AppError::Unauthorized("Authentication required".to_string()).into_response(),
    }
}
