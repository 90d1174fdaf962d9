use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// Admin routes need `Authorization: Bearer <admin token>`. With no token
/// configured they are refused outright.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Err(ApiError::AdminDisabled);
    };

    let Authorization(bearer) = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(ApiError::Unauthorized)?;

    if !tokens_match(bearer.token().as_bytes(), expected.as_bytes()) {
        warn!("Rejected admin request to {} with a bad token", req.uri().path());
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(req).await)
}

// Constant time over the expected length.
fn tokens_match(given: &[u8], expected: &[u8]) -> bool {
    given.len() == expected.len()
        && given
            .iter()
            .zip(expected)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_comparison() {
        assert!(tokens_match(b"s3cret-admin-token", b"s3cret-admin-token"));
        assert!(!tokens_match(b"s3cret-admin-tokeX", b"s3cret-admin-token"));
        assert!(!tokens_match(b"s3cret", b"s3cret-admin-token"));
        assert!(!tokens_match(b"", b"s3cret-admin-token"));
    }
}
