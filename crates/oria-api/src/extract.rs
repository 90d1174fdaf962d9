use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde_json::Value;
use tracing::warn;

use oria_types::schema::Schema;

use crate::error::ApiError;

/// A JSON body that has passed its [`Schema`]. Rejects with every field error
/// at once.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Schema + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let path = req.uri().path().to_owned();

        let Json(payload) = Json::<Value>::from_request(req, state).await.map_err(|rejection| {
            warn!("Unreadable body on {}: {}", path, rejection.body_text());
            ApiError::from(rejection)
        })?;

        let record = T::validate(&payload).map_err(|err| {
            warn!(
                "Invalid form data on {}: {:?}",
                path,
                err.fields().collect::<Vec<_>>()
            );
            ApiError::from(err)
        })?;

        Ok(Self(record))
    }
}
