use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use tasklist_types::api::Validate;

use crate::error::ApiError;

/// JSON body that must deserialize and pass `Validate`. Anything else is
/// answered with 400 `invalid input body`.
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            debug!(%rejection, "rejected request body");
            ApiError::InvalidBody
        })?;

        if !value.is_valid() {
            return Err(ApiError::InvalidBody);
        }

        Ok(Self(value))
    }
}

/// Numeric path parameters. A non-numeric segment is a 400 with a JSON body
/// instead of axum's plain-text rejection.
pub struct Ids<T>(pub T);

impl<T, S> FromRequestParts<S> for Ids<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(ids) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation("invalid id param".to_string()))?;
        Ok(Self(ids))
    }
}
