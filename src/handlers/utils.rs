// handlers/utils.rs - shared extractors: owner query, JSON body, owner resolution

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};

use crate::error::ApiError;

/// `?email=` carried by owner-scoped reads and deletes
#[derive(Debug, Default, Deserialize)]
pub struct OwnerQuery {
    pub email: Option<String>,
}

/// JSON body extractor whose rejections use the API error envelope.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Owner from the body when present, else from the query string.
pub fn owner_from(body: &serde_json::Value, field: &str, query: &OwnerQuery) -> Option<String> {
    body.get(field)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .or_else(|| query.email.clone())
}
