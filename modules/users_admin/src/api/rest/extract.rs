use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;

use adminkit::ProblemResponse;

use crate::errors::ErrorCode;

/// Body extractor accepting `application/json` or an urlencoded form.
/// Decoding failures become `400` problems.
pub struct FormOrJson<T>(pub T);

impl<S, T> FromRequest<S> for FormOrJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let instance = req.uri().path().to_owned();
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json") || ct.ends_with("+json"));

        let reject = |detail: String| {
            ErrorCode::users_admin_request_invalid_v1.to_response(detail, &instance, None)
        };

        if is_json {
            Json::<T>::from_request(req, state)
                .await
                .map(|Json(v)| Self(v))
                .map_err(|e| reject(e.body_text()))
        } else {
            Form::<T>::from_request(req, state)
                .await
                .map(|Form(v)| Self(v))
                .map_err(|e| reject(e.body_text()))
        }
    }
}
