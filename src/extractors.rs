use axum::{
    extract::{FromRequestParts, Path, Query},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::ErrorResponse;

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    /// City name, postcode or "lat,lon"
    pub location: Option<String>,
}

/// Location from the `{location}` path segment, else `?location=`.
///
/// Blank values count as absent so the handler can apply the default.
#[derive(Debug)]
pub struct LocationParam(pub Option<String>);

impl LocationParam {
    pub fn or_default(self, default: impl Into<String>) -> String {
        self.0.unwrap_or_else(|| default.into())
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl<S> FromRequestParts<S> for LocationParam
where
    S: Send + Sync,
{
    type Rejection = LocationParamRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Ok(Path(location)) = Path::<String>::from_request_parts(parts, state).await {
            if let Some(location) = non_blank(location) {
                return Ok(LocationParam(Some(location)));
            }
        }

        match Query::<LocationQuery>::from_request_parts(parts, state).await {
            Ok(Query(query)) => Ok(LocationParam(query.location.and_then(non_blank))),
            Err(rejection) => Err(LocationParamRejection(rejection.body_text())),
        }
    }
}

#[derive(Debug)]
pub struct LocationParamRejection(pub String);

impl IntoResponse for LocationParamRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::with_code(self.0, "INVALID_LOCATION")),
        )
            .into_response()
    }
}
