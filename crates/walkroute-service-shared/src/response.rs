//! Response wrapper for successful HTTP responses.

use axum::{
    http::HeaderValue,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::middleware::REQUEST_ID_HEADER;

/// Successful response body: the payload's fields plus the request ID.
///
/// ```
/// use serde::Serialize;
/// use walkroute_service_shared::ServiceResponse;
///
/// #[derive(Serialize)]
/// struct Summary {
///     distance: f64,
/// }
///
/// let response = ServiceResponse::new(Summary { distance: 540.0 }).with_request_id("req-1");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    #[serde(flatten)]
    pub data: T,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    pub content_type: String,
}

impl<T> ServiceResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            request_id: None,
            content_type: "application/json".to_string(),
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        let header = self
            .request_id
            .as_deref()
            .and_then(|id| HeaderValue::from_str(id).ok());
        let mut response = Json(self).into_response();
        if let Some(value) = header {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Summary {
        distance: f64,
        points: usize,
    }

    #[test]
    fn payload_fields_are_flattened() {
        let response = ServiceResponse::new(Summary {
            distance: 540.0,
            points: 7,
        })
        .with_request_id("req-1");
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"distance\":540.0"));
        assert!(json.contains("\"points\":7"));
        assert!(json.contains("\"request_id\":\"req-1\""));
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn request_id_is_optional() {
        let response: ServiceResponse<Summary> = Summary {
            distance: 1.0,
            points: 2,
        }
        .into();
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("request_id"));
        assert!(json.contains("\"content_type\":\"application/json\""));
    }

    #[test]
    fn into_response_echoes_request_id() {
        let response = ServiceResponse::new(Summary {
            distance: 1.0,
            points: 2,
        })
        .with_request_id("req-9")
        .into_response();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-9");
    }
}
