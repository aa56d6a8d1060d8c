//! `ValidatedJson<T>`: `axum::Json<T>` followed by `validator::Validate`.
//! `JsonBody<T>` is the same without rules, for bodies whose checks run in
//! a fixed order in the application layer.
//!
//! Malformed JSON and rule violations are both client errors and come back
//! as `400 {"error": ...}`, the same shape every other failure uses.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::error::ApiError;

pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    JsonError(JsonRejection),
    ValidationError(validator::ValidationErrors),
}

/// `field: message` pairs, sorted so the text is stable.
fn describe(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, msg)
            })
        })
        .collect();
    parts.sort();

    if parts.is_empty() {
        "validation failed".to_string()
    } else {
        parts.join("; ")
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let message = match self {
            Self::JsonError(rejection) => format!("invalid JSON: {}", rejection.body_text()),
            Self::ValidationError(errors) => describe(&errors),
        };
        ApiError::bad_request(message).into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;
        Ok(JsonBody(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct LoginBody {
        #[validate(email(message = "must be a valid email"))]
        email: String,
        #[validate(length(min = 1, message = "is required"))]
        password: String,
    }

    async fn handler(ValidatedJson(_body): ValidatedJson<LoginBody>) -> &'static str {
        "ok"
    }

    async fn raw_handler(JsonBody(body): JsonBody<LoginBody>) -> String {
        body.email
    }

    async fn send(body: &'static str) -> (StatusCode, serde_json::Value) {
        send_to(Router::new().route("/test", post(handler)), body).await
    }

    async fn send_to(router: Router, body: &'static str) -> (StatusCode, serde_json::Value) {
        use tower::Service;
        let mut svc = router.into_service();
        let req = Request::builder()
            .method("POST")
            .uri("/test")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let resp = svc.call(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn valid_body_passes() {
        let (status, _) = send(r#"{"email":"a@b.co","password":"x"}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_json_is_400() {
        let (status, body) = send("not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("invalid JSON"));
    }

    #[tokio::test]
    async fn rule_violation_is_400_with_field_names() {
        let (status, body) = send(r#"{"email":"nope","password":""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "email: must be a valid email; password: is required"
        );
    }

    #[tokio::test]
    async fn json_body_skips_rules_but_keeps_400_shape() {
        let router = Router::new().route("/test", post(raw_handler));
        let (status, _) = send_to(router.clone(), r#"{"email":"nope","password":""}"#).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send_to(router, "{").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("invalid JSON"));
    }
}
