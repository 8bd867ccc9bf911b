//! Validation utilities for the board API DTOs.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::board::{validate_delete_password, validate_text, MAX_DELETE_PASSWORD_LENGTH};
use crate::web::error::ApiError;
use crate::BoardError;

/// A body extractor that accepts JSON or an HTML form and validates it.
///
/// `application/x-www-form-urlencoded` bodies are read as forms, anything
/// else as JSON. After deserializing, the value is checked with the
/// `validator` crate and the first failing field is reported as a 400.
///
/// # Example
///
/// ```ignore
/// async fn create_thread(
///     ValidatedPayload(payload): ValidatedPayload<CreateThreadRequest>,
/// ) -> Result<Redirect, ApiError> {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedPayload<T>(pub T);

/// Whether the request carries an URL-encoded form body.
fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedPayload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = if is_form(&req) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid form: {}", e)))?;
            value
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e)))?;
            value
        };

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedPayload(value))
    }
}

// ============================================================================
// Custom Validators
// ============================================================================

/// Turn a board rule failure into a validator error carrying its message.
fn board_rule(code: &'static str, result: crate::Result<()>) -> Result<(), ValidationError> {
    result.map_err(|e| {
        let message = match e {
            BoardError::Validation(msg) => msg,
            other => other.to_string(),
        };
        ValidationError::new(code).with_message(message.into())
    })
}

/// Validate thread or reply text.
pub fn post_text(value: &str) -> Result<(), ValidationError> {
    board_rule("post_text", validate_text(value))
}

/// Validate the delete password chosen when posting.
pub fn new_delete_password(value: &str) -> Result<(), ValidationError> {
    board_rule("new_delete_password", validate_delete_password(value))
}

/// Validate the length of a delete password offered for deletion.
///
/// An empty password is allowed here; it simply never matches.
pub fn delete_password_length(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_DELETE_PASSWORD_LENGTH {
        return Err(ValidationError::new("delete_password_length").with_message(
            format!("delete_password must be at most {MAX_DELETE_PASSWORD_LENGTH} characters")
                .into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[test]
    fn test_post_text_messages() {
        assert!(post_text("Test").is_ok());
        assert!(post_text("Line 1\nLine 2").is_ok());

        let err = post_text("   ").unwrap_err();
        assert_eq!(err.message.unwrap(), "text is required");

        let err = post_text("Hello\x1bWorld").unwrap_err();
        assert_eq!(
            err.message.unwrap(),
            "text must not contain control characters"
        );
    }

    #[test]
    fn test_new_delete_password() {
        assert!(new_delete_password("1234").is_ok());
        assert!(new_delete_password(&"あ".repeat(50)).is_ok());

        let err = new_delete_password("").unwrap_err();
        assert_eq!(
            err.message.unwrap(),
            "delete_password must be 1 to 128 characters"
        );
    }

    #[test]
    fn test_delete_password_length() {
        assert!(delete_password_length("").is_ok());
        assert!(delete_password_length(&"あ".repeat(MAX_DELETE_PASSWORD_LENGTH)).is_ok());
        assert!(delete_password_length(&"p".repeat(MAX_DELETE_PASSWORD_LENGTH + 1)).is_err());
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[serde(default)]
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
    }

    fn request(content_type: &str, body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_extracts_json() {
        let req = request("application/json", r#"{"name": "board"}"#);
        let ValidatedPayload(payload) = ValidatedPayload::<Payload>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(payload.name, "board");
    }

    #[tokio::test]
    async fn test_extracts_form() {
        let req = request("application/x-www-form-urlencoded", "name=board+one");
        let ValidatedPayload(payload) = ValidatedPayload::<Payload>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(payload.name, "board one");
    }

    #[tokio::test]
    async fn test_rejects_invalid_payload() {
        let req = request("application/json", "{}");
        let err = ValidatedPayload::<Payload>::from_request(req, &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.message(), "name is required");

        let req = request("application/json", "not json");
        let err = ValidatedPayload::<Payload>::from_request(req, &())
            .await
            .err()
            .unwrap();
        assert!(err.message().starts_with("Invalid JSON"));
    }
}
