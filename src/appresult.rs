use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub type AppResult<T> = Result<T, AppError>;

/// Field name to message, rendered as the `errors` object of a failed response.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Every handler failure ends up here and is rendered by one `IntoResponse`.
#[derive(Debug)]
pub enum AppError {
    Validation(FieldErrors),
    Authentication,
    Unauthenticated,
    NotFound {
        field: &'static str,
        message: &'static str,
    },
    Geocoding(anyhow::Error),
    Internal(anyhow::Error),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::from([(field, message.into())]))
    }

    pub fn user_not_found() -> Self {
        Self::NotFound { field: "userId", message: "User not found" }
    }

    pub fn quest_not_found() -> Self {
        Self::NotFound { field: "quest", message: "Quest not found" }
    }

    pub fn event_not_found() -> Self {
        Self::NotFound { field: "eventId", message: "Event not found" }
    }

    /// Unreadable or mistyped request bodies, reported on the `body` field.
    pub fn malformed_body(rejection: JsonRejection) -> Self {
        Self::validation("body", rejection.body_text())
    }

    pub fn geocoding(err: impl Into<anyhow::Error>) -> Self {
        Self::Geocoding(err.into())
    }

    pub fn status(&self) -> StatusCode {
        use AppError::*;
        match self {
            Validation(_) | Authentication => StatusCode::BAD_REQUEST,
            Unauthenticated => StatusCode::UNAUTHORIZED,
            NotFound { .. } => StatusCode::NOT_FOUND,
            Geocoding(_) => StatusCode::BAD_GATEWAY,
            Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    title: &'a str,
    message: &'a str,
    status_code: u16,
    errors: FieldErrors,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (title, message, errors) = match self {
            AppError::Validation(errors) => ("Validation Error", "Validation Error", errors),
            AppError::Authentication => (
                "Invalid credentials",
                "Invalid credentials",
                FieldErrors::from([("email", "Invalid credentials".to_owned())]),
            ),
            AppError::Unauthenticated => (
                "Unauthorized",
                "Unauthorized",
                FieldErrors::from([("session", "You must be logged in".to_owned())]),
            ),
            AppError::NotFound { field, message } => (
                "Not Found",
                message,
                FieldErrors::from([(field, message.to_owned())]),
            ),
            AppError::Geocoding(err) => {
                tracing::warn!(error = %format!("{err:#}"), "geocoding service failed");
                ("Bad Gateway", "Geocoding service unavailable", FieldErrors::new())
            }
            AppError::Internal(err) => {
                tracing::error!(error = %format!("{err:#}"), backtrace = %err.backtrace(), "request failed");
                ("Server Error", "Server Error", FieldErrors::new())
            }
        };

        (
            status,
            Json(ErrorBody {
                title,
                message,
                status_code: status.as_u16(),
                errors,
            }),
        )
            .into_response()
    }
}

/// `Json` for request bodies, rejecting through [`AppError`].
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::malformed_body(rejection)),
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn validation_errors_keep_every_field() {
        let mut errors = FieldErrors::new();
        errors.insert("email", "Email is invalid".to_owned());
        errors.insert("password", "too short".to_owned());

        let (status, body) = render(AppError::Validation(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["statusCode"], 400);
        assert_eq!(
            body["errors"],
            json!({ "email": "Email is invalid", "password": "too short" })
        );
    }

    #[tokio::test]
    async fn authentication_blames_the_email_field() {
        let (status, body) = render(AppError::Authentication).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid credentials");
        assert_eq!(body["errors"]["email"], "Invalid credentials");
    }

    #[tokio::test]
    async fn missing_user_is_a_404_with_message() {
        let (status, body) = render(AppError::user_not_found()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");
        assert_eq!(body["errors"]["userId"], "User not found");
    }

    #[tokio::test]
    async fn unreadable_bodies_are_validation_errors() {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();

        let Err(err) = AppJson::<Value>::from_request(request, &()).await else {
            panic!("expected a rejection");
        };
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["errors"]["body"].is_string());
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let err: AppError = anyhow::anyhow!("disk on fire").into();
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Server Error");
        assert!(!body.to_string().contains("disk on fire"));
    }
}
