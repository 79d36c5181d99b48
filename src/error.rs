use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("film with episode {episode_id} not found")]
    NotFound { episode_id: u32 },

    #[error("invalid {field}: {message}")]
    InvalidInput { field: &'static str, message: String },

    #[error("invalid date format: {0}")]
    InvalidDate(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidInput { .. } | Self::InvalidDate(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Film Not Found",
            Self::InvalidInput { .. } => "Validation Failed",
            Self::InvalidDate(_) => "Date Format Error",
            Self::Internal(_) => "Internal Server Error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "client error");
        }

        let mut body = json!({
            "timestamp": jiff::Timestamp::now(),
            "status": status.as_u16(),
            "error": self.title(),
        });

        match &self {
            Self::InvalidInput { field, message } => {
                let mut field_errors = serde_json::Map::new();
                field_errors.insert(field.to_string(), json!(message));
                body["fieldErrors"] = serde_json::Value::Object(field_errors);
            },
            _ => {
                body["message"] = json!(self.to_string());
            },
        }

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
