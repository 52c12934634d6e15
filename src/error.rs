use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, thiserror::Error)]
pub enum CorrectionError {
    #[error("{0}")]
    Validation(String),

    #[error("Correction request not found or already processed.")]
    NotFound,

    #[error("Server error")]
    Store(#[from] sqlx::Error),
}

impl CorrectionError {
    pub fn validation(message: impl Into<String>) -> Self {
        CorrectionError::Validation(message.into())
    }
}

/// Body shared by every intake and resolution response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    pub success: bool,
    #[schema(example = "Attendance correction request filed successfully.")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 1)]
    pub id: Option<u64>,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            id: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

impl ResponseError for CorrectionError {
    fn status_code(&self) -> StatusCode {
        match self {
            CorrectionError::Validation(_) => StatusCode::BAD_REQUEST,
            CorrectionError::NotFound => StatusCode::NOT_FOUND,
            CorrectionError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Display for Store never leaks the driver message
        HttpResponse::build(self.status_code()).json(ActionResponse::failed(self.to_string()))
    }
}
