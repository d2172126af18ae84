use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use noticeboard_api_types::{ApiErrorBody, ApiErrorMessage};

use crate::application::board::BoardError;
use crate::application::error::ErrorReport;

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const SERVICE_UNAVAILABLE: &str = "service_unavailable";
}

const SOURCE: &str = "infra::http::api";

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    hint: Option<String>,
    report: Option<ErrorReport>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            hint,
            report: None,
        }
    }

    pub fn bad_request(message: &'static str, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn invalid_input(hint: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "invalid input",
            Some(hint.into()),
        )
    }

    /// Backend details stay in the attached report; the body is generic.
    pub fn service_unavailable(report: ErrorReport) -> Self {
        Self {
            report: Some(report),
            ..Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                codes::SERVICE_UNAVAILABLE,
                "service temporarily unavailable",
                None,
            )
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl From<BoardError> for ApiError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::InvalidInput(message) => Self::invalid_input(message),
            err @ BoardError::BackendUnavailable { .. } => {
                Self::service_unavailable(ErrorReport::from_error(
                    SOURCE,
                    StatusCode::SERVICE_UNAVAILABLE,
                    &err,
                ))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let report = self.report.unwrap_or_else(|| {
            ErrorReport::from_message(
                SOURCE,
                self.status,
                format!(
                    "{}: {}",
                    self.code,
                    self.hint.as_deref().unwrap_or(self.message)
                ),
            )
        });
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        // Picked up by `log_responses`.
        report.attach(&mut response);
        response
    }
}
