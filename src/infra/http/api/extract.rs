//! Request body normalization for the create endpoint.

use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use noticeboard_api_types::CreateMessageRequest;

use crate::application::board::PostMessageCommand;

use super::error::ApiError;

/// A create request decoded from either a form-encoded or a JSON body.
#[derive(Debug)]
pub struct MessageInput(pub CreateMessageRequest);

impl From<MessageInput> for PostMessageCommand {
    fn from(MessageInput(request): MessageInput) -> Self {
        Self {
            username: request.username,
            content: request.content,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Unsupported,
}

fn body_kind(request: &Request) -> BodyKind {
    let Some(content_type) = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return BodyKind::Unsupported;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence == "application/json" || essence.ends_with("+json") {
        BodyKind::Json
    } else if essence == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Unsupported
    }
}

impl<S> FromRequest<S> for MessageInput
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(&request) {
            BodyKind::Json => {
                let Json(body) = Json::<CreateMessageRequest>::from_request(request, state)
                    .await
                    .map_err(|rejection| {
                        ApiError::bad_request("malformed JSON body", Some(rejection.body_text()))
                    })?;
                Ok(Self(body))
            }
            BodyKind::Form => {
                let Form(body) = Form::<CreateMessageRequest>::from_request(request, state)
                    .await
                    .map_err(|rejection| {
                        ApiError::bad_request("malformed form body", Some(rejection.body_text()))
                    })?;
                Ok(Self(body))
            }
            BodyKind::Unsupported => Err(ApiError::bad_request(
                "unsupported body",
                Some(
                    "send application/x-www-form-urlencoded or application/json with username and content"
                        .to_string(),
                ),
            )),
        }
    }
}
