use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use noticeboard_api_types::{
    ClearMessagesResponse, CreatedMessageResponse, MessagePageResponse, MessageView, PageQuery,
};

use crate::application::board::{MessagePage, PostMessageCommand};
use crate::domain::entities::MessageRecord;

use super::error::ApiError;
use super::extract::MessageInput;
use super::state::ApiState;

fn message_to_api(record: MessageRecord) -> MessageView {
    MessageView {
        id: record.id,
        username: record.username,
        content: record.content,
    }
}

fn page_to_api(page: MessagePage) -> MessagePageResponse {
    MessagePageResponse {
        messages: page.items.into_iter().map(message_to_api).collect(),
        page: page.page,
        per_page: page.per_page,
        total_pages: page.total_pages,
    }
}

pub async fn list_messages(
    State(state): State<ApiState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        ApiError::bad_request("invalid query string", Some(rejection.body_text()))
    })?;

    let page = state.reader.page(query.page, query.per_page).await?;
    Ok(Json(page_to_api(page)))
}

pub async fn create_message(
    State(state): State<ApiState>,
    input: MessageInput,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .writer
        .post_message(PostMessageCommand::from(input))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedMessageResponse { id: record.id }),
    ))
}

pub async fn clear_messages(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.writer.clear_all().await?;

    Ok(Json(ClearMessagesResponse {
        message: "all messages deleted".to_string(),
        deleted,
    }))
}
