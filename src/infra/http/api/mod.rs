pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

pub use state::ApiState;

use axum::{
    Router,
    routing::{get, post},
};

pub fn build_api_router() -> Router<ApiState> {
    let messages = get(handlers::list_messages)
        .post(handlers::create_message)
        .delete(handlers::clear_messages);
    let message = post(handlers::create_message);

    Router::new()
        .route("/api/v1/messages", messages.clone())
        .route("/api/v1/messages/", messages)
        .route("/api/v1/message", message.clone())
        .route("/api/v1/message/", message)
}
