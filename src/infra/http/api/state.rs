use std::sync::Arc;

use crate::application::board::{BoardReader, BoardWriter};
use crate::application::repos::MessagesRepo;

#[derive(Clone)]
pub struct ApiState {
    pub reader: Arc<BoardReader>,
    pub writer: Arc<BoardWriter>,
    /// Used directly only by the health check.
    pub messages: Arc<dyn MessagesRepo>,
}
