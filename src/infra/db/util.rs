use crate::application::repos::RepoError;

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        // Backstop for the `messages_*_not_empty` CHECK constraints. `NewMessage`
        // rejects empty fields first, so the board never sees this variant and
        // it is reported as a store failure if it ever does.
        sqlx::Error::Database(db) if db.message().contains("violates") => {
            RepoError::InvalidInput {
                message: db.message().to_string(),
            }
        }
        sqlx::Error::Database(db)
            if db
                .message()
                .contains("canceling statement due to user request") =>
        {
            RepoError::Timeout
        }
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        other => RepoError::from_persistence(other),
    }
}
