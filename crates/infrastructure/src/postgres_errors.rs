use tasktrail_core::AppError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Maps a failed entity-store write into the application error taxonomy.
pub(crate) fn map_write_error(error: sqlx::Error, operation: &str, conflict_message: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error {
        match database_error.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return AppError::Conflict(conflict_message.to_owned()),
            Some(FOREIGN_KEY_VIOLATION) => {
                return AppError::Conflict("record is still referenced".to_owned());
            }
            _ => {}
        }
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

pub(crate) fn map_read_error(error: sqlx::Error, operation: &str) -> AppError {
    AppError::Internal(format!("failed to {operation}: {error}"))
}
