use std::fmt;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    ContentError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::ContentError(msg) => write!(f, "Content error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
