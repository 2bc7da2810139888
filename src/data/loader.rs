use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::models::Question;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not access {path}: {source}")]
    Io { path: String, source: io::Error },

    #[error("invalid quiz JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("quiz must contain at least one question")]
    Empty,

    #[error("question {index} has no text")]
    InvalidQuestion { index: usize },
}

/// Loads a quiz saved as a JSON array of questions.
pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let questions: Vec<Question> = serde_json::from_str(&json_content)?;

    if questions.is_empty() {
        return Err(LoadError::Empty);
    }
    if let Some(index) = questions.iter().position(|q| q.question.trim().is_empty()) {
        return Err(LoadError::InvalidQuestion { index: index + 1 });
    }

    info!(count = questions.len(), "loaded quiz from {}", path.display());
    Ok(questions)
}

pub fn save_questions_to_json<P: AsRef<Path>>(
    path: P,
    questions: &[Question],
) -> Result<(), LoadError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(questions)?;

    fs::write(path, json).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    info!(count = questions.len(), "saved quiz to {}", path.display());
    Ok(())
}
