mod loader;

pub use loader::{LoadError, load_questions_from_json, save_questions_to_json};
