//! # doc-quiz
//!
//! Multiple-choice quizzes generated from document text.
//!
//! A generative model is prompted with the leading part of a document and
//! asked for five questions in a fixed textual layout. [`parse_quiz`] turns
//! that loosely formatted response into validated [`Question`]s, and
//! [`Quiz`] runs them in the terminal.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use doc_quiz::{Quiz, QuizError};
//!
//! fn main() -> Result<(), QuizError> {
//!     let raw = std::fs::read_to_string("model-output.txt")?;
//!
//!     // Fails with QuizError::EmptyQuiz if no question survived parsing
//!     let quiz = Quiz::from_model_output(&raw)?;
//!     quiz.run()?;
//!
//!     Ok(())
//! }
//! ```

mod app;
pub mod config;
mod data;
pub mod generator;
mod models;
pub mod parser;
pub mod terminal;
mod ui;

use std::io;
use std::path::Path;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use thiserror::Error;

pub use app::App;
pub use config::GeneratorConfig;
pub use data::{LoadError, load_questions_from_json, save_questions_to_json};
pub use generator::{GenerationError, QuizGenerator, TextGenerator};
pub use models::{AnswerLetter, AppState, Question};
pub use parser::{MAX_QUESTIONS, ParseReport, parse_quiz, parse_quiz_report};

/// Error type for quiz operations.
#[derive(Error, Debug)]
pub enum QuizError {
    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("quiz generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("could not write quiz JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no usable quiz could be generated")]
    EmptyQuiz,
}

/// A quiz instance that can be run in the terminal.
pub struct Quiz {
    app: App,
}

impl Quiz {
    /// Create a new quiz from a vector of questions.
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            app: App::with_questions(questions),
        }
    }

    /// Load a quiz from a JSON file.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, QuizError> {
        let questions = load_questions_from_json(path)?;
        Ok(Self::new(questions))
    }

    /// Build a quiz from raw model output.
    pub fn from_model_output(text: &str) -> Result<Self, QuizError> {
        Self::from_questions(parse_quiz(text))
    }

    /// Like [`Quiz::new`], but treats an empty list as an error.
    pub fn from_questions(questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptyQuiz);
        }
        Ok(Self::new(questions))
    }

    pub fn questions(&self) -> &[Question] {
        self.app.questions()
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits.
    pub fn run(mut self) -> Result<(), QuizError> {
        terminal::with_terminal(|term| run_event_loop(term, &mut self.app))
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

fn run_event_loop(terminal: &mut terminal::AppTerminal, app: &mut App) -> Result<(), QuizError> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if handle_input(app, key.code) {
                break;
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode) -> bool {
    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q')) {
        return true;
    }

    match (app.state, key) {
        (AppState::Welcome, KeyCode::Enter) => app.start_quiz(),
        (AppState::Quiz, KeyCode::Up | KeyCode::Char('k')) => app.select_previous_option(),
        (AppState::Quiz, KeyCode::Down | KeyCode::Char('j')) => app.select_next_option(),
        (AppState::Quiz, KeyCode::Enter | KeyCode::Char(' ')) => app.submit_answer(),
        (AppState::Result, KeyCode::Down | KeyCode::Char('j')) => app.scroll_results_down(),
        (AppState::Result, KeyCode::Up | KeyCode::Char('k')) => app.scroll_results_up(),
        (AppState::Result, KeyCode::Char('r') | KeyCode::Char('R')) => app.restart(),
        _ => {}
    }

    false
}
