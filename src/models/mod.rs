mod question;

pub use question::{AnswerLetter, NUM_OPTIONS, Question};

/// Screen the terminal quiz is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Welcome,
    Quiz,
    Result,
}
