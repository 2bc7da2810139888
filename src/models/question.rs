use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of answer options every question carries.
pub const NUM_OPTIONS: usize = 4;

/// Letter identifying the correct option by position.
///
/// Serialized as the lowercase letter (`"a"` to `"d"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    pub const ALL: [AnswerLetter; NUM_OPTIONS] =
        [AnswerLetter::A, AnswerLetter::B, AnswerLetter::C, AnswerLetter::D];

    /// Case-insensitive lookup; anything other than a-d yields `None`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a' | 'A' => Some(AnswerLetter::A),
            'b' | 'B' => Some(AnswerLetter::B),
            'c' | 'C' => Some(AnswerLetter::C),
            'd' | 'D' => Some(AnswerLetter::D),
            _ => None,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(AnswerLetter::A),
            1 => Some(AnswerLetter::B),
            2 => Some(AnswerLetter::C),
            3 => Some(AnswerLetter::D),
            _ => None,
        }
    }

    /// Position of the option this letter refers to.
    pub fn index(self) -> usize {
        match self {
            AnswerLetter::A => 0,
            AnswerLetter::B => 1,
            AnswerLetter::C => 2,
            AnswerLetter::D => 3,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            AnswerLetter::A => 'a',
            AnswerLetter::B => 'b',
            AnswerLetter::C => 'c',
            AnswerLetter::D => 'd',
        }
    }

    /// Uppercase form used when rendering options.
    pub fn label(self) -> char {
        self.as_char().to_ascii_uppercase()
    }
}

impl fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: [String; NUM_OPTIONS],
    pub answer: AnswerLetter,
}

impl Question {
    pub fn correct_index(&self) -> usize {
        self.answer.index()
    }

    /// Scores a selection by option position.
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_index()
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index()]
    }
}
