//! Turns free-text model output into validated quiz questions.
//!
//! The expected layout is the one the generation prompt asks for:
//!
//! ```text
//! Question 1: What is 2+2?
//! A) 3
//! B) 4
//! C) 5
//! D) 6
//! Answer: B
//! ```
//!
//! Models do not follow it reliably, so the parser is total: lines it does not
//! recognise are skipped and incomplete questions are dropped.

use tracing::debug;

use crate::models::{AnswerLetter, Question};

/// Upper bound on the number of questions returned from one response.
pub const MAX_QUESTIONS: usize = 5;

const QUESTION_PREFIX: &str = "question";
const ANSWER_PREFIX: &str = "answer";
const OPTION_MARKERS: [&str; 4] = ["a)", "b)", "c)", "d)"];

/// Parsed questions together with counts of what was thrown away.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub questions: Vec<Question>,
    /// Question blocks that failed validation.
    pub dropped: usize,
    /// Valid questions cut off by [`MAX_QUESTIONS`].
    pub truncated: usize,
    /// Non-empty lines that matched nothing or had no open question.
    pub ignored_lines: usize,
}

impl ParseReport {
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Parses `text` into at most [`MAX_QUESTIONS`] valid questions, in order.
///
/// Never fails; empty or unrecognisable input gives an empty list.
pub fn parse_quiz(text: &str) -> Vec<Question> {
    parse_quiz_report(text).questions
}

/// Same as [`parse_quiz`], also reporting how much input was discarded.
pub fn parse_quiz_report(text: &str) -> ParseReport {
    let mut drafts = Vec::new();
    let mut current: Option<Draft> = None;
    let mut ignored_lines = 0;

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match classify(line) {
            LineKind::Question(text) => {
                drafts.extend(current.take());
                current = Some(Draft::new(text));
            }
            LineKind::Option(text) => match current.as_mut() {
                Some(draft) => draft.options.push(text.to_string()),
                None => ignored_lines += 1,
            },
            LineKind::Answer(letter) => match current.as_mut() {
                Some(draft) => {
                    if letter.is_some() {
                        draft.answer = letter;
                    }
                }
                None => ignored_lines += 1,
            },
            LineKind::Other => ignored_lines += 1,
        }
    }
    drafts.extend(current);

    let total = drafts.len();
    let mut questions: Vec<Question> = drafts.into_iter().filter_map(Draft::validate).collect();
    let dropped = total - questions.len();
    let truncated = questions.len().saturating_sub(MAX_QUESTIONS);
    questions.truncate(MAX_QUESTIONS);

    debug!(
        accepted = questions.len(),
        dropped, truncated, ignored_lines, "parsed quiz response"
    );

    ParseReport {
        questions,
        dropped,
        truncated,
        ignored_lines,
    }
}

/// Question block being accumulated while scanning.
#[derive(Debug, Default)]
struct Draft {
    question: String,
    options: Vec<String>,
    answer: Option<char>,
}

impl Draft {
    fn new(question: &str) -> Self {
        Self {
            question: question.to_string(),
            ..Self::default()
        }
    }

    fn validate(self) -> Option<Question> {
        if self.question.is_empty() {
            return None;
        }
        let answer = self.answer.and_then(AnswerLetter::from_char)?;
        let options = <[String; 4]>::try_from(self.options).ok()?;

        Some(Question {
            question: self.question,
            options,
            answer,
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Question(&'a str),
    Option(&'a str),
    Answer(Option<char>),
    Other,
}

fn classify(line: &str) -> LineKind<'_> {
    if strip_prefix_ignore_case(line, QUESTION_PREFIX).is_some() {
        let text = match line.split_once(':') {
            Some((_, rest)) => rest,
            None => line,
        };
        return LineKind::Question(text.trim());
    }

    for marker in OPTION_MARKERS {
        if let Some(rest) = strip_prefix_ignore_case(line, marker) {
            return LineKind::Option(rest.trim());
        }
    }

    if let Some(rest) = strip_prefix_ignore_case(line, ANSWER_PREFIX) {
        if let Some(value) = rest.trim_start().strip_prefix(':') {
            return LineKind::Answer(answer_letter(value));
        }
    }

    LineKind::Other
}

/// First letter of the first token, lowercased. `"(B)"` and `"B)"` both give `b`.
fn answer_letter(value: &str) -> Option<char> {
    value
        .split_whitespace()
        .next()?
        .chars()
        .find(|c| c.is_alphabetic())
        .map(|c| c.to_ascii_lowercase())
}

fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        line.get(prefix.len()..)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(number: usize, answer: &str) -> String {
        format!(
            "Question {n}: Prompt {n}?\nA) one\nB) two\nC) three\nD) four\nAnswer: {answer}\n",
            n = number,
            answer = answer
        )
    }

    #[test]
    fn test_single_well_formed_question() {
        let input = "Question 1: What is 2+2?\nA) 3\nB) 4\nC) 5\nD) 6\nAnswer: B";
        let questions = parse_quiz(input);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "What is 2+2?");
        assert_eq!(questions[0].options, ["3", "4", "5", "6"]);
        assert_eq!(questions[0].answer, AnswerLetter::B);
        assert_eq!(questions[0].answer.as_char(), 'b');
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_quiz("").is_empty());
        assert!(parse_quiz("   \n\n\t\n").is_empty());
    }

    #[test]
    fn test_garbage_input() {
        let report = parse_quiz_report("\u{0}\u{1}garbage\n%%%\n\u{fffd}\u{fffd}");
        assert!(report.is_empty());
        assert_eq!(report.dropped, 0);
        assert_eq!(report.ignored_lines, 3);
    }

    #[test]
    fn test_missing_option_drops_question() {
        let input = "Question 1: Incomplete?\nA) one\nB) two\nC) three\nAnswer: A\n";
        let report = parse_quiz_report(input);
        assert!(report.questions.is_empty());
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn test_missing_or_invalid_answer_drops_question() {
        let missing = "Question 1: No answer?\nA) one\nB) two\nC) three\nD) four\n";
        assert!(parse_quiz(missing).is_empty());

        let invalid = "Question 1: Bad answer?\nA) one\nB) two\nC) three\nD) four\nAnswer: E\n";
        assert!(parse_quiz(invalid).is_empty());

        let blank = "Question 1: Blank answer?\nA) one\nB) two\nC) three\nD) four\nAnswer:\n";
        assert!(parse_quiz(blank).is_empty());
    }

    #[test]
    fn test_empty_question_text_dropped() {
        let input = "Question 1:\nA) one\nB) two\nC) three\nD) four\nAnswer: a\n";
        assert!(parse_quiz(input).is_empty());
    }

    #[test]
    fn test_extra_option_drops_question() {
        let input = "Question 1: Five options?\nA) 1\nB) 2\nC) 3\nD) 4\nA) 5\nAnswer: a\n";
        assert!(parse_quiz(input).is_empty());
    }

    #[test]
    fn test_consecutive_question_lines() {
        let input = format!("Question 1: Orphan?\n{}", block(2, "C"));
        let report = parse_quiz_report(&input);

        assert_eq!(report.questions.len(), 1);
        assert_eq!(report.questions[0].question, "Prompt 2?");
        assert_eq!(report.questions[0].answer, AnswerLetter::C);
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn test_caps_at_five_in_order() {
        let input: String = (1..=7).map(|n| block(n, "d")).collect();
        let report = parse_quiz_report(&input);

        assert_eq!(report.questions.len(), MAX_QUESTIONS);
        assert_eq!(report.truncated, 2);
        let prompts: Vec<&str> = report.questions.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(
            prompts,
            ["Prompt 1?", "Prompt 2?", "Prompt 3?", "Prompt 4?", "Prompt 5?"]
        );
    }

    #[test]
    fn test_invalid_blocks_do_not_count_towards_cap() {
        let mut input = String::from("Question 1: Broken?\nA) x\nAnswer: a\n");
        input.extend((2..=6).map(|n| block(n, "a")));
        let questions = parse_quiz(&input);

        assert_eq!(questions.len(), 5);
        assert_eq!(questions[0].question, "Prompt 2?");
        assert_eq!(questions[4].question, "Prompt 6?");
    }

    #[test]
    fn test_inconsistent_casing_and_noise() {
        let input = "Here is your quiz!\n\n  QUESTION 1:  Capital of France?  \n\
                     a) Berlin\nb)  Paris \nC) Rome\nd) Madrid\n\
                     Explanation: Paris is the capital.\nANSWER : (b)\n\nGood luck!";
        let report = parse_quiz_report(input);

        assert_eq!(report.questions.len(), 1);
        let question = &report.questions[0];
        assert_eq!(question.question, "Capital of France?");
        assert_eq!(question.options, ["Berlin", "Paris", "Rome", "Madrid"]);
        assert_eq!(question.answer, AnswerLetter::B);
        assert_eq!(report.ignored_lines, 3);
    }

    #[test]
    fn test_question_without_colon_keeps_whole_line() {
        let input = "Question 1 What is Rust?\nA) A game\nB) A language\nC) A fungus\nD) Oxide\nAnswer: B) A language";
        let questions = parse_quiz(input);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "Question 1 What is Rust?");
        assert_eq!(questions[0].answer, AnswerLetter::B);
    }

    #[test]
    fn test_lines_before_first_question_ignored() {
        let input = format!("A) stray\nAnswer: a\n{}", block(1, "a"));
        let report = parse_quiz_report(&input);
        assert_eq!(report.questions.len(), 1);
        assert_eq!(report.questions[0].options[0], "one");
        assert_eq!(report.ignored_lines, 2);
    }

    #[test]
    fn test_windows_line_endings() {
        let input = block(1, "c").replace('\n', "\r\n");
        let questions = parse_quiz(&input);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options[3], "four");
    }

    #[test]
    fn test_parse_is_idempotent() {
        let input: String = (1..=3).map(|n| block(n, "b")).collect();
        assert_eq!(parse_quiz(&input), parse_quiz(&input));
    }

    #[test]
    fn test_accepted_records_hold_invariants() {
        let input = format!(
            "{}Question 9: Short\nA) x\nB) y\nAnswer: z\n{}",
            block(1, "a"),
            block(2, "D")
        );
        for question in parse_quiz(&input) {
            assert_eq!(question.options.len(), 4);
            assert!(!question.question.is_empty());
            assert!(AnswerLetter::ALL.contains(&question.answer));
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("question 3: Why?"), LineKind::Question("Why?"));
        assert_eq!(classify("D)   last"), LineKind::Option("last"));
        assert_eq!(classify("Answer: c"), LineKind::Answer(Some('c')));
        assert_eq!(classify("Answers are below"), LineKind::Other);
        assert_eq!(classify("E) fifth"), LineKind::Other);
        assert_eq!(classify("é"), LineKind::Other);
    }
}
