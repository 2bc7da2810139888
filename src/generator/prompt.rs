/// Number of questions requested from the model.
pub const QUESTIONS_PER_QUIZ: usize = 5;

/// Number of leading document chunks embedded in the prompt.
pub const CONTEXT_CHUNKS: usize = 3;

/// Joins the first [`CONTEXT_CHUNKS`] chunks into the prompt context.
pub fn build_context(chunks: &[String]) -> String {
    chunks
        .iter()
        .take(CONTEXT_CHUNKS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking for `count` questions in the layout the parser reads.
pub fn build_prompt(context: &str, count: usize) -> String {
    format!(
        "Generate {count} MCQ questions from this context:\n\
         {context}\n\
         \n\
         Follow this EXACT format:\n\
         \n\
         Question 1: [question text]\n\
         A) [option 1]\n\
         B) [option 2]\n\
         C) [option 3]\n\
         D) [option 4]\n\
         Answer: [letter]\n\
         \n\
         [Repeat for Questions 2-{count}]"
    )
}
