use std::error::Error;

use log::info;

use crate::chat_client::{ChatModel, ChatRequest};

/// Only the text sent to the model is truncated, never the extraction itself.
pub const MAX_QUIZ_SOURCE_CHARS: usize = 10_000;

const QUIZ_SYSTEM_PROMPT: &str = "You are an expert at creating quizzes based on given content.";

/// Ask the model for a quiz over the extracted document text, in the
/// "Qn. / An." line format that [`split_questions_answers`] expects.
pub async fn generate_quiz(
    client: &impl ChatModel,
    content: &str,
    num_questions: u32,
) -> Result<String, Box<dyn Error>> {
    info!("Generating a quiz with {num_questions} question(s)");
    let truncated: String = content.chars().take(MAX_QUIZ_SOURCE_CHARS).collect();
    let request = ChatRequest {
        system: QUIZ_SYSTEM_PROMPT.to_string(),
        user: format!(
            "Create a quiz with {num_questions} questions based on the following content. \
             Format the output as follows:\n\n\
             Q1. [Question 1]\nA1. [Answer 1]\n\n\
             Q2. [Question 2]\nA2. [Answer 2]\n\n\
             ... and so on:\n\n{truncated}"
        ),
        max_tokens: Some(2000),
        temperature: 0.7,
    };
    client.complete(&request).await
}

/// Split a quiz reply into a questions string and an answers string by
/// line-prefix convention: a "Q" line opens a new question, an "A" line fills
/// the open question's answer, any other line is dropped. Order is preserved
/// and no count or format validation is performed.
pub fn split_questions_answers(quiz: &str) -> (String, String) {
    let mut questions: Vec<&str> = Vec::new();
    let mut answers: Vec<&str> = Vec::new();

    let mut current_q: Option<&str> = None;
    let mut current_a = "";

    for line in quiz.lines() {
        if line.starts_with('Q') {
            if let Some(question) = current_q.take() {
                questions.push(question);
                answers.push(current_a);
            }
            current_q = Some(line);
            current_a = "";
        } else if line.starts_with('A') {
            current_a = line;
        }
    }

    if let Some(question) = current_q {
        questions.push(question);
        answers.push(current_a);
    }

    (questions.join("\n\n"), answers.join("\n\n"))
}
