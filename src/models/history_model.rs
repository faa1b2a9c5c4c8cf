//! Append-only history entries kept for the lifetime of a session.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuizHistoryEntry {
    pub timestamp: String,
    pub questions: String,
    pub answers: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LessonPlanHistoryEntry {
    pub timestamp: String,
    pub lesson_plan: String,
    pub subject: String,
    pub topic: String,
    pub age: u32,
}
