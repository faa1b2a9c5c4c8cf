pub mod availability;
pub mod chat_client;
pub mod lessons;
pub mod models;
pub mod pdf;
pub mod quizzes;
pub mod session;
pub mod timetable;
