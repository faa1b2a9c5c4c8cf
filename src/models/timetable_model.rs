//! Models compatible with the JSON shape the timetable prompt requests.
use serde::{Deserialize, Serialize};

/// One scheduled meeting slot assigned to a student for a subject.
/// `start_time` stays the "HH:MM" string the model produced; it is parsed
/// only where a comparison is needed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimetableSession {
    pub day: String,
    pub start_time: String,
    pub student_name: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Timetable {
    pub sessions: Vec<TimetableSession>,
}
