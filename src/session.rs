use chrono::Local;
use log::info;

use crate::models::history_model::{LessonPlanHistoryEntry, QuizHistoryEntry};
use crate::models::student_model::Student;

/// Fixed subject catalog offered by the registration form.
pub const SUBJECTS: [&str; 10] = [
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "English",
    "History",
    "Geography",
    "Computer Science",
    "Art",
    "Music",
];

pub const MAX_SUBJECTS: usize = 3;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Per-session in-memory state: registered students plus the quiz and lesson
/// plan histories. Owned by `main` and passed to every page handler; nothing
/// here survives the process.
#[derive(Debug, Default)]
pub struct SessionStore {
    pub students: Vec<Student>,
    pub quiz_history: Vec<QuizHistoryEntry>,
    pub lesson_plan_history: Vec<LessonPlanHistoryEntry>,
}

impl SessionStore {
    pub fn register_student(&mut self, student: Student) {
        info!("Registered student {}", student.name);
        self.students.push(student);
    }

    /// Remove exactly the student at `index`, keeping the others' order.
    pub fn delete_student(&mut self, index: usize) -> Option<Student> {
        if index < self.students.len() {
            let student = self.students.remove(index);
            info!("Deleted student {}", student.name);
            Some(student)
        } else {
            None
        }
    }

    pub fn record_quiz(&mut self, questions: String, answers: String, file_name: String) {
        self.quiz_history.push(QuizHistoryEntry {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            questions,
            answers,
            file_name,
        });
    }

    /// Number the next lesson plan will carry. One-based, so the file written
    /// at generation time matches the entry number shown (and re-exported) by
    /// the History page.
    pub fn next_lesson_plan_number(&self) -> usize {
        self.lesson_plan_history.len() + 1
    }

    pub fn record_lesson_plan(
        &mut self,
        lesson_plan: String,
        subject: String,
        topic: String,
        age: u32,
    ) {
        self.lesson_plan_history.push(LessonPlanHistoryEntry {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            lesson_plan,
            subject,
            topic,
            age,
        });
    }
}

/// Form validation performed before any model call is made.
pub fn validate_registration(
    name: &str,
    subjects: &[String],
    availability_text: &str,
) -> Result<(), String> {
    if name.trim().is_empty() || subjects.is_empty() || availability_text.trim().is_empty() {
        return Err("Please fill in all required fields.".to_string());
    }
    if subjects.len() > MAX_SUBJECTS {
        return Err(format!("Please select at most {MAX_SUBJECTS} subjects."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::models::student_model::{Availability, DayWindow, WEEKDAYS};

    fn student(name: &str) -> Student {
        let days = WEEKDAYS
            .iter()
            .map(|day| (day.to_string(), DayWindow::closed()))
            .collect::<BTreeMap<_, _>>();
        Student {
            name: name.to_string(),
            age: 12,
            subjects: vec!["Art".to_string()],
            availability: Availability(days),
        }
    }

    #[test]
    fn deleting_a_student_keeps_the_others_in_order() {
        let mut session = SessionStore::default();
        session.register_student(student("Ava"));
        session.register_student(student("Ben"));
        session.register_student(student("Cleo"));

        let deleted = session.delete_student(1).unwrap();
        assert_eq!(deleted.name, "Ben");
        let names: Vec<&str> = session.students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ava", "Cleo"]);
    }

    #[test]
    fn deleting_out_of_range_is_a_no_op() {
        let mut session = SessionStore::default();
        session.register_student(student("Ava"));
        assert!(session.delete_student(5).is_none());
        assert_eq!(session.students.len(), 1);
    }

    #[test]
    fn histories_are_append_only_and_keep_insertion_order() {
        let mut session = SessionStore::default();
        session.record_quiz("Q1.".into(), "A1.".into(), "first.pdf".into());
        session.record_quiz("Q1.".into(), "A1.".into(), "second.pdf".into());
        session.record_lesson_plan("plan".into(), "Art".into(), "Color".into(), 9);

        let files: Vec<&str> = session
            .quiz_history
            .iter()
            .map(|entry| entry.file_name.as_str())
            .collect();
        assert_eq!(files, vec!["first.pdf", "second.pdf"]);
        assert_eq!(session.lesson_plan_history.len(), 1);

        /* the view renders most-recent-first */
        let newest = session.quiz_history.iter().rev().next().unwrap();
        assert_eq!(newest.file_name, "second.pdf");
    }

    #[test]
    fn lesson_plan_numbering_is_one_based_and_follows_the_history() {
        let mut session = SessionStore::default();
        assert_eq!(session.next_lesson_plan_number(), 1);

        session.record_lesson_plan("plan".into(), "Art".into(), "Color".into(), 9);
        session.record_lesson_plan("plan".into(), "Music".into(), "Rhythm".into(), 11);

        /* entry N in the history listing is the plan saved as number N */
        assert_eq!(session.next_lesson_plan_number(), 3);
        assert_eq!(session.lesson_plan_history[2 - 1].subject, "Music");
    }

    #[test]
    fn registration_requires_every_field() {
        let subjects = vec!["Art".to_string()];
        assert!(validate_registration("", &subjects, "Monday 4pm").is_err());
        assert!(validate_registration("Ava", &[], "Monday 4pm").is_err());
        assert!(validate_registration("Ava", &subjects, "   ").is_err());
        assert!(validate_registration("Ava", &subjects, "Monday 4pm").is_ok());
    }

    #[test]
    fn registration_caps_subjects_at_three() {
        let four: Vec<String> = SUBJECTS[..4].iter().map(|s| s.to_string()).collect();
        assert!(validate_registration("Ava", &four, "Monday 4pm").is_err());
        let three: Vec<String> = SUBJECTS[..3].iter().map(|s| s.to_string()).collect();
        assert!(validate_registration("Ava", &three, "Monday 4pm").is_ok());
    }
}
