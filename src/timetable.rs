use std::collections::BTreeMap;
use std::error::Error;

use log::{info, warn};
use serde_json::json;

use crate::chat_client::{extract_json_payload, ChatModel, ChatRequest};
use crate::models::student_model::{Student, WEEKDAYS};
use crate::models::timetable_model::{Timetable, TimetableSession};

const TIMETABLE_SYSTEM_PROMPT: &str = r#"Create an optimal weekly timetable following these rules:
1. Each subject has exactly 2 sessions per week
2. Each session is 60 minutes long
3. Sessions must be scheduled during both student and teacher availability
4. No time conflicts between students
5. Maximum 8 hours of teaching per day
6. Include 15-minute breaks between sessions
7. Try to spread subjects evenly across the week

Return the timetable in this JSON format:
{
    "sessions": [
        {
            "day": "Monday",
            "start_time": "14:00",
            "student_name": "student name",
            "subject": "subject name"
        }
    ]
}
Reply with the JSON object only."#;

/// Ask the model for a weekly timetable over the registered students and the
/// teacher's free-text availability. The scheduling rules live only in the
/// prompt; the reply is schema-checked, then audited (not enforced) by
/// [`audit_sessions`].
pub async fn generate_timetable(
    client: &impl ChatModel,
    students: &[Student],
    teacher_availability: &str,
) -> Result<Timetable, Box<dyn Error>> {
    info!("Requesting a timetable for {} student(s)", students.len());
    let context = build_context(students, teacher_availability);
    let request = ChatRequest {
        system: TIMETABLE_SYSTEM_PROMPT.to_string(),
        user: serde_json::to_string(&context)?,
        max_tokens: None,
        temperature: 0.5,
    };
    let reply = client.complete(&request).await?;
    timetable_from_reply(&reply)
}

/// Typed parse of the reply; a malformed shape is rejected here rather than
/// failing downstream on missing keys.
pub fn timetable_from_reply(reply: &str) -> Result<Timetable, Box<dyn Error>> {
    Ok(serde_json::from_str(extract_json_payload(reply))?)
}

fn build_context(students: &[Student], teacher_availability: &str) -> serde_json::Value {
    let students_data: Vec<serde_json::Value> = students
        .iter()
        .map(|student| {
            let availability: serde_json::Map<String, serde_json::Value> = student
                .availability
                .days()
                .map(|(day, window)| {
                    let (start, end) = if window.available {
                        (
                            window.start.format("%H:%M").to_string(),
                            window.end.format("%H:%M").to_string(),
                        )
                    } else {
                        ("00:00".to_string(), "00:00".to_string())
                    };
                    (
                        day.to_string(),
                        json!({"available": window.available, "start": start, "end": end}),
                    )
                })
                .collect();
            json!({
                "name": student.name,
                "subjects": student.subjects,
                "availability": availability,
            })
        })
        .collect();

    json!({
        "students": students_data,
        "teacher_availability": teacher_availability,
        "constraints": {
            "sessions_per_subject": 2,
            "session_duration_minutes": 60,
            "break_duration_minutes": 15,
            "max_hours_per_day": 8,
        },
    })
}

/// Report constraint violations the model let through. The schedule is kept
/// as delivered; findings are logged and returned for display.
pub fn audit_sessions(timetable: &Timetable) -> Vec<String> {
    let mut findings = Vec::new();

    let mut slots: BTreeMap<(&str, &str), u32> = BTreeMap::new();
    for session in &timetable.sessions {
        *slots
            .entry((session.day.as_str(), session.start_time.as_str()))
            .or_insert(0) += 1;
    }
    for ((day, time), count) in slots {
        if count > 1 {
            findings.push(format!("{count} sessions share the {day} {time} slot"));
        }
    }

    let mut per_subject: BTreeMap<(&str, &str), u32> = BTreeMap::new();
    for session in &timetable.sessions {
        *per_subject
            .entry((session.student_name.as_str(), session.subject.as_str()))
            .or_insert(0) += 1;
    }
    for ((student, subject), count) in per_subject {
        if count > 2 {
            findings.push(format!(
                "{student} has {count} {subject} sessions this week (at most 2 were requested)"
            ));
        }
    }

    for finding in &findings {
        warn!("{finding}");
    }
    findings
}

/// Sessions scheduled on one day, in reply order.
pub fn sessions_for_day<'a>(timetable: &'a Timetable, day: &str) -> Vec<&'a TimetableSession> {
    timetable
        .sessions
        .iter()
        .filter(|session| session.day == day)
        .collect()
}

/// Session counts per student, most loaded first.
pub fn sessions_per_student(timetable: &Timetable) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for session in &timetable.sessions {
        *counts.entry(session.student_name.as_str()).or_insert(0) += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    out.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(&right.0)));
    out
}

/// Session counts per weekday, Monday..Sunday, days without sessions skipped.
pub fn sessions_per_day(timetable: &Timetable) -> Vec<(String, usize)> {
    WEEKDAYS
        .iter()
        .filter_map(|day| {
            let count = sessions_for_day(timetable, day).len();
            (count > 0).then(|| (day.to_string(), count))
        })
        .collect()
}

/// Comma-separated export of all sessions, one row per session.
pub fn sessions_to_csv(timetable: &Timetable) -> Result<String, Box<dyn Error>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for session in &timetable.sessions {
        writer.serialize(session)?;
    }
    Ok(String::from_utf8(writer.into_inner()?)?)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveTime;

    use super::*;
    use crate::models::student_model::{Availability, DayWindow};

    fn session(day: &str, time: &str, student: &str, subject: &str) -> TimetableSession {
        TimetableSession {
            day: day.to_string(),
            start_time: time.to_string(),
            student_name: student.to_string(),
            subject: subject.to_string(),
        }
    }

    fn sample_timetable() -> Timetable {
        Timetable {
            sessions: vec![
                session("Monday", "16:00", "Ava", "Mathematics"),
                session("Monday", "17:15", "Ava", "Art"),
                session("Wednesday", "16:00", "Ben", "Physics"),
            ],
        }
    }

    #[test]
    fn reply_parses_into_typed_sessions() {
        let reply = r#"{"sessions": [
            {"day": "Monday", "start_time": "14:00", "student_name": "Ava", "subject": "Art"}
        ]}"#;
        let timetable = timetable_from_reply(reply).unwrap();
        assert_eq!(timetable.sessions.len(), 1);
        assert_eq!(timetable.sessions[0].student_name, "Ava");
    }

    #[test]
    fn malformed_reply_shape_is_rejected() {
        assert!(timetable_from_reply("{\"schedule\": []}").is_err());
        assert!(timetable_from_reply("no json at all").is_err());
        assert!(timetable_from_reply("{\"sessions\": [{\"day\": \"Monday\"}]}").is_err());
    }

    #[test]
    fn audit_flags_shared_slots_and_subject_overruns() {
        let timetable = Timetable {
            sessions: vec![
                session("Monday", "16:00", "Ava", "Art"),
                session("Monday", "16:00", "Ben", "Physics"),
                session("Tuesday", "10:00", "Ava", "Art"),
                session("Thursday", "10:00", "Ava", "Art"),
            ],
        };
        let findings = audit_sessions(&timetable);
        assert_eq!(findings.len(), 2);
        assert!(findings[0].contains("2 sessions share the Monday 16:00 slot"));
        assert!(findings[1].contains("Ava has 3 Art sessions"));
    }

    #[test]
    fn audit_accepts_a_conforming_schedule() {
        assert!(audit_sessions(&sample_timetable()).is_empty());
    }

    #[test]
    fn csv_export_has_header_and_one_row_per_session() {
        let csv = sessions_to_csv(&sample_timetable()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("day,start_time,student_name,subject"));
        assert_eq!(lines.next(), Some("Monday,16:00,Ava,Mathematics"));
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn stats_group_by_student_and_day() {
        let timetable = sample_timetable();
        assert_eq!(
            sessions_per_student(&timetable),
            vec![("Ava".to_string(), 2), ("Ben".to_string(), 1)]
        );
        assert_eq!(
            sessions_per_day(&timetable),
            vec![("Monday".to_string(), 2), ("Wednesday".to_string(), 1)]
        );
    }

    #[test]
    fn context_formats_availability_as_clock_strings() {
        let mut days = BTreeMap::new();
        for day in WEEKDAYS {
            days.insert(day.to_string(), DayWindow::closed());
        }
        days.insert(
            "Monday".to_string(),
            DayWindow {
                available: true,
                start: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            },
        );
        let students = vec![Student {
            name: "Ava".to_string(),
            age: 12,
            subjects: vec!["Mathematics".to_string(), "Art".to_string()],
            availability: Availability(days),
        }];

        let context = build_context(&students, "Monday to Friday 9am-5pm");
        let monday = &context["students"][0]["availability"]["Monday"];
        assert_eq!(monday["available"], json!(true));
        assert_eq!(monday["start"], json!("16:00"));
        assert_eq!(monday["end"], json!("18:00"));
        let sunday = &context["students"][0]["availability"]["Sunday"];
        assert_eq!(sunday["start"], json!("00:00"));
        assert_eq!(context["constraints"]["sessions_per_subject"], json!(2));
        assert_eq!(
            context["teacher_availability"],
            json!("Monday to Friday 9am-5pm")
        );
    }
}
