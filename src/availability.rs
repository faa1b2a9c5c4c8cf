use std::collections::BTreeMap;
use std::error::Error;

use chrono::NaiveTime;
use log::info;
use serde::Deserialize;

use crate::chat_client::{extract_json_payload, ChatModel, ChatRequest};
use crate::models::student_model::{Availability, DayWindow, WEEKDAYS};

const AVAILABILITY_SYSTEM_PROMPT: &str = r#"Convert the given availability text into a JSON object with this structure:
{
    "Monday": {"available": true/false, "start": "HH:MM", "end": "HH:MM"},
    "Tuesday": {"available": true/false, "start": "HH:MM", "end": "HH:MM"},
    "Wednesday": {"available": true/false, "start": "HH:MM", "end": "HH:MM"},
    "Thursday": {"available": true/false, "start": "HH:MM", "end": "HH:MM"},
    "Friday": {"available": true/false, "start": "HH:MM", "end": "HH:MM"},
    "Saturday": {"available": true/false, "start": "HH:MM", "end": "HH:MM"},
    "Sunday": {"available": true/false, "start": "HH:MM", "end": "HH:MM"}
}
For days not mentioned, set "available": false and times to "00:00".
Reply with the JSON object only."#;

/// Wire shape of one day in the model's reply.
#[derive(Deserialize)]
struct RawDayWindow {
    available: bool,
    start: String,
    end: String,
}

/// Ask the model to convert fuzzy availability text into the fixed 7-day map.
/// Any failure (transport, bad JSON, missing weekday, bad time format) aborts
/// the registration; there is no partial result.
pub async fn parse_availability(
    client: &impl ChatModel,
    availability_text: &str,
) -> Result<Availability, Box<dyn Error>> {
    info!("Parsing availability text through the model");
    let request = ChatRequest {
        system: AVAILABILITY_SYSTEM_PROMPT.to_string(),
        user: format!("Parse this availability: {availability_text}"),
        max_tokens: None,
        temperature: 0.0,
    };
    let reply = client.complete(&request).await?;
    availability_from_reply(&reply)
}

/// Typed validation of the reply: all seven weekday keys must be present and
/// available days must carry parseable "HH:MM" times. Unavailable days are
/// normalized to a zeroed window whatever times the model wrote.
pub fn availability_from_reply(reply: &str) -> Result<Availability, Box<dyn Error>> {
    let raw: BTreeMap<String, RawDayWindow> = serde_json::from_str(extract_json_payload(reply))?;

    let mut days = BTreeMap::new();
    for day in WEEKDAYS {
        let Some(window) = raw.get(day) else {
            return Err(format!("availability reply is missing {day}").into());
        };
        let parsed = if window.available {
            DayWindow {
                available: true,
                start: parse_time(&window.start)?,
                end: parse_time(&window.end)?,
            }
        } else {
            DayWindow::closed()
        };
        days.insert(day.to_string(), parsed);
    }

    Ok(Availability(days))
}

fn parse_time(value: &str) -> Result<NaiveTime, Box<dyn Error>> {
    Ok(NaiveTime::parse_from_str(value, "%H:%M")?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday_only_reply() -> String {
        let mut days = Vec::new();
        for day in WEEKDAYS {
            if day == "Monday" {
                days.push(format!(
                    "\"{day}\": {{\"available\": true, \"start\": \"16:00\", \"end\": \"18:00\"}}"
                ));
            } else {
                days.push(format!(
                    "\"{day}\": {{\"available\": false, \"start\": \"00:00\", \"end\": \"00:00\"}}"
                ));
            }
        }
        format!("{{{}}}", days.join(", "))
    }

    #[test]
    fn reply_with_all_days_parses_into_seven_windows() {
        let availability = availability_from_reply(&monday_only_reply()).unwrap();
        assert_eq!(availability.days().count(), 7);

        let monday = availability.window("Monday").unwrap();
        assert!(monday.available);
        assert_eq!(monday.start, NaiveTime::from_hms_opt(16, 0, 0).unwrap());
        assert_eq!(monday.end, NaiveTime::from_hms_opt(18, 0, 0).unwrap());

        for day in WEEKDAYS.iter().filter(|day| **day != "Monday") {
            let window = availability.window(day).unwrap();
            assert_eq!(*window, DayWindow::closed());
        }
    }

    #[test]
    fn unavailable_days_are_zeroed_whatever_the_model_wrote() {
        let reply = monday_only_reply().replace(
            "\"Friday\": {\"available\": false, \"start\": \"00:00\", \"end\": \"00:00\"}",
            "\"Friday\": {\"available\": false, \"start\": \"09:30\", \"end\": \"11:00\"}",
        );
        let availability = availability_from_reply(&reply).unwrap();
        assert_eq!(*availability.window("Friday").unwrap(), DayWindow::closed());
    }

    #[test]
    fn fenced_reply_is_accepted() {
        let fenced = format!("```json\n{}\n```", monday_only_reply());
        assert!(availability_from_reply(&fenced).is_ok());
    }

    #[test]
    fn missing_weekday_is_rejected() {
        let reply = "{\"Monday\": {\"available\": true, \"start\": \"10:00\", \"end\": \"12:00\"}}";
        let error = availability_from_reply(reply).unwrap_err();
        assert!(error.to_string().contains("missing Tuesday"));
    }

    #[test]
    fn unparseable_time_is_rejected() {
        let reply = monday_only_reply().replace("16:00", "4pm");
        assert!(availability_from_reply(&reply).is_err());
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(availability_from_reply("sure, here is the schedule").is_err());
    }
}
