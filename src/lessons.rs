use std::error::Error;

use log::info;

use crate::chat_client::{ChatModel, ChatRequest};

const LESSON_PLAN_SYSTEM_PROMPT: &str =
    "You are an experienced educator skilled in creating personalized lesson plans.";

/// Ask the model for an age-appropriate lesson plan. The reply is plain text
/// and is displayed and stored as-is.
pub async fn generate_lesson_plan(
    client: &impl ChatModel,
    age: u32,
    subject: &str,
    topic: &str,
) -> Result<String, Box<dyn Error>> {
    info!("Generating a lesson plan for {subject} / {topic} (age {age})");
    let request = ChatRequest {
        system: LESSON_PLAN_SYSTEM_PROMPT.to_string(),
        user: format!(
            "Create a detailed, age-appropriate lesson plan for a {age}-year-old \
             learning about the topic '{topic}' within the subject of {subject}. \
             Include learning objectives, activities, and assessment methods."
        ),
        max_tokens: Some(1000),
        temperature: 0.7,
    };
    client.complete(&request).await
}
