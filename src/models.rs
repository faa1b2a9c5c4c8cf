use std::path::PathBuf;

use clap::{command, Parser};
use serde::{Deserialize, Serialize};

pub mod history_model;
pub mod student_model;
pub mod timetable_model;

/// A model for describing ARGS of the tool.
/// Consists of:
/// 1. Path to config.json, that contains model endpoint configuration parameters.
/// 2. Path to the directory into which generated PDF and CSV exports are written.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, value_name = "FILE", default_value = "config.json")]
    pub config_json_path: PathBuf,
    #[arg(long, value_name = "DIR", default_value = "exports")]
    pub export_dir: PathBuf,
}

/// A model for describing configuration of the tool.
/// Consists of:
/// 1. Base URL of the hosted chat-completion endpoint
/// 2. Identifier of the model to invoke
/// 3. Optional API key (also accepted as TUTOR_API_KEY or OPENAI_API_KEY
///    from the process environment, or entered interactively when absent)
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub api_base: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: None,
        }
    }
}
