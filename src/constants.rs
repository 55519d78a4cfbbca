//! Application constants and configuration

pub const APP_NAME: &str = "Emotion Detector";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend used when neither settings nor the environment name one
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const BASE_URL_ENV: &str = "EMOTION_DETECTOR_URL";

pub const ENDPOINT_PATH: &str = "/emotionDetector";
pub const QUERY_PARAM: &str = "textToAnalyze";

// User-facing messages
pub const MSG_EMPTY_INPUT: &str = "Please enter some text to analyze.";
pub const MSG_PARSE_ERROR: &str = "Error parsing response.";
pub const MSG_UNPROCESSED: &str = "Error: Unable to process request.";
