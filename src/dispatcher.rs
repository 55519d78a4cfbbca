//! Request dispatcher: one analysis request/response cycle rendered through a
//! display port.
//!
//! The cycle is `idle -> loading -> resolved`. Loading is hidden exactly once,
//! after the transport resolves and before anything is rendered.

use crate::client::AnalysisTransport;
use crate::constants::{ENDPOINT_PATH, QUERY_PARAM};
use crate::types::*;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Where the dispatcher reports progress and results
pub trait DisplayPort {
    fn show_loading(&mut self);
    fn hide_loading(&mut self);
    fn clear_message(&mut self);
    fn render_message(&mut self, kind: MessageKind, text: &str);
    fn render_emotions(&mut self, _scores: &EmotionScores) {}
}

/// Path and query for analyzing `text`. The text is sent as typed.
pub fn request_path(text: &str) -> String {
    format!("{}?{}={}", ENDPOINT_PATH, QUERY_PARAM, urlencoding::encode(text))
}

/// Map a completed HTTP exchange to an outcome
pub fn classify(raw: &RawResponse) -> Outcome {
    if raw.status == 200 {
        return match parse_success(&raw.body) {
            Some((message, emotions)) => Outcome::Analyzed { message, emotions },
            None => Outcome::Failed(Failure::Parse),
        };
    }

    if raw.status >= 400 {
        let failure = match serde_json::from_str::<Value>(&raw.body) {
            Ok(Value::Null) | Err(_) => Failure::Status(raw.status_text.clone()),
            Ok(value) => match value.get("error").and_then(truthy_text) {
                Some(text) => Failure::Server(text),
                None => Failure::Unprocessed,
            },
        };
        return Outcome::Failed(failure);
    }

    Outcome::Failed(Failure::Unprocessed)
}

/// `None` only when the body is not JSON or is JSON `null`. A missing
/// `response` field still succeeds and reads "undefined".
fn parse_success(body: &str) -> Option<(String, Option<EmotionScores>)> {
    let value: Value = serde_json::from_str(body).ok()?;
    if value.is_null() {
        return None;
    }
    let message = display_text(value.get("response"));
    let emotions = value
        .get("emotions")
        .and_then(|e| serde_json::from_value::<EmotionScores>(e.clone()).ok());
    Some((message, emotions))
}

/// String form of a field value the way a browser interpolates it
fn display_text(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_text(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

/// Text for a JSON value that would count as set: non-empty strings, non-zero
/// numbers, `true`, arrays and objects.
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        _ => None,
    }
}

fn render<D: DisplayPort + ?Sized>(display: &mut D, outcome: &Outcome) {
    let (kind, text) = outcome.message();
    display.render_message(kind, &text);
    if let Outcome::Analyzed {
        emotions: Some(scores),
        ..
    } = outcome
    {
        display.render_emotions(scores);
    }
}

pub struct Dispatcher<T> {
    transport: T,
}

impl<T: AnalysisTransport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Run one analysis cycle for `text`, rendering exactly one message.
    pub async fn run_analysis<D: DisplayPort + Send>(&self, text: &str, display: &mut D) -> Outcome {
        if text.trim().is_empty() {
            debug!("Empty input, no request sent");
            let outcome = Outcome::EmptyInput;
            render(display, &outcome);
            return outcome;
        }

        display.show_loading();
        display.clear_message();

        let path = request_path(text);
        info!(chars = text.chars().count(), "Dispatching analysis request");
        let result = self.transport.get(&path).await;

        display.hide_loading();

        let outcome = match result {
            Ok(raw) => {
                debug!(status = raw.status, "Analysis response received");
                classify(&raw)
            }
            Err(e) => {
                warn!(error = %e, "Analysis request failed");
                Outcome::Failed(Failure::Unprocessed)
            }
        };

        match &outcome {
            Outcome::Failed(failure) => warn!(failure = ?failure, "Analysis unsuccessful"),
            _ => info!("Analysis complete"),
        }

        render(display, &outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::error::{ClientError, Result};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        ShowLoading,
        HideLoading,
        Clear,
        Message(MessageKind, String),
        Emotions(EmotionScores),
    }

    #[derive(Default)]
    struct RecordingDisplay {
        events: Vec<Event>,
    }

    impl RecordingDisplay {
        fn messages(&self) -> Vec<(MessageKind, String)> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Message(kind, text) => Some((*kind, text.clone())),
                    _ => None,
                })
                .collect()
        }

        fn count(&self, event: &Event) -> usize {
            self.events.iter().filter(|e| *e == event).count()
        }
    }

    impl DisplayPort for RecordingDisplay {
        fn show_loading(&mut self) {
            self.events.push(Event::ShowLoading);
        }
        fn hide_loading(&mut self) {
            self.events.push(Event::HideLoading);
        }
        fn clear_message(&mut self) {
            self.events.push(Event::Clear);
        }
        fn render_message(&mut self, kind: MessageKind, text: &str) {
            self.events.push(Event::Message(kind, text.to_string()));
        }
        fn render_emotions(&mut self, scores: &EmotionScores) {
            self.events.push(Event::Emotions(scores.clone()));
        }
    }

    /// Replies with a canned response (or a refused connection) and records paths
    struct FakeTransport {
        reply: Option<RawResponse>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl FakeTransport {
        fn replying(status: u16, status_text: &str, body: &str) -> Self {
            Self {
                reply: Some(RawResponse::new(status, status_text, body)),
                requests: Arc::default(),
            }
        }

        fn unreachable() -> Self {
            Self {
                reply: None,
                requests: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl AnalysisTransport for FakeTransport {
        async fn get(&self, path_and_query: &str) -> Result<RawResponse> {
            self.requests.lock().unwrap().push(path_and_query.to_string());
            self.reply.clone().ok_or_else(|| ClientError::InvalidUrl {
                url: "http://127.0.0.1:1".to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }

    async fn run(transport: FakeTransport, text: &str) -> (Outcome, RecordingDisplay, Vec<String>) {
        let requests = transport.requests.clone();
        let dispatcher = Dispatcher::new(transport);
        let mut display = RecordingDisplay::default();
        let outcome = dispatcher.run_analysis(text, &mut display).await;
        let requests = requests.lock().unwrap().clone();
        (outcome, display, requests)
    }

    #[test]
    fn request_path_percent_encodes_text() {
        assert_eq!(
            request_path("I am happy"),
            "/emotionDetector?textToAnalyze=I%20am%20happy"
        );
        assert_eq!(
            request_path("a&b=c?"),
            "/emotionDetector?textToAnalyze=a%26b%3Dc%3F"
        );
    }

    #[tokio::test]
    async fn blank_input_warns_without_request() {
        for text in ["", "   ", "\n\t "] {
            let (outcome, display, requests) = run(FakeTransport::replying(200, "OK", "{}"), text).await;
            assert_eq!(outcome, Outcome::EmptyInput);
            assert!(requests.is_empty());
            assert_eq!(
                display.events,
                vec![Event::Message(MessageKind::Warning, MSG_EMPTY_INPUT.to_string())]
            );
        }
    }

    #[tokio::test]
    async fn issues_get_for_happy_text() {
        let (_, _, requests) = run(
            FakeTransport::replying(200, "OK", r#"{"response":"positive"}"#),
            "I am happy",
        )
        .await;
        assert_eq!(requests, vec!["/emotionDetector?textToAnalyze=I%20am%20happy"]);
    }

    #[tokio::test]
    async fn success_renders_response_field() {
        let (outcome, display, _) = run(
            FakeTransport::replying(200, "OK", r#"{"response":"positive"}"#),
            "I am happy",
        )
        .await;

        assert_eq!(
            outcome,
            Outcome::Analyzed {
                message: "positive".to_string(),
                emotions: None
            }
        );
        assert_eq!(
            display.events,
            vec![
                Event::ShowLoading,
                Event::Clear,
                Event::HideLoading,
                Event::Message(MessageKind::Success, "positive".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn success_with_emotions_renders_breakdown() {
        let body = r#"{
            "response": "The dominant emotion is joy.",
            "emotions": {"anger": 0.01, "disgust": 0.02, "fear": 0.03, "joy": 0.9, "sadness": null, "dominant_emotion": "joy"}
        }"#;
        let (_, display, _) = run(FakeTransport::replying(200, "OK", body), "I love this").await;

        let scores = EmotionScores {
            anger: Some(0.01),
            disgust: Some(0.02),
            fear: Some(0.03),
            joy: Some(0.9),
            sadness: None,
            dominant_emotion: Some("joy".to_string()),
        };
        assert_eq!(
            display.events.last(),
            Some(&Event::Emotions(scores.clone()))
        );
        assert_eq!(scores.entries().len(), 4);
    }

    #[tokio::test]
    async fn invalid_json_on_success_is_parse_error() {
        let (outcome, display, _) = run(FakeTransport::replying(200, "OK", "<html>oops"), "hi").await;
        assert_eq!(outcome, Outcome::Failed(Failure::Parse));
        assert_eq!(
            display.messages(),
            vec![(MessageKind::Error, MSG_PARSE_ERROR.to_string())]
        );
    }

    #[tokio::test]
    async fn server_error_field_is_displayed() {
        let (outcome, display, _) = run(
            FakeTransport::replying(400, "Bad Request", r#"{"error":"invalid text"}"#),
            "???",
        )
        .await;
        assert_eq!(outcome, Outcome::Failed(Failure::Server("invalid text".to_string())));
        assert_eq!(
            display.messages(),
            vec![(MessageKind::Error, "invalid text".to_string())]
        );
    }

    #[tokio::test]
    async fn unparseable_error_body_shows_status_text() {
        let (_, display, _) = run(
            FakeTransport::replying(500, "Internal Server Error", "Traceback (most recent call last)"),
            "hello",
        )
        .await;
        assert_eq!(
            display.messages(),
            vec![(MessageKind::Error, "Error: Internal Server Error".to_string())]
        );
    }

    #[tokio::test]
    async fn network_failure_renders_generic_error() {
        let (outcome, display, requests) = run(FakeTransport::unreachable(), "hello").await;
        assert_eq!(requests.len(), 1);
        assert_eq!(outcome, Outcome::Failed(Failure::Unprocessed));
        assert_eq!(
            display.events,
            vec![
                Event::ShowLoading,
                Event::Clear,
                Event::HideLoading,
                Event::Message(MessageKind::Error, MSG_UNPROCESSED.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn loading_toggled_once_per_request() {
        let cases = [
            FakeTransport::replying(200, "OK", r#"{"response":"ok"}"#),
            FakeTransport::replying(200, "OK", "nope"),
            FakeTransport::replying(404, "Not Found", "missing"),
            FakeTransport::replying(302, "Found", ""),
            FakeTransport::unreachable(),
        ];
        for transport in cases {
            let (_, display, _) = run(transport, "text").await;
            assert_eq!(display.count(&Event::ShowLoading), 1);
            assert_eq!(display.count(&Event::HideLoading), 1);
            assert_eq!(display.messages().len(), 1);

            let hide = display.events.iter().position(|e| *e == Event::HideLoading).unwrap();
            let msg = display
                .events
                .iter()
                .position(|e| matches!(e, Event::Message(..)))
                .unwrap();
            assert!(hide < msg);
        }
    }

    #[test]
    fn error_status_json_without_error_field_is_generic() {
        for body in [r#"{"detail":"x"}"#, r#"{"error":""}"#, r#"{"error":null}"#, "42"] {
            let raw = RawResponse::new(422, "Unprocessable Entity", body);
            assert_eq!(classify(&raw), Outcome::Failed(Failure::Unprocessed), "body: {}", body);
        }
    }

    #[test]
    fn error_status_with_null_body_uses_status_text() {
        let raw = RawResponse::new(503, "Service Unavailable", "null");
        assert_eq!(
            classify(&raw),
            Outcome::Failed(Failure::Status("Service Unavailable".to_string()))
        );
    }

    #[test]
    fn non_error_non_200_is_generic() {
        for status in [201, 204, 301, 304] {
            let raw = RawResponse::new(status, "", r#"{"response":"ignored"}"#);
            assert_eq!(classify(&raw), Outcome::Failed(Failure::Unprocessed));
        }
    }

    #[test]
    fn success_without_response_field_reads_undefined() {
        let cases = [
            (r#"{"emotions":{}}"#, "undefined"),
            ("[]", "undefined"),
            ("42", "undefined"),
            (r#"{"response":null}"#, "null"),
        ];
        for (body, expected) in cases {
            let raw = RawResponse::new(200, "OK", body);
            assert_eq!(
                classify(&raw),
                Outcome::Analyzed {
                    message: expected.to_string(),
                    emotions: None
                },
                "body: {}",
                body
            );
        }
    }

    #[test]
    fn null_body_on_success_is_parse_error() {
        let raw = RawResponse::new(200, "OK", "null");
        assert_eq!(classify(&raw), Outcome::Failed(Failure::Parse));
    }

    #[test]
    fn non_string_response_is_stringified() {
        let cases = [
            (r#"{"response":3}"#, "3"),
            (r#"{"response":2.0}"#, "2"),
            (r#"{"response":0.5}"#, "0.5"),
            (r#"{"response":false}"#, "false"),
            (r#"{"response":["joy",null,1]}"#, "joy,,1"),
            (r#"{"response":{"a":1}}"#, "[object Object]"),
        ];
        for (body, expected) in cases {
            let raw = RawResponse::new(200, "OK", body);
            match classify(&raw) {
                Outcome::Analyzed { message, .. } => assert_eq!(message, expected, "body: {}", body),
                other => panic!("body {} gave {:?}", body, other),
            }
        }
    }

    #[test]
    fn malformed_emotions_do_not_fail_success() {
        let raw = RawResponse::new(200, "OK", r#"{"response":"fine","emotions":"n/a"}"#);
        assert_eq!(
            classify(&raw),
            Outcome::Analyzed {
                message: "fine".to_string(),
                emotions: None
            }
        );
    }
}
