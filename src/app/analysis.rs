//! Analysis dispatch and backend configuration

use super::{App, SharedDisplay};
use crate::dispatcher::{DisplayPort, Dispatcher};
use crate::types::{MessageKind, Outcome};
use eframe::egui;
use std::sync::Arc;
use tracing::{error, info};

/// Parse the timeout field: blank or zero means no timeout
pub(crate) fn parse_timeout(input: &str) -> Result<Option<u64>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u64>() {
        Ok(0) => Ok(None),
        Ok(secs) => Ok(Some(secs)),
        Err(_) => Err(format!("Timeout must be a whole number of seconds, got '{}'", trimmed)),
    }
}

/// Message for a trigger while no backend is configured. Blank input still
/// gets the empty-input warning.
pub(crate) fn unconfigured_message(text: &str, endpoint_error: Option<&str>) -> (MessageKind, String) {
    if text.trim().is_empty() {
        return Outcome::EmptyInput.message();
    }
    let reason = endpoint_error.unwrap_or("No backend configured");
    (MessageKind::Error, format!("Error: {}", reason))
}

impl App {
    /// Rebuild the HTTP transport from the current endpoint settings
    pub fn rebuild_dispatcher(&mut self) {
        match self.settings.transport() {
            Ok(transport) => {
                info!(
                    base_url = %transport.base_url(),
                    timeout = ?self.settings.request_timeout(),
                    "Backend configured"
                );
                self.dispatcher = Some(Arc::new(Dispatcher::new(transport)));
                self.endpoint_error = None;
            }
            Err(e) => {
                error!(error = %e, "Invalid backend configuration");
                self.dispatcher = None;
                self.endpoint_error = Some(e.to_string());
            }
        }
    }

    /// Apply the settings modal fields. Returns false if they were rejected.
    pub fn apply_endpoint_settings(&mut self) -> bool {
        let secs = match parse_timeout(&self.timeout_str) {
            Ok(secs) => secs,
            Err(e) => {
                self.endpoint_error = Some(e);
                return false;
            }
        };
        self.settings.base_url = self.base_url_str.trim().to_string();
        self.settings.request_timeout_secs = secs;
        self.rebuild_dispatcher();
        if self.endpoint_error.is_none() {
            self.save_settings();
        }
        self.endpoint_error.is_none()
    }

    /// Start one analysis cycle for the current input
    pub fn run_analysis(&mut self, ctx: &egui::Context) {
        if self.is_loading() {
            return;
        }

        let mut display = SharedDisplay::new(self.display.clone(), ctx.clone());

        let Some(dispatcher) = self.dispatcher.clone() else {
            let (kind, text) = unconfigured_message(&self.input_text, self.endpoint_error.as_deref());
            display.render_message(kind, &text);
            return;
        };

        let text = self.input_text.clone();
        self.runtime.spawn(async move {
            dispatcher.run_analysis(&text, &mut display).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MSG_EMPTY_INPUT;

    #[test]
    fn blank_or_zero_timeout_is_none() {
        assert_eq!(parse_timeout(""), Ok(None));
        assert_eq!(parse_timeout("  "), Ok(None));
        assert_eq!(parse_timeout("0"), Ok(None));
    }

    #[test]
    fn numeric_timeout_is_seconds() {
        assert_eq!(parse_timeout(" 30 "), Ok(Some(30)));
    }

    #[test]
    fn blank_input_warns_even_without_backend() {
        for text in ["", "   ", "\n"] {
            assert_eq!(
                unconfigured_message(text, Some("Invalid endpoint URL 'x': bad")),
                (MessageKind::Warning, MSG_EMPTY_INPUT.to_string())
            );
        }
    }

    #[test]
    fn text_without_backend_reports_configuration_error() {
        assert_eq!(
            unconfigured_message("I am happy", Some("Invalid endpoint URL 'x': bad")),
            (MessageKind::Error, "Error: Invalid endpoint URL 'x': bad".to_string())
        );
        assert_eq!(
            unconfigured_message("I am happy", None),
            (MessageKind::Error, "Error: No backend configured".to_string())
        );
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        assert!(parse_timeout("ten").is_err());
        assert!(parse_timeout("-5").is_err());
    }
}
