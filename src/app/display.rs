//! Display region state shared between the UI thread and dispatch tasks

use crate::dispatcher::DisplayPort;
use crate::types::{EmotionScores, MessageKind};
use eframe::egui;
use std::sync::{Arc, Mutex};

/// What the result area currently shows
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DisplayState {
    pub loading: bool,
    pub message: Option<(MessageKind, String)>,
    pub emotions: Option<EmotionScores>,
}

impl DisplayPort for DisplayState {
    fn show_loading(&mut self) {
        self.loading = true;
    }

    fn hide_loading(&mut self) {
        self.loading = false;
    }

    fn clear_message(&mut self) {
        self.message = None;
        self.emotions = None;
    }

    fn render_message(&mut self, kind: MessageKind, text: &str) {
        self.message = Some((kind, text.to_string()));
        self.emotions = None;
    }

    fn render_emotions(&mut self, scores: &EmotionScores) {
        self.emotions = Some(scores.clone());
    }
}

/// Display port handed to a dispatch task. Every write repaints the window.
pub struct SharedDisplay {
    state: Arc<Mutex<DisplayState>>,
    ctx: egui::Context,
}

impl SharedDisplay {
    pub fn new(state: Arc<Mutex<DisplayState>>, ctx: egui::Context) -> Self {
        Self { state, ctx }
    }

    fn update(&self, f: impl FnOnce(&mut DisplayState)) {
        {
            let mut s = self.state.lock().unwrap();
            f(&mut s);
        }
        self.ctx.request_repaint();
    }
}

impl DisplayPort for SharedDisplay {
    fn show_loading(&mut self) {
        self.update(|s| s.show_loading());
    }

    fn hide_loading(&mut self) {
        self.update(|s| s.hide_loading());
    }

    fn clear_message(&mut self) {
        self.update(|s| s.clear_message());
    }

    fn render_message(&mut self, kind: MessageKind, text: &str) {
        self.update(|s| s.render_message(kind, text));
    }

    fn render_emotions(&mut self, scores: &EmotionScores) {
        self.update(|s| s.render_emotions(scores));
    }
}
