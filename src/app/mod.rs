//! App module - contains the main application state and logic

mod analysis;
mod display;

pub use display::{DisplayState, SharedDisplay};

use crate::client::HttpTransport;
use crate::dispatcher::Dispatcher;
use crate::settings::Settings;
use crate::theme;
use eframe::egui;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    // Input
    pub(crate) input_text: String,
    pub(crate) focus_input: bool,
    // Display region, written by dispatch tasks
    pub(crate) display: Arc<Mutex<DisplayState>>,
    // Backend
    pub(crate) dispatcher: Option<Arc<Dispatcher<HttpTransport>>>,
    pub(crate) endpoint_error: Option<String>,
    pub(crate) runtime: tokio::runtime::Runtime,
    // Settings modal
    pub(crate) show_settings: bool,
    pub(crate) base_url_str: String,
    pub(crate) timeout_str: String,
    // Saved settings; the environment override stays out of the file
    pub(crate) settings: Settings,
    // Window
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        runtime: tokio::runtime::Runtime,
        data_dir: PathBuf,
    ) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        // Apply theme from theme.rs
        theme::apply_visuals(&cc.egui_ctx);

        let mut app = Self {
            input_text: settings.last_input.clone(),
            focus_input: true,
            display: Arc::new(Mutex::new(DisplayState::default())),
            dispatcher: None,
            endpoint_error: None,
            runtime,
            show_settings: false,
            base_url_str: settings.base_url.clone(),
            timeout_str: settings
                .request_timeout()
                .map(|t| t.as_secs().to_string())
                .unwrap_or_default(),
            settings,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        };

        app.rebuild_dispatcher();
        app
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            last_input: self.input_text.clone(),
            ..self.settings.clone()
        };
        settings.save(&self.data_dir);
    }

    /// URL requests actually go to
    pub fn effective_base_url(&self) -> String {
        self.settings.effective_base_url()
    }

    /// Snapshot of the display region for this frame
    pub fn display_snapshot(&self) -> DisplayState {
        self.display.lock().unwrap().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.display.lock().unwrap().loading
    }
}
