#![windows_subsystem = "windows"]
//! Emotion Detector - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;
mod client;
mod constants;
mod dispatcher;
mod error;
mod settings;
mod theme;
mod types;
mod ui;
mod utils;

use app::App;
use constants::*;
use eframe::egui;
use tracing::{error, info};
use ui::components::{emotion_scores, message_banner};
use utils::{get_data_dir, truncate_chars};

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, EnvFilter, prelude::*};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "emotion-detector.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,emotion_detector=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "Emotion Detector starting");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "Failed to start async runtime");
            panic!("Failed to start async runtime: {}", e);
        }
    };

    // Load saved window position/size
    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(640.0, 560.0)))
        .with_min_inner_size([480.0, 420.0])
        .with_title(APP_NAME);

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, settings, runtime, data_dir);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP & UI RENDERING
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        let state = self.display_snapshot();

        egui::TopBottomPanel::bottom("status_bar")
            .frame(egui::Frame::new().fill(theme::BG_BASE).inner_margin(egui::Margin::symmetric(12, 6)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let (icon, color, text) = match &self.endpoint_error {
                        Some(_) => (egui_phosphor::regular::PLUGS, theme::STATUS_ERROR, "Backend not configured".to_string()),
                        None => (
                            egui_phosphor::regular::PLUGS_CONNECTED,
                            theme::TEXT_DIM,
                            truncate_chars(&self.effective_base_url(), 48),
                        ),
                    };
                    ui.label(egui::RichText::new(icon).color(color));
                    ui.label(egui::RichText::new(text).size(theme::FONT_SMALL).color(color));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("v{}", APP_VERSION))
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_DIM),
                        );
                    });
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme::BG_BASE).inner_margin(egui::Margin::same(20)))
            .show(ctx, |ui| {
                // Title bar with settings button
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(format!("{}  {}", egui_phosphor::regular::SMILEY, APP_NAME))
                            .size(theme::FONT_TITLE)
                            .strong()
                            .color(theme::TEXT_PRIMARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let settings_btn = ui
                            .add(theme::button(egui_phosphor::regular::GEAR_SIX))
                            .on_hover_text("Settings");
                        if settings_btn.clicked() {
                            self.show_settings = true;
                        }
                    });
                });
                ui.add_space(theme::SPACING_LG);

                // — Input —
                theme::card_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(
                        egui::RichText::new("Text to analyze")
                            .size(theme::FONT_LABEL)
                            .color(theme::ACCENT),
                    );
                    ui.add_space(theme::SPACING_SM);

                    let te = theme::input_frame()
                        .show(ui, |ui| {
                            ui.add(
                                egui::TextEdit::multiline(&mut self.input_text)
                                    .id(egui::Id::new(QUERY_PARAM))
                                    .frame(false)
                                    .desired_rows(theme::INPUT_ROWS)
                                    .desired_width(f32::INFINITY)
                                    .hint_text("How are you feeling today?")
                                    .font(egui::FontId::proportional(theme::FONT_BODY)),
                            )
                        })
                        .inner;
                    if self.focus_input {
                        self.focus_input = false;
                        te.request_focus();
                    }

                    // Ctrl+Enter submits from the input
                    let submit_shortcut = te.has_focus()
                        && ui.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Enter));

                    ui.add_space(theme::SPACING_MD);
                    let enabled = !state.loading;
                    let clicked = ui
                        .horizontal(|ui| {
                            let resp = ui.add_enabled(
                                enabled,
                                theme::button_accent(
                                    format!("{}  Run Sentiment Analysis", egui_phosphor::regular::MAGNIFYING_GLASS),
                                    enabled,
                                )
                                .min_size(egui::vec2(0.0, theme::BUTTON_HEIGHT_LARGE)),
                            );
                            if state.loading {
                                ui.spinner();
                                ui.label(
                                    egui::RichText::new("Analyzing...")
                                        .size(theme::FONT_LABEL)
                                        .color(theme::TEXT_MUTED),
                                );
                            }
                            resp.clicked()
                        })
                        .inner;

                    if clicked || (submit_shortcut && enabled) {
                        self.run_analysis(ctx);
                    }
                });

                ui.add_space(theme::SPACING_LG);

                // — Result —
                self.render_result(ui, &state);
            });

        self.render_settings_modal(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        self.save_settings();
    }
}

// ============================================================================
// RESULT & SETTINGS RENDERING
// ============================================================================

impl App {
    fn render_result(&self, ui: &mut egui::Ui, state: &app::DisplayState) {
        let Some((kind, text)) = &state.message else {
            return;
        };

        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .show(ui, |ui| {
                message_banner(ui, *kind, text);

                if let Some(scores) = &state.emotions {
                    ui.add_space(theme::SPACING_MD);
                    theme::card_frame().show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        emotion_scores(ui, scores);
                    });
                }
            });
    }

    fn render_settings_modal(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let modal_response = egui::Modal::new(egui::Id::new("settings_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(theme::modal_frame())
            .show(ctx, |ui| {
                ui.set_width(360.0);

                // Title bar with close button
                ui.horizontal(|ui| {
                    ui.add(egui::Label::new(
                        egui::RichText::new("Settings").size(16.0).strong(),
                    ).selectable(false));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let close_size = 24.0;
                        let (rect, response) = ui.allocate_exact_size(
                            egui::vec2(close_size, close_size),
                            egui::Sense::click(),
                        );
                        let close_color = if response.hovered() {
                            ui.painter().rect_filled(rect, 4.0, theme::BG_SURFACE);
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                            theme::STATUS_ERROR
                        } else {
                            theme::TEXT_DIM
                        };
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            egui_phosphor::regular::X,
                            egui::FontId::proportional(16.0),
                            close_color,
                        );
                        if response.clicked() {
                            self.show_settings = false;
                        }
                    });
                });
                ui.add_space(4.0);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // — Backend URL —
                ui.add(egui::Label::new(
                    egui::RichText::new("Backend URL").size(13.0).color(theme::ACCENT),
                ).selectable(false));
                ui.add_space(2.0);
                let url_resp = theme::input_frame()
                    .show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::singleline(&mut self.base_url_str)
                                .frame(false)
                                .desired_width(f32::INFINITY)
                                .hint_text(DEFAULT_BASE_URL)
                                .font(egui::FontId::proportional(13.0)),
                        )
                    })
                    .inner;
                if let Some(url) = &self.settings.base_url_override {
                    ui.add_space(2.0);
                    ui.label(
                        egui::RichText::new(format!("{} is set: this session uses {}", BASE_URL_ENV, url))
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_DIM),
                    );
                }

                ui.add_space(theme::SPACING_MD);

                // — Timeout —
                ui.add(egui::Label::new(
                    egui::RichText::new("Request timeout (seconds)").size(13.0).color(theme::ACCENT),
                ).selectable(false));
                ui.add_space(2.0);
                let timeout_resp = theme::input_frame()
                    .show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::singleline(&mut self.timeout_str)
                                .frame(false)
                                .desired_width(f32::INFINITY)
                                .hint_text("none")
                                .font(egui::FontId::proportional(13.0)),
                        )
                    })
                    .inner;

                if let Some(err) = &self.endpoint_error {
                    ui.add_space(theme::SPACING_SM);
                    ui.label(
                        egui::RichText::new(err)
                            .size(theme::FONT_SMALL)
                            .color(theme::STATUS_ERROR),
                    );
                }

                ui.add_space(theme::SPACING_MD);
                let submitted = (url_resp.lost_focus() || timeout_resp.lost_focus())
                    && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let save_clicked = ui
                    .add(theme::button_accent("Save", true))
                    .clicked();

                if (submitted || save_clicked) && self.apply_endpoint_settings() {
                    self.show_settings = false;
                }
            });

        if modal_response.should_close() {
            self.show_settings = false;
        }
    }
}
