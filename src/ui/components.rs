//! Reusable UI components
//!
//! Standalone widgets for the result area: the message banner and the
//! per-emotion score rows.

use crate::theme;
use crate::types::{EmotionScores, MessageKind};
use eframe::egui;

/// Phosphor icon shown next to a message of this kind
pub fn message_icon(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Warning => egui_phosphor::regular::WARNING,
        MessageKind::Success => egui_phosphor::regular::CHECK_CIRCLE,
        MessageKind::Error => egui_phosphor::regular::X_CIRCLE,
    }
}

/// Format a score as a percentage with one decimal
pub fn format_score(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Colored alert banner for the rendered message
pub fn message_banner(ui: &mut egui::Ui, kind: MessageKind, text: &str) {
    let (bg, fg) = theme::message_colors(kind);
    egui::Frame::new()
        .fill(bg)
        .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, fg.gamma_multiply(0.4)))
        .corner_radius(theme::RADIUS_DEFAULT)
        .inner_margin(egui::Margin::symmetric(12, 10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal_wrapped(|ui| {
                ui.label(
                    egui::RichText::new(message_icon(kind))
                        .size(theme::FONT_BODY)
                        .color(fg),
                );
                ui.label(egui::RichText::new(text).size(theme::FONT_BODY).color(fg));
            });
        });
}

/// One row per emotion with a proportional bar; the dominant one is highlighted
pub fn emotion_scores(ui: &mut egui::Ui, scores: &EmotionScores) {
    let dominant = scores.dominant_emotion.as_deref();

    for (name, score) in scores.entries() {
        let is_dominant = dominant == Some(name);
        let color = theme::emotion_color(name);

        ui.horizontal(|ui| {
            let label = egui::RichText::new(name)
                .size(theme::FONT_LABEL)
                .color(if is_dominant { theme::TEXT_PRIMARY } else { theme::TEXT_MUTED });
            ui.add_sized(
                [theme::SCORE_LABEL_WIDTH, theme::FONT_LABEL + 4.0],
                egui::Label::new(if is_dominant { label.strong() } else { label }).selectable(false),
            );

            let bar_width = (ui.available_width() - 60.0).max(40.0);
            let (rect, _) = ui.allocate_exact_size(
                egui::vec2(bar_width, theme::SCORE_BAR_HEIGHT),
                egui::Sense::hover(),
            );
            let painter = ui.painter();
            painter.rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_SURFACE);
            let filled = egui::Rect::from_min_size(
                rect.min,
                egui::vec2(rect.width() * score.clamp(0.0, 1.0) as f32, rect.height()),
            );
            painter.rect_filled(filled, theme::RADIUS_DEFAULT, color);

            ui.label(
                egui::RichText::new(format_score(score))
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_DIM),
            );
        });
    }

    if let Some(name) = dominant {
        ui.add_space(theme::SPACING_SM);
        ui.label(
            egui::RichText::new(format!("Dominant emotion: {}", name))
                .size(theme::FONT_LABEL)
                .color(theme::emotion_color(name)),
        );
    }
}
