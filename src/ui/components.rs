//! Reusable UI components

use crate::theme;
use crate::types::ChatRole;
use eframe::egui;

/// Icon and label color for a chat role
pub fn role_badge(role: ChatRole) -> (&'static str, &'static str, egui::Color32) {
    match role {
        ChatRole::User => (egui_phosphor::regular::USER, "You", theme::ROLE_USER),
        ChatRole::Assistant => (
            egui_phosphor::regular::FLASK,
            "Lab Intel",
            theme::ROLE_ASSISTANT,
        ),
    }
}

/// Small metric chip: dim label above, bold value below
pub fn metric_chip(ui: &mut egui::Ui, label: &str, value: &str) {
    theme::section_frame().show(ui, |ui| {
        ui.vertical(|ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(label).size(10.0).color(theme::TEXT_DIM),
                )
                .selectable(false),
            );
            ui.add(
                egui::Label::new(egui::RichText::new(value).size(15.0).strong())
                    .selectable(false),
            );
        });
    });
}

/// Inline error banner with a dismiss button. Returns true when dismissed.
pub fn error_banner(ui: &mut egui::Ui, message: &str) -> bool {
    let mut dismissed = false;
    egui::Frame::new()
        .fill(theme::BANNER_ERROR_BG)
        .corner_radius(theme::RADIUS_DEFAULT)
        .inner_margin(egui::Margin::same(10))
        .stroke(egui::Stroke::new(1.0, theme::BANNER_ERROR_BORDER))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                let text = format!("{}  {}", egui_phosphor::regular::WARNING, message);
                ui.add(
                    egui::Label::new(egui::RichText::new(text).color(theme::BANNER_ERROR_TEXT))
                        .wrap(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let close_size = 18.0;
                    let (rect, response) = ui.allocate_exact_size(
                        egui::vec2(close_size, close_size),
                        egui::Sense::click(),
                    );
                    let color = if response.hovered() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                        theme::TEXT_PRIMARY
                    } else {
                        theme::BANNER_ERROR_TEXT
                    };
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        egui_phosphor::regular::X,
                        egui::FontId::proportional(13.0),
                        color,
                    );
                    if response.clicked() {
                        dismissed = true;
                    }
                });
            });
        });
    dismissed
}

/// Expander toggle row with a caret icon. Returns true when clicked.
pub fn expander_row(ui: &mut egui::Ui, open: bool, icon: &str, label: &str) -> bool {
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), 24.0),
        egui::Sense::click(),
    );
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        ui.painter()
            .rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_HOVER);
    }
    let caret = if open {
        egui_phosphor::regular::CARET_DOWN
    } else {
        egui_phosphor::regular::CARET_RIGHT
    };
    let text = format!("{}  {}  {}", caret, icon, label);
    ui.painter().text(
        rect.left_center() + egui::vec2(6.0, 0.0),
        egui::Align2::LEFT_CENTER,
        text,
        egui::FontId::proportional(12.0),
        theme::TEXT_MUTED,
    );
    response.clicked()
}

/// Monospace SQL block
pub fn sql_block(ui: &mut egui::Ui, sql: &str) {
    theme::code_frame().show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.add(
            egui::Label::new(
                egui::RichText::new(sql)
                    .monospace()
                    .size(12.0)
                    .color(theme::TEXT_SECONDARY),
            )
            .wrap()
            .selectable(true),
        );
    });
}

/// Health indicator row for the sidebar
pub fn health_row(ui: &mut egui::Ui, icon: &str, text: &str, color: egui::Color32) {
    ui.horizontal(|ui| {
        ui.add(
            egui::Label::new(egui::RichText::new(icon).size(14.0).color(color)).selectable(false),
        );
        ui.add(
            egui::Label::new(egui::RichText::new(text).size(12.0).color(color)).selectable(false),
        );
    });
}
