// Reusable UI components
// Message bubbles, the loading row and small buttons

use eframe::egui;

use crate::state::{AuthStatus, Message, Sender};

/// Glyph standing in for the assistant avatar
const ASSISTANT_AVATAR: &str = "🤖";

/// Render a single transcript entry
/// Assistant messages sit on the left with an avatar, user messages on the right
pub fn message_bubble(ui: &mut egui::Ui, message: &Message) {
    let (layout, fill) = match message.sender {
        Sender::Assistant => (
            egui::Layout::left_to_right(egui::Align::TOP),
            ui.visuals().faint_bg_color,
        ),
        Sender::User(_) => (
            egui::Layout::right_to_left(egui::Align::TOP),
            ui.visuals().selection.bg_fill,
        ),
    };

    ui.with_layout(layout, |ui| {
        ui.add_space(8.0);
        if message.sender.is_assistant() {
            ui.label(egui::RichText::new(ASSISTANT_AVATAR).size(20.0));
        }

        let max_width = ui.available_width() * 0.75;
        egui::Frame::none()
            .fill(fill)
            .rounding(egui::Rounding::same(8.0))
            .inner_margin(egui::Margin::same(8.0))
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.label(egui::RichText::new(&message.content).size(14.0));
            })
            .response
            .on_hover_text(
                message
                    .timestamp
                    .with_timezone(&chrono::Local)
                    .format("%H:%M:%S")
                    .to_string(),
            );
    });
    ui.add_space(6.0);
}

/// Render the "assistant is typing" row
pub fn loading_row(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.add_space(8.0);
        ui.label(egui::RichText::new(ASSISTANT_AVATAR).size(20.0));
        ui.spinner();
    });
}

/// Render the session status line shown in the sidebar
pub fn auth_status_label(ui: &mut egui::Ui, auth: &AuthStatus) {
    let (text, color) = match auth {
        AuthStatus::Pending => ("Signing in...".to_string(), egui::Color32::GRAY),
        AuthStatus::Authenticated => ("Signed in".to_string(), egui::Color32::from_rgb(0, 180, 0)),
        AuthStatus::SignedOut => ("Signed out".to_string(), egui::Color32::from_rgb(220, 180, 0)),
        AuthStatus::Unauthenticated(reason) => (
            format!("Not signed in: {}", reason),
            egui::Color32::from_rgb(220, 0, 0),
        ),
    };
    ui.colored_label(color, text);
}

/// Render the sidebar toggle button
pub fn sidebar_toggle_button(ui: &mut egui::Ui) -> egui::Response {
    ui.button(egui::RichText::new("⚙").size(18.0))
}

/// Render the send button
pub fn send_button(ui: &mut egui::Ui, enabled: bool) -> egui::Response {
    ui.add_enabled(enabled, egui::Button::new(egui::RichText::new("➤").strong()))
}
