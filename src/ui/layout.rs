// Main application layout
// Header, role sidebar, transcript and input bar. Views read the state and
// report what the user did as actions; they never mutate the state directly.

use eframe::egui;

use crate::state::app_state::{MAX_INPUT_CHARS, MAX_ROLE_NAME_CHARS, MAX_ROLE_PROMPT_CHARS};
use crate::state::{Action, AppState, AuthStatus};
use crate::ui::components::*;

/// Render the whole window and collect the actions the user triggered
pub fn render_app_layout(ctx: &egui::Context, state: &AppState) -> Vec<Action> {
    let mut actions = Vec::new();

    let width = ctx.screen_rect().width();
    if (width - state.ui_state.viewport_width).abs() > f32::EPSILON {
        actions.push(Action::ViewportResized(width));
    }

    let toggle_rect = render_header(ctx, state, &mut actions);

    let sidebar_rect = if state.ui_state.sidebar_shown() {
        Some(render_sidebar(ctx, state, &mut actions))
    } else {
        None
    };

    if state.auth == AuthStatus::SignedOut {
        render_signed_out_view(ctx);
    } else {
        render_input_bar(ctx, state, &mut actions);
        render_transcript(ctx, state);
    }

    // Outside-click dismissal; the reducer only honours it on narrow viewports
    if let Some(sidebar_rect) = sidebar_rect {
        let click = ctx.input(|i| {
            if i.pointer.any_click() {
                i.pointer.interact_pos()
            } else {
                None
            }
        });
        if let Some(pos) = click {
            if !sidebar_rect.contains(pos) && !toggle_rect.contains(pos) {
                actions.push(Action::ClickedOutsideSidebar);
            }
        }
    }

    actions
}

/// Render the top bar with the role name and the sidebar toggle
/// Returns the toggle's rect so its clicks are not treated as outside clicks
fn render_header(ctx: &egui::Context, state: &AppState, actions: &mut Vec<Action>) -> egui::Rect {
    egui::TopBottomPanel::top("chat_header")
        .show(ctx, |ui| {
            ui.add_space(6.0);
            let rect = ui
                .horizontal(|ui| {
                    ui.add_space(8.0);
                    ui.heading(egui::RichText::new(&state.role.name).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_space(8.0);
                        let toggle = sidebar_toggle_button(ui);
                        if toggle.clicked() {
                            actions.push(Action::ToggleSidebar);
                        }
                        toggle.rect
                    })
                    .inner
                })
                .inner;
            ui.add_space(6.0);
            rect
        })
        .inner
}

/// Render the role sidebar and return its rect
fn render_sidebar(ctx: &egui::Context, state: &AppState, actions: &mut Vec<Action>) -> egui::Rect {
    egui::SidePanel::left("role_sidebar")
        .resizable(false)
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading(egui::RichText::new("ロール").strong());
            ui.add_space(8.0);

            let mut name = state.role.name.clone();
            let name_edit = egui::TextEdit::singleline(&mut name)
                .char_limit(MAX_ROLE_NAME_CHARS)
                .desired_width(f32::INFINITY);
            if ui.add(name_edit).changed() {
                actions.push(Action::RoleNameChanged(name));
            }
            ui.add_space(8.0);

            let mut prompt = state.role.prompt.clone();
            let prompt_edit = egui::TextEdit::multiline(&mut prompt)
                .char_limit(MAX_ROLE_PROMPT_CHARS)
                .desired_rows(6)
                .desired_width(f32::INFINITY);
            if ui.add(prompt_edit).changed() {
                actions.push(Action::RolePromptChanged(prompt));
            }

            ui.add_space(16.0);
            ui.separator();
            ui.add_space(8.0);
            auth_status_label(ui, &state.auth);
            if state.auth == AuthStatus::Authenticated {
                ui.label(egui::RichText::new(state.user_id()).weak().size(12.0));
            }
            ui.add_space(8.0);

            let can_sign_out = state.auth != AuthStatus::SignedOut;
            if ui
                .add_enabled(can_sign_out, egui::Button::new("サインアウト"))
                .clicked()
            {
                actions.push(Action::SignOutRequested);
            }
        })
        .response
        .rect
}

/// Render the message input and send button
fn render_input_bar(ctx: &egui::Context, state: &AppState, actions: &mut Vec<Action>) {
    egui::TopBottomPanel::bottom("chat_input").show(ctx, |ui| {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let mut input = state.input.clone();
            let can_send = state.can_send() && !input.trim().is_empty();

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let send_clicked = send_button(ui, can_send).clicked();

                let response = ui.add(
                    egui::TextEdit::singleline(&mut input)
                        .hint_text("メッセージを入力してください")
                        .char_limit(MAX_INPUT_CHARS)
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    actions.push(Action::InputChanged(input.clone()));
                }

                let enter_pressed =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if can_send && (send_clicked || enter_pressed) {
                    actions.push(Action::Submit { at: chrono::Utc::now() });
                    response.request_focus();
                }
            });
        });
        ui.add_space(8.0);
    });
}

/// Render the scrolling transcript
/// Sticks to the bottom so every append scrolls into view
fn render_transcript(ctx: &egui::Context, state: &AppState) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .id_source("transcript_scroll")
            .auto_shrink([false; 2])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add_space(8.0);
                for message in state.transcript() {
                    message_bubble(ui, message);
                }
                if state.is_loading() {
                    loading_row(ui);
                }
            });
    });
}

/// Render the view shown once the session has been invalidated
fn render_signed_out_view(ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.heading(egui::RichText::new("サインアウトしました").size(22.0));
            ui.add_space(12.0);
            ui.label(
                egui::RichText::new("Sign in again and restart the client to continue")
                    .weak()
                    .size(14.0),
            );
        });
    });
}
