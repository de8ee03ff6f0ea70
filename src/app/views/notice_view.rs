use crate::app::notice::{Notice, NoticeKind, Toast};
use egui::{Align2, Color32, RichText};
use std::time::Instant;

pub struct NoticeView<'a> {
    notice: &'a Notice,
}

impl<'a> NoticeView<'a> {
    pub fn new(notice: &'a Notice) -> Self {
        Self { notice }
    }

    /// Draws the notice centered over the dashboard. Returns `true` once the
    /// operator has dismissed it.
    pub fn show(&self, ctx: &egui::Context) -> bool {
        let mut dismissed = false;
        egui::Window::new(RichText::new(&self.notice.title).color(accent(self.notice.kind)))
            .id(egui::Id::new("operator_notice"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(RichText::new(&self.notice.message).size(20.0));
                ui.add_space(12.0);
                let ok = egui::Button::new(RichText::new("OK").size(22.0))
                    .min_size(egui::vec2(120.0, 44.0));
                if ui.add(ok).clicked() {
                    dismissed = true;
                }
            });
        dismissed
    }
}

fn accent(kind: NoticeKind) -> Color32 {
    match kind {
        NoticeKind::Success => Color32::LIGHT_GREEN,
        NoticeKind::Alert | NoticeKind::Failure => Color32::LIGHT_RED,
    }
}

/// Draws a toast in the top-right corner. It takes no input, so the rest of
/// the dashboard stays usable while it is shown.
pub fn show_toast(ctx: &egui::Context, toast: &Toast, now: Instant) {
    egui::Area::new(egui::Id::new("operator_toast"))
        .anchor(Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(
                    RichText::new(&toast.message)
                        .size(18.0)
                        .color(Color32::LIGHT_BLUE),
                );
                ui.add(
                    egui::ProgressBar::new(toast.remaining_at(now))
                        .desired_width(220.0)
                        .desired_height(4.0),
                );
            });
        });
}
