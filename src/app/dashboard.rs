use crate::app::controller::{Activity, DashboardController};
use crate::app::views::{NoticeView, StreamView, TallyView, View, show_toast};
use crate::config::Settings;
use crate::error::AppError;
use crate::network::{FrameReceiver, HttpTrayBackend};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

const BUTTON_SIZE: egui::Vec2 = egui::vec2(110.0, 52.0);
const REPAINT_INTERVAL: Duration = Duration::from_millis(30);

pub struct DashboardApp {
    controller: DashboardController,
    frame_receiver: FrameReceiver,
    stream_view: StreamView,
}

impl DashboardApp {
    pub fn new(controller: DashboardController, frame_receiver: FrameReceiver) -> Self {
        Self {
            controller,
            frame_receiver,
            stream_view: StreamView::new(),
        }
    }

    /// Opens the kiosk window and blocks until it is closed. The stream
    /// connection and any pending request live exactly as long as the window.
    pub fn start_gui(settings: &Settings) -> Result<(), AppError> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(egui::vec2(settings.window.width, settings.window.height))
                .with_title(&settings.window.title),
            ..Default::default()
        };

        let backend = HttpTrayBackend::new(&settings.backend)?;
        let stream_url = settings.stream.url.clone();
        info!(
            "Starting dashboard (backend: {}, stream: {})",
            settings.backend.base_url, stream_url
        );

        eframe::run_native(
            &settings.window.title,
            options,
            Box::new(move |_cc| {
                let controller = DashboardController::new(Arc::new(backend));
                let frame_receiver = FrameReceiver::start(stream_url);
                Ok(Box::new(DashboardApp::new(controller, frame_receiver)))
            }),
        )
        .map_err(|e| AppError::Ui(e.to_string()))
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui, notice_open: bool) {
        let activity = self.controller.state().activity();
        ui.horizontal(|ui| {
            let reset = egui::Button::new("Reset").min_size(BUTTON_SIZE);
            if ui
                .add_enabled(!notice_open && self.controller.can_reset(), reset)
                .clicked()
            {
                self.controller.request_reset();
            }

            let next = egui::Button::new(busy_label("Next", activity == Activity::Polling))
                .min_size(BUTTON_SIZE);
            if ui
                .add_enabled(!notice_open && self.controller.can_request_next(), next)
                .clicked()
            {
                self.controller.request_next();
            }

            let checkout =
                egui::Button::new(busy_label("Checkout", activity == Activity::CheckingOut))
                    .min_size(BUTTON_SIZE);
            if ui
                .add_enabled(!notice_open && self.controller.can_checkout(), checkout)
                .clicked()
            {
                self.controller.request_checkout();
            }

            if activity != Activity::Idle {
                ui.spinner();
            }
        });
    }
}

fn busy_label(idle: &'static str, busy: bool) -> &'static str {
    if busy { "Processing..." } else { idle }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.controller.apply_pending();
        self.controller.expire_toast(now);
        let latest = self.frame_receiver.latest();
        self.stream_view.update(ctx, latest.as_ref());
        let notice_open = self.controller.state().notice().is_some();

        egui::SidePanel::right("tray_panel")
            .resizable(true)
            .default_width(380.0)
            .show(ctx, |ui| {
                egui::TopBottomPanel::bottom("tray_controls").show_inside(ui, |ui| {
                    ui.add_space(8.0);
                    self.draw_controls(ui, notice_open);
                    ui.add_space(8.0);
                });
                egui::CentralPanel::default().show_inside(ui, |ui| {
                    ui.heading("Tray");
                    ui.separator();
                    let tally = self.controller.tally();
                    TallyView::new(&tally).draw(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.stream_view.draw(ui);
        });

        if let Some(notice) = self.controller.state().notice().cloned() {
            if NoticeView::new(&notice).show(ctx) {
                self.controller.dismiss_notice();
            }
        }

        if let Some(toast) = self.controller.state().toast() {
            show_toast(ctx, toast, now);
        }

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}
