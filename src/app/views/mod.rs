pub mod notice_view;
pub mod stream_view;
pub mod tally_view;

pub use notice_view::{NoticeView, show_toast};
pub use stream_view::StreamView;
pub use tally_view::TallyView;

pub trait View {
    fn draw(&mut self, ui: &mut egui::Ui);
}
