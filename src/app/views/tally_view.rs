use crate::app::views::View;
use crate::tray::Tally;
use egui_extras::{Column, TableBuilder};

const ROW_HEIGHT: f32 = 32.0;

pub struct TallyView<'a> {
    tally: &'a Tally,
}

impl<'a> TallyView<'a> {
    pub fn new(tally: &'a Tally) -> Self {
        Self { tally }
    }
}

impl View for TallyView<'_> {
    fn draw(&mut self, ui: &mut egui::Ui) {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::remainder())
            .column(Column::auto().at_least(96.0))
            .header(ROW_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong("Label");
                });
                header.col(|ui| {
                    ui.strong(quantity_header(self.tally));
                });
            })
            .body(|mut body| {
                for (label, count) in self.tally.iter() {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(label);
                        });
                        row.col(|ui| {
                            ui.label(count.to_string());
                        });
                    });
                }
            });
    }
}

fn quantity_header(tally: &Tally) -> String {
    format!("Quantity: {}", tally.total())
}
