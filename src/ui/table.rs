use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::export::EXPORT_COLUMNS;
use crate::data::model::InstitutionRecord;
use crate::state::AppState;

use super::panels::save_export_dialog;

// ---------------------------------------------------------------------------
// Searchable data table
// ---------------------------------------------------------------------------

/// Cell texts in [`EXPORT_COLUMNS`] order.
fn row_cells(r: &InstitutionRecord) -> [String; 14] {
    let num = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    [
        r.institution_id.clone(),
        r.geometry_id.clone(),
        r.name.clone(),
        r.province.clone(),
        r.organizer.clone(),
        r.status.clone(),
        r.code.clone(),
        r.source.clone(),
        num(r.y2017.staff),
        num(r.y2018.staff),
        num(r.y2017.students),
        num(r.y2018.students),
        num(r.y2017.ratio),
        num(r.y2018.ratio),
    ]
}

/// Filtered records, narrowed by the name search.
pub fn data_table(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Data Lengkap");

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Cari Nama Perguruan Tinggi");
        let mut search = state.search.clone();
        if ui.text_edit_singleline(&mut search).changed() {
            state.set_search(search);
        }
        if ui.button("📥 Download Data yang Difilter").clicked() {
            save_export_dialog(state);
        }
    });
    ui.label(format!("{} rows", state.table_rows.len()));

    let dataset = &state.dataset;
    let rows = &state.table_rows;

    egui::ScrollArea::horizontal()
        .id_salt("data_table_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(420.0)
                .column(Column::auto().at_least(60.0))
                .column(Column::auto().at_least(60.0))
                .column(Column::initial(260.0).at_least(120.0))
                .columns(Column::auto().at_least(70.0), EXPORT_COLUMNS.len() - 3)
                .header(20.0, |mut header| {
                    for title in EXPORT_COLUMNS {
                        header.col(|ui: &mut Ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, rows.len(), |mut row| {
                        let record = &dataset.records()[rows[row.index()]];
                        for cell in row_cells(record) {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                });
        });
}
