use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::Dimension;
use crate::data::model::Dataset;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

fn values_of(dataset: &Dataset, dim: Dimension) -> &[String] {
    match dim {
        Dimension::Province => dataset.provinces(),
        Dimension::Organizer => dataset.organizers(),
        Dimension::Status => dataset.statuses(),
    }
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data Utama");
    ui.separator();

    let restricted = !state.filters.is_unrestricted();
    if ui
        .add_enabled(restricted, egui::Button::new("Reset semua filter"))
        .clicked()
    {
        state.clear_filters();
    }
    ui.add_space(4.0);

    // Keep our own handle so checkbox changes can mutate `state` in the loop.
    let dataset = state.dataset.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dim in Dimension::ALL {
                let values = values_of(&dataset, dim);
                let n_selected = state.filters.selection(dim).len();
                let header_text = if n_selected == 0 {
                    format!("{}  (semua)", dim.label())
                } else {
                    format!("{}  ({n_selected}/{})", dim.label(), values.len())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.label())
                    .default_open(dim != Dimension::Province)
                    .show(ui, |ui: &mut Ui| {
                        if ui.small_button("Kosongkan").clicked() {
                            state.clear_dimension(dim);
                        }

                        let mut toggled: Option<&str> = None;
                        for value in values {
                            let mut checked = state.filters.selection(dim).contains(value);
                            if ui.checkbox(&mut checked, value.as_str()).changed() {
                                toggled = Some(value.as_str());
                            }
                        }
                        if let Some(value) = toggled {
                            state.toggle_filter_value(dim, value);
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Headline numbers of the filtered population.
pub fn summary(ui: &mut Ui, state: &AppState) {
    let summary = &state.report.summary;
    ui.strong("Statistik Ringkas");
    ui.columns(3, |cols| {
        cols[0].label("Jumlah Perguruan Tinggi");
        cols[0].heading(summary.institutions.to_string());
        cols[1].label("Provinsi Tercakup");
        cols[1].heading(summary.provinces.to_string());
        cols[2].label("Penyelenggara:");
        for organizer in &summary.organizers {
            cols[2].label(organizer.as_str());
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export filtered CSV…").clicked() {
                save_export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} records loaded, {} match the filters",
            state.dataset.len(),
            state.report.filtered.len()
        ));

        let missing = state.dataset.geometry_missing();
        if missing > 0 {
            ui.separator();
            ui.label(
                RichText::new(format!("{missing} rows without map geometry"))
                    .color(Color32::from_rgb(0xd9, 0x8c, 0x00)),
            );
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open institution table")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match state.open(&path) {
            Ok(()) => {
                log::info!("Opened {}", path.display());
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn save_export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download filtered data")
        .set_file_name(crate::data::export::FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match state.export_to(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
