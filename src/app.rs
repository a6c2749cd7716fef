use std::sync::Arc;

use eframe::egui::{self, ScrollArea, Ui};

use crate::data::model::Dataset;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            state: AppState::new(dataset),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: summary, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.heading("Dashboard Perguruan Tinggi Indonesia");
                    panels::summary(ui, &self.state);
                    ui.separator();
                    plot::choropleth_map(ui, &self.state);
                    ui.separator();
                    plot::province_counts(ui, &self.state);
                    ui.separator();
                    plot::staff_student_stack(ui, &self.state);
                    ui.separator();
                    table::data_table(ui, &mut self.state);
                });
        });
    }
}
