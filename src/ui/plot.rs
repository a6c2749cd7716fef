use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, PlotPoints, Polygon, Text};

use crate::color::{series_color, SequentialScale};
use crate::data::choropleth::ColorDomain;
use crate::data::model::Year;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Choropleth map
// ---------------------------------------------------------------------------

/// Provinces filled by their share of the filtered population.
///
/// Only exterior rings are filled; `egui_plot` has no hole support.
pub fn choropleth_map(ui: &mut Ui, state: &AppState) {
    ui.strong("Sebaran Persentase Perguruan Tinggi per Provinsi");

    let layer = &state.report.map;
    let scale = &state.map_scale;
    let border = Stroke::new(0.8, Color32::from_gray(204));

    Plot::new("choropleth_map")
        .height(520.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for province in &layer.provinces {
                let Some(geometry) = &province.geometry else {
                    continue;
                };
                let fill = scale.color_for(province.percentage);
                for polygon in geometry.polygons() {
                    let Some(exterior) = polygon.exterior() else {
                        continue;
                    };
                    let points: PlotPoints = exterior.iter().copied().collect();
                    plot_ui.polygon(Polygon::new(points).fill_color(fill).stroke(border));
                }
            }

            for province in &layer.provinces {
                let Some([x, y]) = province.label_anchor() else {
                    continue;
                };
                plot_ui.text(Text::new(
                    PlotPoint::new(x, y),
                    RichText::new(&province.province).size(8.0).color(Color32::BLACK),
                ));
            }
        });

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Persentase Jumlah Perguruan Tinggi (%)");
        for (label, color) in scale.legend_entries(5) {
            ui.label(RichText::new("■").color(color).size(18.0));
            ui.label(label);
        }
    });
}

// ---------------------------------------------------------------------------
// Per-province bar chart
// ---------------------------------------------------------------------------

/// Filtered institution counts per province, largest first.
pub fn province_counts(ui: &mut Ui, state: &AppState) {
    ui.strong("Jumlah Perguruan Tinggi per Provinsi");

    let entries: Vec<_> = state
        .report
        .filtered_aggregate
        .by_count_desc()
        .into_iter()
        .filter(|e| e.count > 0)
        .collect();
    if entries.is_empty() {
        ui.label("Tidak ada data untuk filter ini.");
        return;
    }

    let max = entries.first().map_or(0, |e| e.count) as f64;
    let min = entries.last().map_or(0, |e| e.count) as f64;
    let scale = SequentialScale::greens(ColorDomain { min, max });

    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            Bar::new(i as f64, e.count as f64)
                .name(&e.province)
                .fill(scale.color_for(e.count as f64))
        })
        .collect();
    let names: Vec<String> = entries.iter().map(|e| e.province.clone()).collect();

    Plot::new("province_counts")
        .height(320.0)
        .y_axis_label("Jumlah Perguruan Tinggi")
        .x_axis_formatter(move |mark, _range| category_label(&names, mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .width(0.7)
                    .element_formatter(Box::new(|bar: &Bar, _: &BarChart| {
                        format!("{}: {}", bar.name, bar.value)
                    })),
            );
        });
}

// ---------------------------------------------------------------------------
// Stacked staff / student chart
// ---------------------------------------------------------------------------

const SERIES: [(&str, Year, bool); 4] = [
    ("Dosen 2017", Year::Y2017, false),
    ("Mahasiswa 2017", Year::Y2017, true),
    ("Dosen 2018", Year::Y2018, false),
    ("Mahasiswa 2018", Year::Y2018, true),
];

/// Staff and students per province for both years, stacked.
pub fn staff_student_stack(ui: &mut Ui, state: &AppState) {
    ui.strong("Perbandingan Jumlah Dosen dan Mahasiswa per Provinsi (2017 & 2018)");

    let metrics = &state.report.metrics;
    let mut charts: Vec<BarChart> = Vec::with_capacity(SERIES.len());
    for (name, year, students) in SERIES {
        let bars = metrics
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let totals = m.year(year);
                let value = if students { totals.students } else { totals.staff };
                Bar::new(i as f64, value).name(&m.province)
            })
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(name)
            .color(series_color(year, students))
            .width(0.7)
            .stack_on(&below);
        charts.push(chart);
    }
    let names: Vec<String> = metrics.iter().map(|m| m.province.clone()).collect();

    Plot::new("staff_student_stack")
        .height(600.0)
        .legend(Legend::default())
        .y_axis_label("Jumlah")
        .x_axis_formatter(move |mark, _range| category_label(&names, mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Axis label for an integer category position, empty between categories.
fn category_label(names: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    names.get(rounded as usize).cloned().unwrap_or_default()
}
