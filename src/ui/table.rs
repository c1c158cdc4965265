use eframe::egui::{self, Color32, Margin, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{delta_cell_color, kpi_delta_color};
use crate::data::aggregate::{Kpi, KpiSet};
use crate::data::parse::format_minutes_to_clock;
use crate::data::table::{is_delta_column, TableView};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel: KPI cards + comparison table
// ---------------------------------------------------------------------------

/// Render the central comparison view.
pub fn comparison_view(ui: &mut Ui, state: &AppState) {
    let Some(kpis) = &state.kpis else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a cluster analysis CSV to start  (File → Open…)");
        });
        return;
    };

    kpi_cards(ui, kpis);
    ui.separator();

    if let Some(notice) = &state.filter_notice {
        ui.colored_label(Color32::YELLOW, format!("No table to show: {notice}."));
        return;
    }
    let Some(view) = &state.table else { return };
    comparison_table(ui, view);
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

fn kpi_cards(ui: &mut Ui, kpis: &KpiSet) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        let route_delta = kpis.total_routes_v2 as i64 - kpis.total_routes_v1 as i64;
        let arrow = if route_delta < 0 { "▼" } else { "▲" };
        kpi_card(
            ui,
            "ROUTED VEHICLES",
            kpis.total_routes_v2.to_string(),
            format!("RBM 1.0: {}", kpis.total_routes_v1),
            format!("{arrow} {}", route_delta.abs()),
            kpi_delta_color(Kpi::RouteCount, route_delta as f64),
        );

        let spr_delta = kpis.avg_spr_v2 - kpis.avg_spr_v1;
        kpi_card(
            ui,
            "AVG SPR",
            format!("{:.0}", kpis.avg_spr_v2),
            format!("RBM 1.0: {:.0}", kpis.avg_spr_v1),
            format!("{spr_delta:+.0}"),
            kpi_delta_color(Kpi::Spr, spr_delta),
        );

        let stops_delta = kpis.avg_stops_v2 - kpis.avg_stops_v1;
        kpi_card(
            ui,
            "STOPS PER ROUTE",
            format!("{:.1}", kpis.avg_stops_v2),
            format!("RBM 1.0: {:.1}", kpis.avg_stops_v1),
            format!("{stops_delta:+.1}"),
            kpi_delta_color(Kpi::StopsPerRoute, stops_delta),
        );

        let orh_delta = kpis.avg_orh_v2 - kpis.avg_orh_v1;
        kpi_card(
            ui,
            "AVG ORH",
            format_minutes_to_clock(kpis.avg_orh_v2),
            format!("RBM 1.0: {}", format_minutes_to_clock(kpis.avg_orh_v1)),
            format!("{:+}m", orh_delta as i64),
            kpi_delta_color(Kpi::Orh, orh_delta),
        );

        let col15_delta = kpis.avg_collection_over_15_v2 - kpis.avg_collection_over_15_v1;
        kpi_card(
            ui,
            "COLLECTION > 15 MIN",
            format!("{:.1}%", kpis.avg_collection_over_15_v2),
            format!("RBM 1.0: {:.1}%", kpis.avg_collection_over_15_v1),
            format!("{col15_delta:+.1}%"),
            kpi_delta_color(Kpi::CollectionOver15, col15_delta),
        );

        threshold_card(ui, kpis);
    });
}

/// One KPI card: header, headline value, RBM 1.0 baseline, colored delta.
fn kpi_card(
    ui: &mut Ui,
    title: &str,
    value: String,
    subtitle: String,
    delta: String,
    delta_color: Color32,
) {
    egui::Frame::group(ui.style())
        .inner_margin(Margin::same(10))
        .show(ui, |ui: &mut Ui| {
            ui.vertical(|ui: &mut Ui| {
                ui.label(RichText::new(title).small().weak());
                ui.label(RichText::new(value).size(24.0).strong());
                ui.label(RichText::new(subtitle).small());
                ui.label(RichText::new(delta).color(delta_color).strong());
            });
        });
}

/// The ORH-variation card: flagged cluster count and share of route volume.
fn threshold_card(ui: &mut Ui, kpis: &KpiSet) {
    egui::Frame::group(ui.style())
        .inner_margin(Margin::same(10))
        .show(ui, |ui: &mut Ui| {
            ui.vertical(|ui: &mut Ui| {
                ui.label(RichText::new("ORH VAR ≥ 40 MIN").small().weak());
                ui.label(
                    RichText::new(format!(
                        "{}/{}",
                        kpis.clusters_over_threshold, kpis.cluster_count
                    ))
                    .size(24.0)
                    .strong(),
                );
                ui.label(RichText::new(format!("{:.1}% of volume", kpis.volume_percentage)).small());
                ui.label(
                    RichText::new(format!(
                        "{} of {} routes",
                        kpis.routes_in_threshold_clusters, kpis.total_routes_v2
                    ))
                    .small(),
                );
            });
        });
}

// ---------------------------------------------------------------------------
// Comparison table
// ---------------------------------------------------------------------------

fn comparison_table(ui: &mut Ui, view: &TableView) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(true)
        .columns(Column::auto().at_least(70.0), view.columns.len())
        .header(22.0, |mut header| {
            for label in &view.columns {
                header.col(|ui| {
                    ui.strong(label.as_str());
                });
            }
        })
        .body(|body| {
            body.rows(20.0, view.rows.len(), |mut row| {
                let cells = &view.rows[row.index()];
                for (label, cell) in view.columns.iter().zip(cells) {
                    row.col(|ui| {
                        match delta_cell_color(cell).filter(|_| is_delta_column(label)) {
                            Some(color) => {
                                ui.colored_label(color, cell.as_str());
                            }
                            None => {
                                ui.label(cell.as_str());
                            }
                        }
                    });
                }
            });
        });
}
