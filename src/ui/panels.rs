use anyhow::Context;
use chrono::Local;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::{export_filename, to_csv_bytes};
use crate::data::loader;
use crate::state::AppState;

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
        });

        ui.separator();

        let loaded = state.report.as_ref().map(|r| r.len());
        let visible = state.table.as_ref().map(|t| t.rows.len()).unwrap_or(0);
        if let Some(count) = loaded {
            ui.label(format!("{count} cluster rows loaded, {visible} visible"));
            ui.separator();
            if ui.button("Download CSV").clicked() {
                export_dialog(state);
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.report.is_none() {
        ui.label("No report loaded.");
        return;
    }

    let cluster_names = state.cluster_names();
    let warnings: Vec<String> = state
        .report
        .as_ref()
        .map(|r| r.warnings.clone())
        .unwrap_or_default();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Cluster visibility ----
            let total = cluster_names.len();
            let selected = cluster_names
                .iter()
                .filter(|name| state.filter.clusters.is_selected(name))
                .count();

            egui::CollapsingHeader::new(
                RichText::new(format!("Clusters  ({selected}/{total})")).strong(),
            )
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                let mut all = state.all_clusters_selected();
                if ui.checkbox(&mut all, "All clusters").changed() {
                    state.set_all_clusters(all);
                }

                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("All").clicked() {
                        state.select_all_clusters();
                    }
                    if ui.small_button("None").clicked() {
                        state.select_no_clusters();
                    }
                });

                for name in &cluster_names {
                    let mut checked = state.filter.clusters.is_selected(name);
                    if ui.checkbox(&mut checked, name).changed() {
                        state.toggle_cluster(name);
                    }
                }
            });

            ui.separator();

            // ---- Column groups ----
            egui::CollapsingHeader::new(RichText::new("Time metrics").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    let cols = &mut state.filter.columns;
                    ui.checkbox(&mut cols.orh, "ORH");
                    ui.checkbox(&mut cols.start, "START");
                    ui.checkbox(&mut cols.end, "END");
                    ui.checkbox(&mut cols.eta, "ETA");
                    ui.checkbox(&mut cols.xd, "XD");
                    ui.checkbox(&mut cols.collection_over_15, "COLLECTION>15");
                });

            egui::CollapsingHeader::new(RichText::new("Operational metrics").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    let cols = &mut state.filter.columns;
                    ui.checkbox(&mut cols.spr, "SPR");
                    ui.checkbox(&mut cols.km, "KM");
                    ui.checkbox(&mut cols.occupancy, "OCCUPANCY");
                    ui.checkbox(&mut cols.route_count, "ROUTE COUNT");
                    ui.checkbox(&mut cols.stops, "STOPS");
                });

            // ---- Import warnings ----
            if !warnings.is_empty() {
                ui.separator();
                egui::CollapsingHeader::new(format!("Import warnings ({})", warnings.len()))
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        for warning in &warnings {
                            ui.label(RichText::new(warning).color(Color32::YELLOW).small());
                        }
                    });
            }
        });

    // Recompute the table after any checkbox changes.
    state.rebuild();
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

/// Prompt for a cluster export and ingest it.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open cluster analysis export")
        .add_filter("CSV", &["csv"])
        .pick_file();

    let Some(path) = file else { return };

    let loaded = std::fs::read(&path)
        .with_context(|| format!("reading {}", path.display()))
        .and_then(|bytes| loader::ingest(&bytes).map_err(anyhow::Error::new));

    match loaded {
        Ok(report) => {
            log::info!(
                "loaded {} cluster rows from {} ({} skipped)",
                report.len(),
                path.display(),
                report.warnings.len()
            );
            state.set_report(report);
        }
        Err(e) => {
            log::error!("failed to load {}: {e:#}", path.display());
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

/// Prompt for a destination and write the current table as CSV.
pub fn export_dialog(state: &mut AppState) {
    let Some(view) = &state.table else { return };

    let file = rfd::FileDialog::new()
        .set_title("Save filtered table")
        .set_file_name(export_filename(Local::now()))
        .add_filter("CSV", &["csv"])
        .save_file();

    let Some(path) = file else { return };

    let written = to_csv_bytes(view).and_then(|bytes| {
        std::fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))
    });

    match written {
        Ok(()) => {
            log::info!("exported table to {}", path.display());
            state.status_message = Some(format!("Saved {}", path.display()));
        }
        Err(e) => {
            log::error!("export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
