use std::collections::BTreeSet;

use crate::data::aggregate::{aggregate, KpiSet};
use crate::data::filter::{ClusterFilter, FilterConfig};
use crate::data::model::Report;
use crate::data::table::{build_table, TableView};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Ingested report (None until the user loads a file).
    pub report: Option<Report>,

    /// Fleet-wide KPIs, computed once per loaded file over all records.
    pub kpis: Option<KpiSet>,

    /// Current view configuration (cluster subset + column toggles).
    pub filter: FilterConfig,

    /// The built comparison table for the current filter (cached).
    pub table: Option<TableView>,

    /// Why the table is empty, when it is.
    pub filter_notice: Option<String>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded report: reset filters, compute KPIs, build.
    pub fn set_report(&mut self, report: Report) {
        self.kpis = Some(aggregate(&report.records));
        self.filter = FilterConfig::default();
        self.report = Some(report);
        self.status_message = None;
        self.rebuild();
    }

    /// Recompute the cached table after any filter change. A full rebuild
    /// each time; there is no incremental path.
    pub fn rebuild(&mut self) {
        let built = self
            .report
            .as_ref()
            .map(|report| build_table(&report.records, &self.filter));
        match built {
            None => {
                self.table = None;
                self.filter_notice = None;
            }
            Some(Ok(view)) => {
                self.table = Some(view);
                self.filter_notice = None;
            }
            Some(Err(e)) => {
                self.table = None;
                self.filter_notice = Some(e.to_string());
            }
        }
    }

    /// Cluster names available for filtering, in source order.
    pub fn cluster_names(&self) -> Vec<String> {
        self.report
            .as_ref()
            .map(Report::cluster_names)
            .unwrap_or_default()
    }

    pub fn all_clusters_selected(&self) -> bool {
        matches!(self.filter.clusters, ClusterFilter::All)
    }

    /// Switch between "all clusters" and an explicit subset seeded with
    /// every cluster.
    pub fn set_all_clusters(&mut self, all: bool) {
        self.filter.clusters = if all {
            ClusterFilter::All
        } else {
            ClusterFilter::Selected(self.cluster_names().into_iter().collect())
        };
        self.rebuild();
    }

    /// Toggle one cluster, materializing the explicit subset from "all"
    /// first when needed.
    pub fn toggle_cluster(&mut self, name: &str) {
        let mut selected: BTreeSet<String> = match &self.filter.clusters {
            ClusterFilter::All => self.cluster_names().into_iter().collect(),
            ClusterFilter::Selected(names) => names.clone(),
        };
        if !selected.remove(name) {
            selected.insert(name.to_string());
        }
        self.filter.clusters = ClusterFilter::Selected(selected);
        self.rebuild();
    }

    /// Select every cluster.
    pub fn select_all_clusters(&mut self) {
        self.filter.clusters = ClusterFilter::All;
        self.rebuild();
    }

    /// Clear the cluster selection. The table goes away until something is
    /// selected again.
    pub fn select_no_clusters(&mut self) {
        self.filter.clusters = ClusterFilter::Selected(BTreeSet::new());
        self.rebuild();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ClusterRecord;

    #[test]
    fn test_set_report_builds_table_and_kpis() {
        let mut state = AppState::default();
        state.set_report(report(&["A", "B"]));

        assert!(state.kpis.is_some());
        assert_eq!(state.table.as_ref().unwrap().rows.len(), 2);
        assert!(state.filter_notice.is_none());
    }

    #[test]
    fn test_deselecting_everything_sets_notice() {
        let mut state = AppState::default();
        state.set_report(report(&["A"]));

        state.select_no_clusters();
        assert!(state.table.is_none());
        assert_eq!(state.filter_notice.as_deref(), Some("no cluster selected"));

        state.select_all_clusters();
        assert!(state.table.is_some());
        assert!(state.filter_notice.is_none());
    }

    #[test]
    fn test_toggle_from_all_materializes_subset() {
        let mut state = AppState::default();
        state.set_report(report(&["A", "B"]));

        state.toggle_cluster("A");
        assert!(!state.all_clusters_selected());
        assert!(!state.filter.clusters.is_selected("A"));
        assert!(state.filter.clusters.is_selected("B"));
        assert_eq!(state.table.as_ref().unwrap().rows.len(), 1);

        state.toggle_cluster("A");
        assert_eq!(state.table.as_ref().unwrap().rows.len(), 2);
    }

    #[test]
    fn test_new_report_resets_filters() {
        let mut state = AppState::default();
        state.set_report(report(&["A", "B"]));
        state.toggle_cluster("A");
        state.filter.columns.orh = false;

        state.set_report(report(&["C"]));
        assert!(state.all_clusters_selected());
        assert!(state.filter.columns.orh);
    }

    // Helpers

    fn report(clusters: &[&str]) -> Report {
        Report {
            records: clusters
                .iter()
                .map(|name| ClusterRecord {
                    cluster: name.to_string(),
                    route_count_v1: 1,
                    route_count_v2: 1,
                    ..Default::default()
                })
                .collect(),
            warnings: Vec::new(),
        }
    }
}
