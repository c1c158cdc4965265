use std::collections::BTreeSet;

use thiserror::Error;

use super::model::ClusterRecord;

// ---------------------------------------------------------------------------
// Filter configuration
// ---------------------------------------------------------------------------

/// Which clusters are visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterFilter {
    /// Every cluster in the report (the default).
    All,
    /// Only the named clusters. An empty set selects nothing.
    Selected(BTreeSet<String>),
}

impl ClusterFilter {
    pub fn is_selected(&self, cluster: &str) -> bool {
        match self {
            ClusterFilter::All => true,
            ClusterFilter::Selected(names) => names.contains(cluster),
        }
    }
}

/// The eleven column-group toggles, all visible by default.
///
/// Each toggle controls both version columns of its group plus the delta
/// column, where the group defines one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnToggles {
    pub orh: bool,
    pub start: bool,
    pub end: bool,
    pub eta: bool,
    pub xd: bool,
    pub collection_over_15: bool,
    pub spr: bool,
    pub km: bool,
    pub occupancy: bool,
    pub route_count: bool,
    pub stops: bool,
}

impl Default for ColumnToggles {
    fn default() -> Self {
        Self {
            orh: true,
            start: true,
            end: true,
            eta: true,
            xd: true,
            collection_over_15: true,
            spr: true,
            km: true,
            occupancy: true,
            route_count: true,
            stops: true,
        }
    }
}

/// Immutable view configuration handed to the table builder.
///
/// The UI owns the mutable selection state across interactions; the
/// pipeline only ever reads a snapshot of it.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    pub clusters: ClusterFilter,
    pub columns: ColumnToggles,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            clusters: ClusterFilter::All,
            columns: ColumnToggles::default(),
        }
    }
}

/// The current selection cannot produce a table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("no cluster selected")]
    NoClusterSelected,
}

// ---------------------------------------------------------------------------
// Cluster filtering
// ---------------------------------------------------------------------------

/// Indices of records passing the cluster filter, in source order.
///
/// An empty result is an error rather than an empty table: the UI surfaces
/// it as a "no cluster selected" notice and renders nothing.
pub fn filtered_indices(
    records: &[ClusterRecord],
    filter: &ClusterFilter,
) -> Result<Vec<usize>, FilterError> {
    let indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| filter.is_selected(&record.cluster))
        .map(|(i, _)| i)
        .collect();

    if indices.is_empty() {
        return Err(FilterError::NoClusterSelected);
    }
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_passes_everything_in_source_order() {
        let records = vec![named("C"), named("A"), named("B")];
        let indices = filtered_indices(&records, &ClusterFilter::All).unwrap();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_subset_keeps_source_order() {
        let records = vec![named("C"), named("A"), named("B")];
        let filter = ClusterFilter::Selected(selection(&["B", "C"]));
        assert_eq!(filtered_indices(&records, &filter).unwrap(), vec![0, 2]);
    }

    #[test]
    fn test_duplicate_cluster_rows_toggle_together() {
        let records = vec![named("A"), named("B"), named("A")];
        let filter = ClusterFilter::Selected(selection(&["A"]));
        assert_eq!(filtered_indices(&records, &filter).unwrap(), vec![0, 2]);
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let records = vec![named("A")];
        let filter = ClusterFilter::Selected(BTreeSet::new());
        assert_eq!(
            filtered_indices(&records, &filter),
            Err(FilterError::NoClusterSelected)
        );
    }

    #[test]
    fn test_selection_matching_nothing_is_an_error() {
        let records = vec![named("A")];
        let filter = ClusterFilter::Selected(selection(&["Z"]));
        assert_eq!(
            filtered_indices(&records, &filter),
            Err(FilterError::NoClusterSelected)
        );
    }

    #[test]
    fn test_default_config_shows_all_columns() {
        let config = FilterConfig::default();
        assert_eq!(config.clusters, ClusterFilter::All);
        assert!(config.columns.orh && config.columns.xd && config.columns.stops);
    }

    // Helpers

    fn named(cluster: &str) -> ClusterRecord {
        ClusterRecord {
            cluster: cluster.to_string(),
            ..Default::default()
        }
    }

    fn selection(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }
}
