use super::aggregate::ORH_DIFF_THRESHOLD_MINUTES;
use super::filter::{filtered_indices, ColumnToggles, FilterConfig, FilterError};
use super::model::ClusterRecord;
use super::parse::format_minutes_to_clock;

// ---------------------------------------------------------------------------
// TableView – the assembled comparison table
// ---------------------------------------------------------------------------

/// Marker prepended to a cluster name whose ORH drift warrants attention.
pub const ALERT_PREFIX: &str = "⚠️ ";

/// Suffix shared by every delta column label.
pub const DELTA_SUFFIX: &str = " Diff";

/// The built comparison table: one label per column, one formatted cell per
/// row and column. The same shape feeds the on-screen table and the CSV
/// export, so the layouts cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Whether a column label names a delta column (colored by sign in the UI).
pub fn is_delta_column(label: &str) -> bool {
    label.ends_with(DELTA_SUFFIX)
}

// ---------------------------------------------------------------------------
// Table building
// ---------------------------------------------------------------------------

/// Build the filtered, formatted comparison table.
///
/// Rows come out in source order; the column set is derived from the
/// toggles. The build is a pure function of its inputs: identical records
/// and config produce identical output.
pub fn build_table(
    records: &[ClusterRecord],
    config: &FilterConfig,
) -> Result<TableView, FilterError> {
    let indices = filtered_indices(records, &config.clusters)?;

    let columns = column_labels(&config.columns);
    let rows = indices
        .iter()
        .map(|&i| row_cells(&records[i], &config.columns))
        .collect();

    Ok(TableView { columns, rows })
}

/// Column labels for the enabled groups, in fixed display order.
fn column_labels(toggles: &ColumnToggles) -> Vec<String> {
    let mut labels = vec!["CLUSTER".to_string()];
    {
        let mut group = |name: &str, with_delta: bool| {
            labels.push(format!("{name} RBM 1.0"));
            labels.push(format!("{name} RBM 2.0"));
            if with_delta {
                labels.push(format!("{name}{DELTA_SUFFIX}"));
            }
        };

        if toggles.orh {
            group("ORH", true);
        }
        if toggles.start {
            group("START", false);
        }
        if toggles.end {
            group("END", false);
        }
        if toggles.eta {
            group("ETA", false);
        }
        if toggles.xd {
            group("XD", false);
        }
        if toggles.collection_over_15 {
            group("COL>15", true);
        }
        if toggles.spr {
            group("SPR", true);
        }
        if toggles.km {
            group("KM", true);
        }
        if toggles.occupancy {
            group("OCCUPANCY", true);
        }
        if toggles.route_count {
            group("ROUTES", true);
        }
        if toggles.stops {
            group("STOPS", true);
        }
    }
    labels
}

/// Formatted cells for one record, aligned with [`column_labels`].
fn row_cells(record: &ClusterRecord, toggles: &ColumnToggles) -> Vec<String> {
    let mut cells = Vec::new();

    // Strictly greater than the threshold: a drift of exactly 40 minutes is
    // counted by the aggregate KPI but not flagged on the row.
    if record.orh_diff.abs() > ORH_DIFF_THRESHOLD_MINUTES {
        cells.push(format!("{ALERT_PREFIX}{}", record.cluster));
    } else {
        cells.push(record.cluster.clone());
    }

    if toggles.orh {
        cells.push(format_minutes_to_clock(record.orh_v1));
        cells.push(format_minutes_to_clock(record.orh_v2));
        cells.push(format!("{:+}m", record.orh_diff as i64));
    }
    if toggles.start {
        cells.push(record.start_v1.clone());
        cells.push(record.start_v2.clone());
    }
    if toggles.end {
        cells.push(record.end_v1.clone());
        cells.push(record.end_v2.clone());
    }
    if toggles.eta {
        cells.push(record.eta_v1.clone());
        cells.push(record.eta_v2.clone());
    }
    if toggles.xd {
        cells.push(record.xd_v1.clone());
        cells.push(record.xd_v2.clone());
    }
    if toggles.collection_over_15 {
        cells.push(format!("{:.1}%", record.collection_over_15_v1));
        cells.push(format!("{:.1}%", record.collection_over_15_v2));
        cells.push(format!(
            "{:+.1}%",
            record.collection_over_15_v2 - record.collection_over_15_v1
        ));
    }
    if toggles.spr {
        cells.push(format!("{:.0}", record.spr_v1));
        cells.push(format!("{:.0}", record.spr_v2));
        cells.push(format!("{:+.0}", record.spr_v2 - record.spr_v1));
    }
    if toggles.km {
        cells.push(format!("{:.1}", record.km_v1));
        cells.push(format!("{:.1}", record.km_v2));
        cells.push(format!("{:+.1}", record.km_v2 - record.km_v1));
    }
    if toggles.occupancy {
        cells.push(format!("{:.1}%", record.occupancy_v1));
        cells.push(format!("{:.1}%", record.occupancy_v2));
        cells.push(format!(
            "{:+.1}%",
            record.occupancy_v2 - record.occupancy_v1
        ));
    }
    if toggles.route_count {
        cells.push(record.route_count_v1.to_string());
        cells.push(record.route_count_v2.to_string());
        cells.push(format!(
            "{:+}",
            i64::from(record.route_count_v2) - i64::from(record.route_count_v1)
        ));
    }
    if toggles.stops {
        cells.push(format!("{:.1}", record.stops_per_route_v1));
        cells.push(format!("{:.1}", record.stops_per_route_v2));
        cells.push(format!(
            "{:+.1}",
            record.stops_per_route_v2 - record.stops_per_route_v1
        ));
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::ClusterFilter;
    use std::collections::BTreeSet;

    #[test]
    fn test_full_layout_has_all_groups() {
        let view = build_table(&[sample_record("A", 10.0)], &FilterConfig::default()).unwrap();

        // CLUSTER + 7 delta groups of 3 + 4 pass-through groups of 2.
        assert_eq!(view.columns.len(), 1 + 7 * 3 + 4 * 2);
        assert_eq!(view.columns[0], "CLUSTER");
        assert_eq!(view.columns[1], "ORH RBM 1.0");
        assert_eq!(view.columns[3], "ORH Diff");
        assert_eq!(*view.columns.last().unwrap(), "STOPS Diff");
        assert_eq!(view.rows[0].len(), view.columns.len());
    }

    #[test]
    fn test_cells_stay_aligned_with_labels_for_every_single_toggle() {
        let record = sample_record("A", 0.0);
        for group in 0..11 {
            let mut toggles = all_off();
            let flag = match group {
                0 => &mut toggles.orh,
                1 => &mut toggles.start,
                2 => &mut toggles.end,
                3 => &mut toggles.eta,
                4 => &mut toggles.xd,
                5 => &mut toggles.collection_over_15,
                6 => &mut toggles.spr,
                7 => &mut toggles.km,
                8 => &mut toggles.occupancy,
                9 => &mut toggles.route_count,
                _ => &mut toggles.stops,
            };
            *flag = true;
            assert_eq!(
                column_labels(&toggles).len(),
                row_cells(&record, &toggles).len(),
                "group {group} out of step"
            );
        }
    }

    #[test]
    fn test_disabled_groups_are_absent() {
        let mut config = FilterConfig::default();
        config.columns.orh = false;
        config.columns.km = false;

        let view = build_table(&[sample_record("A", 10.0)], &config).unwrap();
        assert!(!view.columns.iter().any(|c| c.starts_with("ORH")));
        assert!(!view.columns.iter().any(|c| c.starts_with("KM")));
        assert!(view.columns.iter().any(|c| c == "SPR Diff"));
    }

    #[test]
    fn test_alert_marker_is_strictly_greater_than_threshold() {
        let records = vec![
            sample_record("OVER", 45.0),
            sample_record("AT", 40.0),
            sample_record("NEG", -50.0),
        ];
        let view = build_table(&records, &FilterConfig::default()).unwrap();

        assert_eq!(view.rows[0][0], format!("{ALERT_PREFIX}OVER"));
        // Exactly 40 is counted by the aggregate KPI but not marked here.
        assert_eq!(view.rows[1][0], "AT");
        assert_eq!(view.rows[2][0], format!("{ALERT_PREFIX}NEG"));
    }

    #[test]
    fn test_formatting_per_column_kind() {
        let record = ClusterRecord {
            cluster: "A".to_string(),
            orh_v1: 450.0,
            orh_v2: 405.0,
            orh_diff: -45.0,
            start_v1: "08:10".to_string(),
            start_v2: "07:45".to_string(),
            collection_over_15_v1: 14.8,
            collection_over_15_v2: 9.1,
            spr_v1: 158.0,
            spr_v2: 171.0,
            km_v1: 132.42,
            km_v2: 118.7,
            occupancy_v1: 79.25,
            occupancy_v2: 84.5,
            route_count_v1: 42,
            route_count_v2: 38,
            stops_per_route_v1: 44.1,
            stops_per_route_v2: 48.3,
            ..Default::default()
        };
        let view = build_table(&[record], &FilterConfig::default()).unwrap();
        let row = &view.rows[0];
        let cell = |label: &str| -> &str {
            let idx = view.columns.iter().position(|c| c == label).unwrap();
            &row[idx]
        };

        assert_eq!(cell("ORH RBM 1.0"), "07:30");
        assert_eq!(cell("ORH RBM 2.0"), "06:45");
        assert_eq!(cell("ORH Diff"), "-45m");
        assert_eq!(cell("START RBM 1.0"), "08:10");
        assert_eq!(cell("COL>15 RBM 2.0"), "9.1%");
        assert_eq!(cell("COL>15 Diff"), "-5.7%");
        assert_eq!(cell("SPR RBM 2.0"), "171");
        assert_eq!(cell("SPR Diff"), "+13");
        assert_eq!(cell("KM RBM 1.0"), "132.4");
        assert_eq!(cell("OCCUPANCY Diff"), "+5.2%");
        assert_eq!(cell("ROUTES RBM 2.0"), "38");
        assert_eq!(cell("ROUTES Diff"), "-4");
        assert_eq!(cell("STOPS Diff"), "+4.2");
    }

    #[test]
    fn test_deltas_force_sign_on_non_negative_values() {
        let record = sample_record("A", 0.0);
        let view = build_table(&[record], &FilterConfig::default()).unwrap();
        let row = &view.rows[0];

        for (label, cell) in view.columns.iter().zip(row) {
            if is_delta_column(label) {
                assert!(
                    cell.starts_with('+') || cell.starts_with('-'),
                    "{label} = {cell}"
                );
            }
        }
        let orh_idx = view.columns.iter().position(|c| c == "ORH Diff").unwrap();
        assert_eq!(row[orh_idx], "+0m");
    }

    #[test]
    fn test_orh_diff_delta_truncates_toward_zero() {
        let mut record = sample_record("A", 44.7);
        let view = build_table(&[record.clone()], &FilterConfig::default()).unwrap();
        let orh_idx = view.columns.iter().position(|c| c == "ORH Diff").unwrap();
        assert_eq!(view.rows[0][orh_idx], "+44m");

        record.orh_diff = -44.7;
        let view = build_table(&[record], &FilterConfig::default()).unwrap();
        assert_eq!(view.rows[0][orh_idx], "-44m");
    }

    #[test]
    fn test_build_is_idempotent() {
        let records = vec![sample_record("A", 45.0), sample_record("B", -3.0)];
        let mut config = FilterConfig::default();
        config.clusters = ClusterFilter::Selected(BTreeSet::from(["A".to_string()]));
        config.columns.eta = false;

        let first = build_table(&records, &config).unwrap();
        let second = build_table(&records, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_selection_builds_nothing() {
        let records = vec![sample_record("A", 0.0)];
        let config = FilterConfig {
            clusters: ClusterFilter::Selected(BTreeSet::new()),
            ..FilterConfig::default()
        };
        assert_eq!(
            build_table(&records, &config),
            Err(FilterError::NoClusterSelected)
        );
    }

    // Helpers

    fn sample_record(cluster: &str, orh_diff: f64) -> ClusterRecord {
        ClusterRecord {
            cluster: cluster.to_string(),
            orh_diff,
            ..Default::default()
        }
    }

    fn all_off() -> ColumnToggles {
        ColumnToggles {
            orh: false,
            start: false,
            end: false,
            eta: false,
            xd: false,
            collection_over_15: false,
            spr: false,
            km: false,
            occupancy: false,
            route_count: false,
            stops: false,
        }
    }
}
