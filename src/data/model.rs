use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// ClusterRecord – one row of the source export
// ---------------------------------------------------------------------------

/// One normalized row of the cluster export: every metric paired as
/// RBM 1.0 (`*_v1`) vs RBM 2.0 (`*_v2`).
///
/// Records are immutable after ingestion; filtered views are recomputed
/// from the full set rather than mutating it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterRecord {
    /// Cluster identifier. Uniqueness is not enforced; duplicate names
    /// simply appear as separate rows.
    pub cluster: String,

    /// Operational routing hours, in signed minutes.
    pub orh_v1: f64,
    pub orh_v2: f64,

    /// Average route start, display-only (never parsed).
    pub start_v1: String,
    pub start_v2: String,
    /// Average route end, display-only.
    pub end_v1: String,
    pub end_v2: String,
    /// Average ETA, display-only.
    pub eta_v1: String,
    pub eta_v2: String,
    /// Displacement to the cross-dock, display-only.
    pub xd_v1: String,
    pub xd_v2: String,

    /// Vehicle occupancy, percent.
    pub occupancy_v1: f64,
    pub occupancy_v2: f64,

    pub km_v1: f64,
    pub km_v2: f64,

    /// Share of collections taking over 15 minutes, percent.
    pub collection_over_15_v1: f64,
    pub collection_over_15_v2: f64,

    pub stops_per_route_v1: f64,
    pub stops_per_route_v2: f64,

    /// Routing efficiency score, unit-less.
    pub spr_v1: f64,
    pub spr_v2: f64,

    pub route_count_v1: u32,
    pub route_count_v2: u32,

    /// ORH difference in signed minutes, taken verbatim from the `DIF ORH`
    /// column. The exported column is authoritative even when it disagrees
    /// with `orh_v2 - orh_v1`.
    pub orh_diff: f64,
}

// ---------------------------------------------------------------------------
// Report – the complete ingested file
// ---------------------------------------------------------------------------

/// All records that survived ingestion, plus per-row skip warnings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    /// Normalized rows, in source order.
    pub records: Vec<ClusterRecord>,
    /// One message per skipped row, carrying the data-row index.
    pub warnings: Vec<String>,
}

impl Report {
    /// Number of normalized records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the report holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cluster names in source order, deduplicated for the filter UI.
    /// Rows sharing a name toggle together.
    pub fn cluster_names(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut names = Vec::new();
        for record in &self.records {
            if seen.insert(record.cluster.clone()) {
                names.push(record.cluster.clone());
            }
        }
        names
    }
}
