use super::model::ClusterRecord;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// ORH-difference magnitude (minutes) at which a cluster draws attention.
pub const ORH_DIFF_THRESHOLD_MINUTES: f64 = 40.0;

/// Whether a record counts toward the threshold KPIs. The bound is
/// inclusive here; the per-row table marker uses a strict one.
pub fn over_threshold(record: &ClusterRecord) -> bool {
    record.orh_diff.abs() >= ORH_DIFF_THRESHOLD_MINUTES
}

// ---------------------------------------------------------------------------
// KpiSet – fleet-wide indicators
// ---------------------------------------------------------------------------

/// Summary indicators over the full record set, feeding the KPI cards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiSet {
    pub cluster_count: usize,
    pub total_routes_v1: u64,
    pub total_routes_v2: u64,
    pub avg_spr_v1: f64,
    pub avg_spr_v2: f64,
    pub avg_stops_v1: f64,
    pub avg_stops_v2: f64,
    pub avg_orh_v1: f64,
    pub avg_orh_v2: f64,
    pub avg_collection_over_15_v1: f64,
    pub avg_collection_over_15_v2: f64,
    /// Records with `abs(orh_diff) >= 40` minutes.
    pub clusters_over_threshold: usize,
    /// Sum of `route_count_v2` over those records.
    pub routes_in_threshold_clusters: u64,
    /// Their share of `total_routes_v2`, as a percentage.
    pub volume_percentage: f64,
}

/// Compute the fleet-wide KPIs in one pass over all records.
///
/// Means are 0 for an empty record set instead of NaN.
pub fn aggregate(records: &[ClusterRecord]) -> KpiSet {
    let mean = |field: fn(&ClusterRecord) -> f64| -> f64 {
        if records.is_empty() {
            0.0
        } else {
            records.iter().map(field).sum::<f64>() / records.len() as f64
        }
    };

    let total_routes_v1 = records.iter().map(|r| u64::from(r.route_count_v1)).sum();
    let total_routes_v2: u64 = records.iter().map(|r| u64::from(r.route_count_v2)).sum();

    let clusters_over_threshold = records.iter().filter(|r| over_threshold(r)).count();
    let routes_in_threshold_clusters: u64 = records
        .iter()
        .filter(|r| over_threshold(r))
        .map(|r| u64::from(r.route_count_v2))
        .sum();

    KpiSet {
        cluster_count: records.len(),
        total_routes_v1,
        total_routes_v2,
        avg_spr_v1: mean(|r| r.spr_v1),
        avg_spr_v2: mean(|r| r.spr_v2),
        avg_stops_v1: mean(|r| r.stops_per_route_v1),
        avg_stops_v2: mean(|r| r.stops_per_route_v2),
        avg_orh_v1: mean(|r| r.orh_v1),
        avg_orh_v2: mean(|r| r.orh_v2),
        avg_collection_over_15_v1: mean(|r| r.collection_over_15_v1),
        avg_collection_over_15_v2: mean(|r| r.collection_over_15_v2),
        clusters_over_threshold,
        routes_in_threshold_clusters,
        volume_percentage: pct(routes_in_threshold_clusters, total_routes_v2),
    }
}

/// Share of `part` in `total` as a percentage; 0 when the total is 0.
pub fn pct(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

// ---------------------------------------------------------------------------
// Per-KPI delta polarity
// ---------------------------------------------------------------------------

/// The comparison KPIs shown as cards, each with its own delta polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kpi {
    RouteCount,
    Spr,
    StopsPerRoute,
    Orh,
    CollectionOver15,
}

impl Kpi {
    /// Whether a v2 − v1 delta is an improvement for this KPI.
    ///
    /// The zero edge is uneven on purpose: an unchanged ORH or collection
    /// rate counts as an improvement, an unchanged route count, SPR, or
    /// stop density does not.
    pub fn delta_improved(self, delta: f64) -> bool {
        match self {
            Kpi::RouteCount => delta < 0.0,
            Kpi::Spr | Kpi::StopsPerRoute => delta > 0.0,
            Kpi::Orh | Kpi::CollectionOver15 => delta <= 0.0,
        }
    }
}
