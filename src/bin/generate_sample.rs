//! Writes a deterministic sample cluster export (`sample_cluster_analysis.csv`)
//! so the dashboard can be tried without a real RBM export.

use cluster_compare::data::loader::SourceRow;
use cluster_compare::data::parse::format_minutes_to_clock;

/// Minimal deterministic PRNG (splitmix64).
struct SampleRng {
    state: u64,
}

impl SampleRng {
    fn new(seed: u64) -> Self {
        SampleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform float in [lo, hi).
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + unit * (hi - lo)
    }

    fn int_range(&mut self, lo: u32, hi: u32) -> u32 {
        lo + (self.next_u64() % u64::from(hi - lo)) as u32
    }
}

/// Decimal-comma rendering, as the upstream sheet writes numbers.
fn comma(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}").replace('.', ",")
}

fn comma_pct(value: f64) -> String {
    format!("{}%", comma(value, 1))
}

/// Clock string with an explicit sign for negative durations.
fn signed_clock(minutes: f64) -> String {
    if minutes < 0.0 {
        format!("-{}", format_minutes_to_clock(minutes))
    } else {
        format_minutes_to_clock(minutes)
    }
}

fn main() {
    let mut rng = SampleRng::new(7);

    let clusters = [
        "CAMPINAS",
        "SOROCABA",
        "SANTOS",
        "OSASCO",
        "GUARULHOS",
        "BARUERI",
        "JUNDIAÍ",
        "SÃO BERNARDO",
        "RIBEIRÃO PRETO",
        "BAURU",
        "LONDRINA",
        "CURITIBA",
    ];

    let output_path = "sample_cluster_analysis.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");

    for cluster in clusters {
        let orh_v1 = rng.range(360.0, 660.0).round();
        // Skewed so a handful of clusters drift past the 40-minute alert.
        let drift = rng.range(-75.0, 55.0).round();
        let orh_v2 = (orh_v1 + drift).max(1.0);

        let start_v1 = rng.range(420.0, 500.0).round();
        let end_v1 = rng.range(960.0, 1050.0).round();
        let eta_v1 = end_v1 - rng.range(20.0, 60.0).round();
        let xd_v1 = rng.range(18.0, 45.0).round();

        let routes_v1 = rng.int_range(18, 60);
        let route_delta = rng.int_range(0, 9) as i64 - 5;
        let routes_v2 = (i64::from(routes_v1) + route_delta).max(1) as u32;

        let spr_v1 = rng.range(130.0, 180.0);
        let stops_v1 = rng.range(38.0, 52.0);

        let row = SourceRow {
            cluster: cluster.to_string(),
            orh_v2: signed_clock(orh_v2),
            orh_v1: signed_clock(orh_v1),
            start_v2: format_minutes_to_clock(start_v1 - rng.range(0.0, 30.0).round()),
            start_v1: format_minutes_to_clock(start_v1),
            end_v2: format_minutes_to_clock(end_v1 - rng.range(0.0, 45.0).round()),
            end_v1: format_minutes_to_clock(end_v1),
            eta_v2: format_minutes_to_clock(eta_v1 - rng.range(0.0, 30.0).round()),
            eta_v1: format_minutes_to_clock(eta_v1),
            occupancy_v2: comma_pct(rng.range(72.0, 96.0)),
            occupancy_v1: comma_pct(rng.range(65.0, 90.0)),
            km_v2: comma(rng.range(90.0, 160.0), 1),
            km_v1: comma(rng.range(100.0, 175.0), 1),
            collection_over_15_v2: comma_pct(rng.range(4.0, 14.0)),
            collection_over_15_v1: comma_pct(rng.range(8.0, 20.0)),
            stops_per_route_v2: comma(stops_v1 + rng.range(-2.0, 6.0), 1),
            stops_per_route_v1: comma(stops_v1, 1),
            spr_v2: comma(spr_v1 + rng.range(-8.0, 20.0), 0),
            spr_v1: comma(spr_v1, 0),
            route_count_v2: routes_v2.to_string(),
            route_count_v1: routes_v1.to_string(),
            orh_diff: signed_clock(drift),
            xd_v2: format_minutes_to_clock(xd_v1 - rng.range(-5.0, 10.0).round()),
            xd_v1: format_minutes_to_clock(xd_v1),
        };

        writer.serialize(row).expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output file");
    println!("Wrote {} cluster rows to {output_path}", clusters.len());
}
