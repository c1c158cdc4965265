use eframe::egui::Color32;

use crate::data::aggregate::Kpi;

// ---------------------------------------------------------------------------
// Delta colors
// ---------------------------------------------------------------------------

/// Green for improving deltas.
pub const DELTA_GOOD: Color32 = Color32::from_rgb(0x10, 0xb9, 0x81);
/// Red for regressing deltas.
pub const DELTA_BAD: Color32 = Color32::from_rgb(0xef, 0x44, 0x44);

/// Color for a KPI card delta, following the per-KPI polarity table.
pub fn kpi_delta_color(kpi: Kpi, delta: f64) -> Color32 {
    if kpi.delta_improved(delta) {
        DELTA_GOOD
    } else {
        DELTA_BAD
    }
}

/// Color for a formatted table delta cell.
///
/// Table cells are colored by sign alone (`+` green, `-` red), unlike the
/// KPI cards, which apply the per-metric polarity.
pub fn delta_cell_color(cell: &str) -> Option<Color32> {
    match cell.as_bytes().first() {
        Some(b'+') => Some(DELTA_GOOD),
        Some(b'-') => Some(DELTA_BAD),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kpi_card_color_follows_polarity() {
        assert_eq!(kpi_delta_color(Kpi::RouteCount, -3.0), DELTA_GOOD);
        assert_eq!(kpi_delta_color(Kpi::Orh, 5.0), DELTA_BAD);
        assert_eq!(kpi_delta_color(Kpi::Orh, 0.0), DELTA_GOOD);
    }

    #[test]
    fn test_table_cell_color_is_sign_based() {
        assert_eq!(delta_cell_color("+4.2"), Some(DELTA_GOOD));
        assert_eq!(delta_cell_color("-45m"), Some(DELTA_BAD));
        assert_eq!(delta_cell_color("07:30"), None);
        assert_eq!(delta_cell_color(""), None);
    }
}
