use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use super::table::TableView;

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Serialize a built table to CSV bytes: UTF-8, header row first, columns
/// exactly as displayed.
pub fn to_csv_bytes(view: &TableView) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&view.columns)
        .context("writing CSV header")?;
    for row in &view.rows {
        writer.write_record(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV writer")?;
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("recovering CSV buffer: {}", e.error()))
}

/// Download name for an export triggered at `now`:
/// `cluster_analysis_<YYYYMMDD_HHMMSS>.csv`.
pub fn export_filename(now: DateTime<Local>) -> String {
    format!("cluster_analysis_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_export_matches_table_layout() {
        let view = sample_view();
        let bytes = to_csv_bytes(&view).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("CLUSTER,ORH RBM 1.0,ORH Diff"));
        assert_eq!(lines.next(), Some("⚠️ CAMPINAS,07:30,-45m"));
        assert_eq!(lines.next(), Some("SANTOS,06:00,+10m"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_export_round_trips_through_csv_reader() {
        let view = sample_view();
        let bytes = to_csv_bytes(&view).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(|h| h.to_string())
            .collect();
        assert_eq!(headers, view.columns);

        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(|c| c.to_string()).collect())
            .collect();
        assert_eq!(rows, view.rows);
    }

    #[test]
    fn test_cells_with_commas_are_quoted() {
        let view = TableView {
            columns: vec!["CLUSTER".to_string()],
            rows: vec![vec!["SÃO PAULO, LESTE".to_string()]],
        };
        let text = String::from_utf8(to_csv_bytes(&view).unwrap()).unwrap();
        assert_eq!(text, "CLUSTER\n\"SÃO PAULO, LESTE\"\n");
    }

    #[test]
    fn test_export_filename_pattern() {
        let stamp = Local.with_ymd_and_hms(2025, 3, 7, 14, 5, 9).unwrap();
        assert_eq!(export_filename(stamp), "cluster_analysis_20250307_140509.csv");
    }

    // Helpers

    fn sample_view() -> TableView {
        TableView {
            columns: vec![
                "CLUSTER".to_string(),
                "ORH RBM 1.0".to_string(),
                "ORH Diff".to_string(),
            ],
            rows: vec![
                vec![
                    "⚠️ CAMPINAS".to_string(),
                    "07:30".to_string(),
                    "-45m".to_string(),
                ],
                vec!["SANTOS".to_string(), "06:00".to_string(), "+10m".to_string()],
            ],
        }
    }
}
