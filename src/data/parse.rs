//! Cell parsers for the semi-structured fields of the cluster export.
//!
//! All parsers are total: a malformed cell degrades to 0 instead of failing
//! the pipeline. The upstream sheet writes `-` for missing values, uses
//! decimal commas, and mixes `HH:MM` with `HH:MM:SS` in the same column.

/// Parse a clock duration (`HH:MM` or `HH:MM:SS`) into signed minutes.
///
/// A leading `-` negates the whole duration. Missing segments count as 0,
/// seconds contribute fractionally, and the `-`/empty sentinel or any
/// non-numeric segment yields 0.
pub fn parse_duration_to_minutes(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return 0.0;
    }
    let (sign, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed),
    };

    // Segments beyond seconds are ignored, as the source never emits them.
    let mut segments = body.split(':');
    let hours = clock_segment(segments.next());
    let minutes = clock_segment(segments.next());
    let seconds = clock_segment(segments.next());

    match (hours, minutes, seconds) {
        (Some(h), Some(m), Some(s)) => sign * (h as f64 * 60.0 + m as f64 + s as f64 / 60.0),
        _ => 0.0,
    }
}

/// A missing segment counts as zero; a non-numeric one poisons the parse.
fn clock_segment(segment: Option<&str>) -> Option<i64> {
    match segment {
        None => Some(0),
        Some(s) => s.trim().parse::<i64>().ok(),
    }
}

/// Format minutes back into a magnitude-only `HH:MM` clock string.
///
/// Zero and NaN render as `-`, mirroring the sentinel used on ingestion.
pub fn format_minutes_to_clock(minutes: f64) -> String {
    if minutes == 0.0 || minutes.is_nan() {
        return "-".to_string();
    }
    let magnitude = minutes.abs();
    let hours = (magnitude / 60.0) as i64;
    let mins = (magnitude % 60.0) as i64;
    format!("{hours:02}:{mins:02}")
}

/// Parse a percentage cell (`12,5%`) into its numeric value.
pub fn parse_percentage(text: &str) -> f64 {
    parse_number(&text.replace('%', ""))
}

/// Parse a decimal-comma-aware number cell.
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return 0.0;
    }
    trimmed.replace(',', ".").parse::<f64>().unwrap_or(0.0)
}
