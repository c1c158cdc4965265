use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{ClusterRecord, Report};
use super::parse::{parse_duration_to_minutes, parse_number, parse_percentage};

// ---------------------------------------------------------------------------
// Source layout
// ---------------------------------------------------------------------------

/// One raw row of the source export, keyed by the verbatim column headers.
///
/// Header names are reproduced exactly as the upstream sheet emits them,
/// mixed naming included (`MÉDIA FIM DA ROTA` vs `MÉDIA FIM ROTA`,
/// `AVERAGE de CONVERT_KM`). The RBM 1.0 cross-dock header really does end
/// in the letter `O`, not a zero.
///
/// Extra columns in the file are ignored; a missing one fails the row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceRow {
    #[serde(rename = "CLUSTER")]
    pub cluster: String,
    #[serde(rename = "ORH RBM 2.0")]
    pub orh_v2: String,
    #[serde(rename = "ORH RBM 1.0")]
    pub orh_v1: String,
    #[serde(rename = "MÉDIA INÍCIO ROTA RBM 2.0")]
    pub start_v2: String,
    #[serde(rename = "MÉDIA INÍCIO ROTA RBM 1.0")]
    pub start_v1: String,
    #[serde(rename = "MÉDIA FIM DA ROTA RBM 2.0")]
    pub end_v2: String,
    #[serde(rename = "MÉDIA FIM ROTA RBM 1.0")]
    pub end_v1: String,
    #[serde(rename = "MÉDIA ETA RBM 2.0")]
    pub eta_v2: String,
    #[serde(rename = "MÉDIA ETA RBM 1.0")]
    pub eta_v1: String,
    #[serde(rename = "MÉDIA OCUPAÇÃO RBM 2.0")]
    pub occupancy_v2: String,
    #[serde(rename = "MÉDIA OCUPAÇÃO RBM 1.0")]
    pub occupancy_v1: String,
    #[serde(rename = "MÉDIA KM RBM 2.0")]
    pub km_v2: String,
    #[serde(rename = "AVERAGE de CONVERT_KM RBM 1.0")]
    pub km_v1: String,
    #[serde(rename = "COLETA > 15 RBM 2.0")]
    pub collection_over_15_v2: String,
    #[serde(rename = "COLETA > 15 RBM 1.0")]
    pub collection_over_15_v1: String,
    #[serde(rename = "PARADAS POR ROTA RBM 2.0")]
    pub stops_per_route_v2: String,
    #[serde(rename = "PARADAS POR ROTA RBM 1.0")]
    pub stops_per_route_v1: String,
    #[serde(rename = "SPR RBM 2.0")]
    pub spr_v2: String,
    #[serde(rename = "SPR RBM 1.0")]
    pub spr_v1: String,
    #[serde(rename = "QTDE. ROTAS RBM 2.0")]
    pub route_count_v2: String,
    #[serde(rename = "QTDE. ROTAS RBM 1.0")]
    pub route_count_v1: String,
    #[serde(rename = "DIF ORH")]
    pub orh_diff: String,
    #[serde(rename = "DESLOCAMENTO ATÉ O XD RBM 2.0")]
    pub xd_v2: String,
    #[serde(rename = "DESLOCAMENTO ATÉ O XD RBM 1.O")]
    pub xd_v1: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A single row failed normalization. Non-fatal: the row is skipped and a
/// warning is recorded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowParseError {
    #[error("{column}: '{value}' is not a valid route count")]
    RouteCount {
        column: &'static str,
        value: String,
    },
}

/// The whole file is unusable for the current session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    /// Every row failed normalization, or the file had no data rows.
    #[error("no valid data rows in file")]
    NoValidRows,
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// Parse raw CSV bytes into a [`Report`].
///
/// Rows that fail to deserialize (missing column, malformed CSV) or to
/// normalize (non-numeric route count) are skipped with a warning carrying
/// the zero-based data-row index. Ingestion only fails when nothing
/// survives.
pub fn ingest(bytes: &[u8]) -> Result<Report, IngestError> {
    let mut reader = csv::Reader::from_reader(bytes);

    let mut records = Vec::new();
    let mut warnings = Vec::new();

    for (row_no, result) in reader.deserialize::<SourceRow>().enumerate() {
        let normalized = result
            .map_err(|e| e.to_string())
            .and_then(|raw| normalize(&raw).map_err(|e| e.to_string()));
        match normalized {
            Ok(record) => records.push(record),
            Err(reason) => {
                let warning = format!("row {row_no}: {reason}");
                log::warn!("skipping {warning}");
                warnings.push(warning);
            }
        }
    }

    if records.is_empty() {
        return Err(IngestError::NoValidRows);
    }
    log::info!(
        "ingested {} cluster rows ({} skipped)",
        records.len(),
        warnings.len()
    );
    Ok(Report { records, warnings })
}

/// Map one raw row into a typed record.
///
/// The route counts are the only strict fields; every other metric degrades
/// to 0 through the lenient parsers, and the `START`/`END`/`ETA`/`XD`
/// columns pass through untouched.
pub fn normalize(raw: &SourceRow) -> Result<ClusterRecord, RowParseError> {
    Ok(ClusterRecord {
        cluster: raw.cluster.clone(),
        orh_v1: parse_duration_to_minutes(&raw.orh_v1),
        orh_v2: parse_duration_to_minutes(&raw.orh_v2),
        start_v1: raw.start_v1.clone(),
        start_v2: raw.start_v2.clone(),
        end_v1: raw.end_v1.clone(),
        end_v2: raw.end_v2.clone(),
        eta_v1: raw.eta_v1.clone(),
        eta_v2: raw.eta_v2.clone(),
        xd_v1: raw.xd_v1.clone(),
        xd_v2: raw.xd_v2.clone(),
        occupancy_v1: parse_percentage(&raw.occupancy_v1),
        occupancy_v2: parse_percentage(&raw.occupancy_v2),
        km_v1: parse_number(&raw.km_v1),
        km_v2: parse_number(&raw.km_v2),
        collection_over_15_v1: parse_percentage(&raw.collection_over_15_v1),
        collection_over_15_v2: parse_percentage(&raw.collection_over_15_v2),
        stops_per_route_v1: parse_number(&raw.stops_per_route_v1),
        stops_per_route_v2: parse_number(&raw.stops_per_route_v2),
        spr_v1: parse_number(&raw.spr_v1),
        spr_v2: parse_number(&raw.spr_v2),
        route_count_v1: route_count("QTDE. ROTAS RBM 1.0", &raw.route_count_v1)?,
        route_count_v2: route_count("QTDE. ROTAS RBM 2.0", &raw.route_count_v2)?,
        orh_diff: parse_duration_to_minutes(&raw.orh_diff),
    })
}

fn route_count(column: &'static str, value: &str) -> Result<u32, RowParseError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| RowParseError::RouteCount {
            column,
            value: value.to_string(),
        })
}
