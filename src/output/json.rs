// JSON Output Module

use crate::Result;
use crate::db::models::CertificateRecord;
use crate::output::{InspectionView, RecordView};
use crate::tracker::{CertificateSnapshot, RefreshOutcome};
use chrono::{DateTime, Utc};
use serde_json::json;

/// Records as a JSON array
pub fn records_json(records: &[CertificateRecord], now: DateTime<Utc>, pretty: bool) -> Result<String> {
    let views: Vec<RecordView<'_>> = records.iter().map(|r| RecordView::new(r, now)).collect();
    to_string(&views, pretty)
}

/// Single record as a JSON object
pub fn record_json(record: &CertificateRecord, now: DateTime<Utc>, pretty: bool) -> Result<String> {
    to_string(&RecordView::new(record, now), pretty)
}

pub fn inspection_json(
    hostname: &str,
    snapshot: &CertificateSnapshot,
    now: DateTime<Utc>,
    pretty: bool,
) -> Result<String> {
    to_string(&InspectionView::new(hostname, snapshot, now), pretty)
}

/// `refresh-all` outcomes, errors rendered as strings
pub fn refresh_outcomes_json(outcomes: &[RefreshOutcome], pretty: bool) -> Result<String> {
    let entries: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(()) => json!({
                "id": outcome.id,
                "name": outcome.name,
                "status": "refreshed",
            }),
            Err(e) => json!({
                "id": outcome.id,
                "name": outcome.name,
                "status": "failed",
                "error_kind": e.kind(),
                "error": e.to_string(),
            }),
        })
        .collect();

    to_string(&entries, pretty)
}

fn to_string<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}
