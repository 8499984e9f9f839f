// Terminal Output Module

use crate::db::models::CertificateRecord;
use crate::tracker::{CertificateSnapshot, RefreshOutcome};
use chrono::{DateTime, Utc};
use colored::*;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Truncate a string with ellipsis if it exceeds max length
fn truncate_with_ellipsis(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

/// Color a day count by how close expiry is
fn format_days_left(days: i64) -> ColoredString {
    let text = days.to_string();
    match days {
        d if d < 0 => text.red().bold(),
        d if d <= 14 => text.red(),
        d if d <= 30 => text.yellow(),
        _ => text.green(),
    }
}

/// Table of stored records
pub fn render_record_table(records: &[CertificateRecord], now: DateTime<Utc>) -> String {
    if records.is_empty() {
        return "No domains tracked yet".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<6} {:<32} {:<12} {:>9}  {:<8} {}\n",
        "ID", "NAME", "EXPIRES", "DAYS LEFT", "TLS", "ISSUER"
    ));
    out.push_str(&"-".repeat(100));
    out.push('\n');

    for record in records {
        let days = record.days_until_expiry(now);
        out.push_str(&format!(
            "{:<6} {:<32} {:<12} {:>9}  {:<8} {}\n",
            record.id,
            truncate_with_ellipsis(&record.name, 32),
            record.expiry_date.format("%Y-%m-%d"),
            format_days_left(days),
            record.tls_version,
            truncate_with_ellipsis(&record.issuer, 40),
        ));
    }

    out
}

/// Full view of one stored record
pub fn render_record_details(record: &CertificateRecord, now: DateTime<Utc>) -> String {
    let mut out = format!("\n{}\n", format!("Record {} - {}", record.id, record.name).cyan().bold());
    out.push_str(&render_certificate_fields(
        &record.subject,
        &record.issuer,
        record.issued_date,
        record.expiry_date,
        &record.expiry_countdown(now),
        &record.serial_number,
        &record.signature_algorithm,
        record.version,
        &record.tls_version,
        &record.san_list(),
    ));
    out
}

/// Fetched certificate that was not stored
pub fn render_inspection(hostname: &str, snapshot: &CertificateSnapshot, now: DateTime<Utc>) -> String {
    let attributes = &snapshot.attributes;
    let mut out = format!("\n{}\n", format!("Certificate for {}", hostname).cyan().bold());
    out.push_str(&render_certificate_fields(
        &attributes.subject,
        &attributes.issuer,
        attributes.not_before,
        attributes.not_after,
        &attributes.expiry_countdown(now),
        &attributes.serial_number,
        &attributes.signature_algorithm,
        attributes.version,
        &snapshot.tls_version,
        &attributes.sans,
    ));
    out
}

#[allow(clippy::too_many_arguments)]
fn render_certificate_fields(
    subject: &str,
    issuer: &str,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
    countdown: &str,
    serial_number: &str,
    signature_algorithm: &str,
    version: i32,
    tls_version: &str,
    sans: &[String],
) -> String {
    let mut out = String::new();
    out.push_str(&format!("  Subject:    {}\n", subject));
    out.push_str(&format!("  Issuer:     {}\n", issuer));
    out.push_str(&format!("  Valid From: {}\n", not_before.format(DATE_FORMAT)));
    out.push_str(&format!("  Valid To:   {}\n", not_after.format(DATE_FORMAT)));
    out.push_str(&format!("  Expires:    {}\n", countdown.yellow()));
    out.push_str(&format!("  Serial:     {}\n", serial_number));
    out.push_str(&format!("  Signature:  {}\n", signature_algorithm));
    out.push_str(&format!("  Version:    v{}\n", version));
    out.push_str(&format!("  Protocol:   {}\n", tls_version));

    if !sans.is_empty() {
        out.push_str("\n  Subject Alternative Names:\n");
        for san in sans {
            out.push_str(&format!("    - {}\n", san));
        }
    }

    out
}

/// One line per `refresh-all` outcome plus a summary
pub fn render_refresh_outcomes(outcomes: &[RefreshOutcome]) -> String {
    let mut out = String::new();

    for outcome in outcomes {
        match &outcome.result {
            Ok(()) => out.push_str(&format!(
                "  {} [{}] {}\n",
                "Y".green(),
                outcome.id,
                outcome.name
            )),
            Err(e) => out.push_str(&format!(
                "  {} [{}] {} - {}\n",
                "X".red(),
                outcome.id,
                outcome.name,
                e
            )),
        }
    }

    let refreshed = outcomes.iter().filter(|o| o.is_success()).count();
    out.push_str(&format!(
        "\nRefreshed {} of {} records",
        refreshed,
        outcomes.len()
    ));

    out
}
