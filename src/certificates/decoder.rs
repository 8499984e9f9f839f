// Certificate Decoder - Turn a raw DER leaf certificate into tracked attributes

use crate::error::{CertificateDecodeError, CertificateField};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};
use ::oid_registry::OID_X509_EXT_SUBJECT_ALT_NAME;
use x509_parser::der_parser::oid::Oid;
use x509_parser::objects::{oid2sn, oid_registry};
use x509_parser::prelude::*;

/// Separator used when SANs are flattened into one string for storage
pub const SAN_SEPARATOR: &str = ", ";

/// Attributes extracted from a leaf certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateAttributes {
    pub issuer: String,
    pub subject: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    /// 1-based X.509 version (3 for v3 certificates)
    pub version: i32,
    pub serial_number: String,
    pub signature_algorithm: String,
    /// Subject Alternative Names in certificate order
    pub sans: Vec<String>,
}

impl CertificateAttributes {
    /// SANs in their persisted form
    pub fn joined_sans(&self) -> String {
        join_sans(&self.sans)
    }

    /// Whole days until `not_after` (negative once expired)
    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        self.not_after.signed_duration_since(now).num_days()
    }

    /// Human-readable countdown, e.g. "expires in 2 months and 28 days"
    pub fn expiry_countdown(&self, now: DateTime<Utc>) -> String {
        format_expiry_countdown(self.not_after, now)
    }
}

/// Join SANs into the stored comma-separated form
pub fn join_sans(sans: &[String]) -> String {
    sans.join(SAN_SEPARATOR)
}

/// Split a stored SAN string back into its entries
pub fn split_sans(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        return Vec::new();
    }
    joined.split(SAN_SEPARATOR).map(str::to_string).collect()
}

/// Stateless X.509 decoder
pub struct CertificateDecoder;

impl CertificateDecoder {
    /// Decode a DER certificate
    pub fn decode(der_bytes: &[u8]) -> Result<CertificateAttributes, CertificateDecodeError> {
        let (rest, cert) = X509Certificate::from_der(der_bytes).map_err(|e| {
            CertificateDecodeError::new(CertificateField::Certificate, e.to_string())
        })?;

        if !rest.is_empty() {
            return Err(CertificateDecodeError::new(
                CertificateField::Certificate,
                format!("{} trailing bytes after certificate", rest.len()),
            ));
        }

        let version = decode_version(&cert)?;
        let serial_number = format_serial(cert.raw_serial())?;

        let issuer = cert
            .issuer()
            .to_string_with_registry(oid_registry())
            .map_err(|e| CertificateDecodeError::new(CertificateField::Issuer, e.to_string()))?;
        let subject = cert
            .subject()
            .to_string_with_registry(oid_registry())
            .map_err(|e| CertificateDecodeError::new(CertificateField::Subject, e.to_string()))?;

        let validity = cert.validity();
        let not_before = to_utc(validity.not_before.timestamp(), CertificateField::NotBefore)?;
        let not_after = to_utc(validity.not_after.timestamp(), CertificateField::NotAfter)?;

        let signature_algorithm = signature_algorithm_name(&cert.signature_algorithm.algorithm)?;
        let sans = extract_sans(&cert)?;

        Ok(CertificateAttributes {
            issuer,
            subject,
            not_before,
            not_after,
            version,
            serial_number,
            signature_algorithm,
            sans,
        })
    }
}

fn decode_version(cert: &X509Certificate) -> Result<i32, CertificateDecodeError> {
    let raw = cert.version().0;
    if raw > 2 {
        return Err(CertificateDecodeError::new(
            CertificateField::Version,
            format!("unknown version value {}", raw),
        ));
    }
    Ok(raw as i32 + 1)
}

/// Uppercase hex of the serial magnitude; the ASN.1 sign byte is dropped.
fn format_serial(raw: &[u8]) -> Result<String, CertificateDecodeError> {
    if raw.is_empty() {
        return Err(CertificateDecodeError::new(
            CertificateField::SerialNumber,
            "empty serial number",
        ));
    }

    let magnitude = match raw {
        [0x00, next, ..] if next & 0x80 != 0 => &raw[1..],
        _ => raw,
    };

    Ok(hex::encode_upper(magnitude))
}

fn to_utc(timestamp: i64, field: CertificateField) -> Result<DateTime<Utc>, CertificateDecodeError> {
    DateTime::<Utc>::from_timestamp(timestamp, 0).ok_or_else(|| {
        CertificateDecodeError::new(field, format!("timestamp {} out of range", timestamp))
    })
}

fn signature_algorithm_name(oid: &Oid) -> Result<String, CertificateDecodeError> {
    let dotted = oid.to_id_string();
    if dotted.is_empty() {
        return Err(CertificateDecodeError::new(
            CertificateField::SignatureAlgorithm,
            "empty algorithm identifier",
        ));
    }

    Ok(oid2sn(oid, oid_registry())
        .map(str::to_string)
        .unwrap_or(dotted))
}

fn extract_sans(cert: &X509Certificate) -> Result<Vec<String>, CertificateDecodeError> {
    let ext = cert
        .get_extension_unique(&OID_X509_EXT_SUBJECT_ALT_NAME)
        .map_err(|e| {
            CertificateDecodeError::new(CertificateField::SubjectAlternativeName, e.to_string())
        })?;

    let Some(ext) = ext else {
        return Ok(Vec::new());
    };

    match ext.parsed_extension() {
        ParsedExtension::SubjectAlternativeName(san) => {
            san.general_names.iter().map(format_general_name).collect()
        }
        ParsedExtension::ParseError { error } => Err(CertificateDecodeError::new(
            CertificateField::SubjectAlternativeName,
            error.to_string(),
        )),
        other => Err(CertificateDecodeError::new(
            CertificateField::SubjectAlternativeName,
            format!("unexpected extension content: {:?}", other),
        )),
    }
}

fn format_general_name(name: &GeneralName) -> Result<String, CertificateDecodeError> {
    let formatted = match name {
        GeneralName::DNSName(dns) => dns.to_string(),
        GeneralName::RFC822Name(email) => email.to_string(),
        GeneralName::URI(uri) => uri.to_string(),
        GeneralName::IPAddress(bytes) => format_ip(bytes)?,
        GeneralName::DirectoryName(dn) => format!("DirName:{}", format_dir_name(dn)),
        GeneralName::RegisteredID(oid) => format!("RID:{}", oid.to_id_string()),
        GeneralName::OtherName(oid, _) => format!("othername:{}", oid.to_id_string()),
        other => format!("{:?}", other),
    };
    Ok(formatted)
}

/// OpenSSL-style `/C=US/O=Org/CN=name`, so the entry never contains the
/// SAN separator.
fn format_dir_name(name: &X509Name) -> String {
    let mut out = String::new();
    for rdn in name.iter_rdn() {
        let attributes: Vec<String> = rdn
            .iter()
            .map(|attr| {
                let key = oid2sn(attr.attr_type(), oid_registry())
                    .map(str::to_string)
                    .unwrap_or_else(|_| attr.attr_type().to_id_string());
                let value = match attr.as_str() {
                    Ok(value) => value.to_string(),
                    Err(_) => format!("#{}", hex::encode(attr.attr_value().data)),
                };
                format!("{}={}", key, value)
            })
            .collect();
        out.push('/');
        out.push_str(&attributes.join("+"));
    }
    out
}

fn format_ip(bytes: &[u8]) -> Result<String, CertificateDecodeError> {
    if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
        return Ok(Ipv4Addr::from(octets).to_string());
    }
    if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
        return Ok(Ipv6Addr::from(octets).to_string());
    }
    Err(CertificateDecodeError::new(
        CertificateField::SubjectAlternativeName,
        format!("IP address entry of {} bytes", bytes.len()),
    ))
}

/// Format certificate expiry countdown in human-readable form
///
/// Examples: "expires in 2 months and 28 days", "expires today",
/// "expired 5 days ago".
pub fn format_expiry_countdown(not_after: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = not_after.signed_duration_since(now);
    let expired = duration.num_seconds() < 0;
    let days = duration.num_days().abs();

    if days == 0 {
        return if expired { "expired today" } else { "expires today" }.to_string();
    }

    let span = if days < 30 {
        plural(days, "day")
    } else if days < 365 {
        let (months, rest) = (days / 30, days % 30);
        if rest == 0 {
            plural(months, "month")
        } else {
            format!("{} and {}", plural(months, "month"), plural(rest, "day"))
        }
    } else {
        let (years, months) = (days / 365, (days % 365) / 30);
        if months == 0 {
            plural(years, "year")
        } else {
            format!("{} and {}", plural(years, "year"), plural(months, "month"))
        }
    };

    if expired {
        format!("expired {} ago", span)
    } else {
        format!("expires in {}", span)
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}
