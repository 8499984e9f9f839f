// Certificate Source - Acquisition boundary (inspect + decode)

use crate::Result;
use crate::certificates::decoder::{CertificateAttributes, CertificateDecoder};
use crate::certificates::inspector::{CertificateInspector, InspectorSettings};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Everything a fetch yields for one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateSnapshot {
    pub attributes: CertificateAttributes,
    pub tls_version: String,
}

/// Fetches the current certificate for a host
#[async_trait]
pub trait CertificateSource: Send + Sync {
    /// Either the full snapshot or the first error; never partial data
    async fn fetch(&self, host: &str) -> Result<CertificateSnapshot>;
}

#[async_trait]
impl<T: CertificateSource + ?Sized> CertificateSource for Arc<T> {
    async fn fetch(&self, host: &str) -> Result<CertificateSnapshot> {
        (**self).fetch(host).await
    }
}

/// Live source: TLS inspector followed by the certificate decoder
pub struct TlsCertificateSource {
    inspector: CertificateInspector,
}

impl TlsCertificateSource {
    pub fn new(settings: InspectorSettings) -> Result<Self> {
        Ok(Self {
            inspector: CertificateInspector::new(settings)?,
        })
    }
}

#[async_trait]
impl CertificateSource for TlsCertificateSource {
    async fn fetch(&self, host: &str) -> Result<CertificateSnapshot> {
        let inspection = self.inspector.inspect(host).await?;
        let attributes = CertificateDecoder::decode(inspection.leaf_certificate.as_ref())?;

        Ok(CertificateSnapshot {
            attributes,
            tls_version: inspection.negotiated_protocol.to_string(),
        })
    }
}
