// Certificates module - Certificate retrieval and decoding

pub mod decoder;
pub mod inspector;
pub mod verifier;

pub use decoder::{CertificateAttributes, CertificateDecoder};
pub use inspector::{CertificateInspector, Inspection, InspectorSettings, TlsVersion};
