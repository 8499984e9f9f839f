// Certificate tracking core
//
// `RecordRepository` owns the stored records and `RefreshOrchestrator`
// keeps them current. Both reach the network only through a
// `CertificateSource`, so tests can swap in a fake.

pub mod orchestrator;
pub mod repository;
pub mod source;

pub use orchestrator::{RefreshOrchestrator, RefreshOutcome};
pub use repository::RecordRepository;
pub use source::{CertificateSnapshot, CertificateSource, TlsCertificateSource};
