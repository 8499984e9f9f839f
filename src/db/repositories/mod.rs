// Repositories Module
// Re-exports all repository implementations

pub mod record_repository;

pub use record_repository::CertificateRecordRepositoryImpl;
