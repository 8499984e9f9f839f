// Metadata-only certificate verifier
//
// Accepts any presented chain (expired, self-signed, wrong host) so the leaf
// can be recorded, but still checks the handshake signature against the
// presented key. A peer that cannot prove possession of the key fails the
// handshake.

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, WebPkiSupportedAlgorithms};
use rustls::{DigitallySignedStruct, SignatureScheme};
use rustls_pki_types::{CertificateDer, ServerName, UnixTime};

#[derive(Debug)]
pub struct MetadataOnlyVerifier {
    algorithms: WebPkiSupportedAlgorithms,
}

impl MetadataOnlyVerifier {
    pub fn new(provider: &CryptoProvider) -> Self {
        Self {
            algorithms: provider.signature_verification_algorithms,
        }
    }
}

impl ServerCertVerifier for MetadataOnlyVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(message, cert, dss, &self.algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(message, cert, dss, &self.algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.algorithms.supported_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_any_chain() {
        let provider = rustls::crypto::ring::default_provider();
        let verifier = MetadataOnlyVerifier::new(&provider);

        let garbage = CertificateDer::from(vec![0x30, 0x00]);
        let name = ServerName::try_from("example.com").unwrap();
        let result = verifier.verify_server_cert(&garbage, &[], &name, &[], UnixTime::now());

        assert!(result.is_ok());
    }

    #[test]
    fn test_advertises_provider_schemes() {
        let provider = rustls::crypto::ring::default_provider();
        let verifier = MetadataOnlyVerifier::new(&provider);

        let schemes = verifier.supported_verify_schemes();
        assert!(schemes.contains(&SignatureScheme::ECDSA_NISTP256_SHA256));
        assert!(schemes.contains(&SignatureScheme::RSA_PSS_SHA256));
    }
}
