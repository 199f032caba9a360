use rsa::{BigUint, RsaPublicKey};
use wvkeys_proto::{DrmCertificate, SignedDrmCertificate, SignedMessage, prost::Message};

use crate::constants::{
    LICENSE_PRODUCTION_E, LICENSE_PRODUCTION_N, LICENSE_PRODUCTION_PROVIDER_ID,
    LICENSE_PRODUCTION_SERIAL, LICENSE_STAGING_E, LICENSE_STAGING_N, LICENSE_STAGING_PROVIDER_ID,
    LICENSE_STAGING_SERIAL,
};
use crate::crypto::rsa::parse_public_key;
use crate::error::{CdmError, CdmResult};

/**
    A license service certificate, reduced to what privacy mode needs.

    No signature is checked here. Whoever hands over the certificate is
    trusted to have vetted it.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCertificate {
    public_key: RsaPublicKey,
    provider_id: String,
    serial_number: Vec<u8>,
}

impl DeviceCertificate {
    pub fn new(
        public_key: RsaPublicKey,
        provider_id: impl Into<String>,
        serial_number: Vec<u8>,
    ) -> Self {
        Self {
            public_key,
            provider_id: provider_id.into(),
            serial_number,
        }
    }

    /**
        Parse raw certificate bytes.

        The bytes are either a `SignedMessage` (type SERVICE_CERTIFICATE) whose
        `msg` holds the `SignedDrmCertificate`, or the `SignedDrmCertificate`
        itself. A `SignedMessage` counts only when its type field is set.
    */
    pub fn from_bytes(raw: impl AsRef<[u8]>) -> CdmResult<Self> {
        let raw = raw.as_ref();

        let payload = match SignedMessage::decode(raw) {
            Ok(SignedMessage {
                r#type: Some(t),
                msg,
                ..
            }) if t != 0 => {
                log::trace!("service certificate wrapped in SignedMessage (type {t})");
                msg.ok_or_else(|| {
                    CdmError::CertificateDecode("missing msg in SignedMessage".into())
                })?
            }
            _ => raw.to_vec(),
        };

        let signed = SignedDrmCertificate::decode(payload.as_slice())
            .map_err(|e| CdmError::CertificateDecode(format!("SignedDrmCertificate: {e}")))?;
        let cert_bytes = signed
            .drm_certificate
            .ok_or_else(|| CdmError::CertificateDecode("missing drm_certificate".into()))?;
        let cert = DrmCertificate::decode(cert_bytes.as_slice())
            .map_err(|e| CdmError::CertificateDecode(format!("DrmCertificate: {e}")))?;

        let public_key = cert
            .public_key
            .as_deref()
            .ok_or_else(|| CdmError::CertificateDecode("missing public_key".into()))?;

        Ok(Self {
            public_key: parse_public_key(public_key)?,
            provider_id: cert.provider_id.unwrap_or_default(),
            serial_number: cert.serial_number.unwrap_or_default(),
        })
    }

    /// Certificate of Google's production license server (`license.widevine.com`).
    pub fn production() -> CdmResult<Self> {
        Self::from_constants(
            LICENSE_PRODUCTION_PROVIDER_ID,
            &LICENSE_PRODUCTION_SERIAL,
            &LICENSE_PRODUCTION_N,
            &LICENSE_PRODUCTION_E,
        )
    }

    /// Certificate of Google's staging license server (`staging.google.com`).
    pub fn staging() -> CdmResult<Self> {
        Self::from_constants(
            LICENSE_STAGING_PROVIDER_ID,
            &LICENSE_STAGING_SERIAL,
            &LICENSE_STAGING_N,
            &LICENSE_STAGING_E,
        )
    }

    fn from_constants(
        provider_id: &str,
        serial_number: &[u8],
        n: &[u8],
        e: &[u8],
    ) -> CdmResult<Self> {
        let public_key = RsaPublicKey::new(BigUint::from_bytes_be(n), BigUint::from_bytes_be(e))
            .map_err(|e| CdmError::RsaKeyParse(e.to_string()))?;
        Ok(Self::new(public_key, provider_id, serial_number.to_vec()))
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    /// Service (provider) identifier the server uses to pick its private key.
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn serial_number(&self) -> &[u8] {
        &self.serial_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::rsa::load_private_key;
    use rsa::pkcs1::EncodeRsaPublicKey;
    use rsa::traits::PublicKeyParts;
    use wvkeys_proto::signed_message::MessageType;

    fn test_public_key() -> RsaPublicKey {
        load_private_key(include_str!("../testdata/device_key.pem"))
            .unwrap()
            .to_public_key()
    }

    fn signed_drm_certificate(public_key: &RsaPublicKey) -> Vec<u8> {
        let cert = DrmCertificate {
            serial_number: Some(b"serial-0001".to_vec()),
            public_key: Some(public_key.to_pkcs1_der().unwrap().as_bytes().to_vec()),
            provider_id: Some("license.example.com".into()),
            ..Default::default()
        };
        SignedDrmCertificate {
            drm_certificate: Some(cert.encode_to_vec()),
            signature: Some(vec![0u8; 256]),
        }
        .encode_to_vec()
    }

    #[test]
    fn parses_bare_signed_drm_certificate() {
        let public_key = test_public_key();
        let cert = DeviceCertificate::from_bytes(signed_drm_certificate(&public_key)).unwrap();
        assert_eq!(cert.public_key(), &public_key);
        assert_eq!(cert.provider_id(), "license.example.com");
        assert_eq!(cert.serial_number(), b"serial-0001");
    }

    #[test]
    fn parses_certificate_inside_signed_message() {
        let public_key = test_public_key();
        let wrapped = SignedMessage {
            r#type: Some(MessageType::ServiceCertificate as i32),
            msg: Some(signed_drm_certificate(&public_key)),
            ..Default::default()
        }
        .encode_to_vec();

        let direct = DeviceCertificate::from_bytes(signed_drm_certificate(&public_key)).unwrap();
        assert_eq!(DeviceCertificate::from_bytes(wrapped).unwrap(), direct);
    }

    #[test]
    fn rejects_garbage() {
        let err = DeviceCertificate::from_bytes(b"\xff\xff\xff").unwrap_err();
        assert!(matches!(err, CdmError::CertificateDecode(_)));
    }

    #[test]
    fn rejects_certificate_without_public_key() {
        let signed = SignedDrmCertificate {
            drm_certificate: Some(DrmCertificate::default().encode_to_vec()),
            signature: None,
        };
        let err = DeviceCertificate::from_bytes(signed.encode_to_vec()).unwrap_err();
        assert!(matches!(err, CdmError::CertificateDecode(_)));
    }

    #[test]
    fn compiled_in_certificates() {
        let production = DeviceCertificate::production().unwrap();
        assert_eq!(production.provider_id(), "license.widevine.com");
        assert_eq!(production.serial_number(), &LICENSE_PRODUCTION_SERIAL);
        assert_eq!(production.public_key().size(), 256);

        let staging = DeviceCertificate::staging().unwrap();
        assert_eq!(staging.provider_id(), "staging.google.com");
        assert_ne!(staging.public_key(), production.public_key());
    }
}
