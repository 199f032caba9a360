use rand::Rng;
use rsa::RsaPrivateKey;
use wvkeys_proto::{
    ClientIdentification, LicenseRequest, SignedMessage,
    license_request::{ContentIdentification, RequestType, content_identification::Cenc},
    prost::Message,
    signed_message::MessageType,
};

use crate::certificate::DeviceCertificate;
use crate::constants::{KEY_CONTROL_NONCE_MAX, PROTOCOL_VERSION};
use crate::crypto::{privacy, rsa as rsa_crypto};
use crate::device::DeviceProfile;
use crate::error::CdmResult;
use crate::init_data::InitData;
use crate::keys::KeyRing;
use crate::license;
use crate::utils::unix_time_secs;

/**
    A signed license request ready to send to a license server.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseChallenge {
    /// Serialized `SignedMessage` (type LICENSE_REQUEST) to transmit.
    pub signed: Vec<u8>,
    /// The serialized `LicenseRequest` that was signed. Keep it, the license
    /// response can only be verified against these exact bytes.
    pub body: Vec<u8>,
}

impl LicenseChallenge {
    /// Verify the server's answer to this request and decrypt its keys.
    /// See [`license::decrypt_license`].
    pub fn decrypt_license(
        &self,
        response: &[u8],
        private_key: &RsaPrivateKey,
    ) -> CdmResult<KeyRing> {
        license::decrypt_license(response, &self.body, private_key)
    }
}

/**
    Builds license requests for one piece of content.

    Holding a service certificate turns on privacy mode: the client
    identification is then sent encrypted under the certificate's public key.

    ```ignore
    let cdm = Cdm::new(InitData::from_pssh_base64(pssh)?);
    let challenge = cdm.license_request(&private_key, &client_id_blob, None)?;

    // ... POST challenge.signed to the license server ...

    let keys = challenge.decrypt_license(&response, &private_key)?;
    for line in keys.to_list() {
        println!("{line}");
    }
    ```
*/
#[derive(Debug, Clone)]
pub struct Cdm {
    init_data: InitData,
    certificate: Option<DeviceCertificate>,
}

impl Cdm {
    pub fn new(init_data: InitData) -> Self {
        Self {
            init_data,
            certificate: None,
        }
    }

    /// Enable privacy mode with a raw service certificate (see [`DeviceCertificate::from_bytes`]).
    pub fn with_certificate(self, raw: impl AsRef<[u8]>) -> CdmResult<Self> {
        Ok(self.with_device_certificate(DeviceCertificate::from_bytes(raw)?))
    }

    /// Enable privacy mode with an already parsed certificate.
    pub fn with_device_certificate(mut self, certificate: DeviceCertificate) -> Self {
        self.certificate = Some(certificate);
        self
    }

    pub fn init_data(&self) -> &InitData {
        &self.init_data
    }

    pub fn certificate(&self) -> Option<&DeviceCertificate> {
        self.certificate.as_ref()
    }

    pub fn is_privacy_mode(&self) -> bool {
        self.certificate.is_some()
    }

    /**
        Build and sign a license request.

        `raw_client_id` is a serialized `ClientIdentification`. Without a
        `device`, an online Android profile is used.

        Raw init data is embedded as given; otherwise the parsed Widevine
        header is serialized into the content identification. The body is
        signed with RSA-PSS-SHA1 under `private_key`.
    */
    pub fn license_request(
        &self,
        private_key: &RsaPrivateKey,
        raw_client_id: &[u8],
        device: Option<&DeviceProfile>,
    ) -> CdmResult<LicenseChallenge> {
        let device = device.cloned().unwrap_or_default();

        log::debug!(
            "building {} license request for {} device (raw header: {}, privacy mode: {})",
            device.license_type(),
            device.device_type(),
            self.init_data.is_raw(),
            self.is_privacy_mode(),
        );

        let content_id = ContentIdentification {
            cenc_id: Some(Cenc {
                pssh: Some(self.init_data.content_header()),
                license_type: Some(wvkeys_proto::LicenseType::from(device.license_type()) as i32),
                request_id: Some(device.request_id()),
            }),
        };

        let client_id = ClientIdentification::decode(raw_client_id)?;
        let (client_id, encrypted_client_id) = match &self.certificate {
            Some(certificate) => (None, Some(privacy::encrypt_client_id(&client_id, certificate)?)),
            None => (Some(client_id), None),
        };

        let license_request = LicenseRequest {
            client_id,
            content_id: Some(content_id),
            r#type: Some(RequestType::New as i32),
            request_time: Some(unix_time_secs()),
            key_control_nonce_deprecated: None,
            protocol_version: Some(PROTOCOL_VERSION),
            key_control_nonce: Some(rand::rng().random_range(1..KEY_CONTROL_NONCE_MAX)),
            encrypted_client_id,
        };

        let body = license_request.encode_to_vec();
        let signature = rsa_crypto::rsa_pss_sha1_sign(private_key, &body)?;

        let signed = SignedMessage {
            r#type: Some(MessageType::LicenseRequest as i32),
            msg: Some(body.clone()),
            signature: Some(signature),
            ..Default::default()
        }
        .encode_to_vec();

        Ok(LicenseChallenge { signed, body })
    }
}
