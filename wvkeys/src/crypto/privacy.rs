use wvkeys_proto::{ClientIdentification, EncryptedClientIdentification, prost::Message};

use crate::certificate::DeviceCertificate;
use crate::error::CdmResult;

use super::aes::aes_cbc_encrypt;
use super::rsa::rsa_oaep_sha1_encrypt;

/**
    Encrypt the device's ClientIdentification for privacy mode.

    Two-step hybrid encryption:

      privacy_key = random 16 bytes
      privacy_iv  = random 16 bytes
      ciphertext  = AES-128-CBC(privacy_key, privacy_iv, pkcs7(client_id))
      wrapped_key = RSA-OAEP-SHA1(certificate.public_key, privacy_key)

    The provider id and serial number are copied from the certificate so the
    server can select the matching private key. The privacy key does not
    outlive this call.
*/
pub fn encrypt_client_id(
    client_id: &ClientIdentification,
    certificate: &DeviceCertificate,
) -> CdmResult<EncryptedClientIdentification> {
    let mut privacy_key = [0u8; 16];
    let mut privacy_iv = [0u8; 16];
    let mut rng = rand::rng();
    rand::RngCore::fill_bytes(&mut rng, &mut privacy_key);
    rand::RngCore::fill_bytes(&mut rng, &mut privacy_iv);

    let ciphertext = aes_cbc_encrypt(&privacy_key, &privacy_iv, &client_id.encode_to_vec());
    let encrypted_key = rsa_oaep_sha1_encrypt(certificate.public_key(), &privacy_key)?;

    Ok(EncryptedClientIdentification {
        provider_id: Some(certificate.provider_id().to_owned()),
        service_certificate_serial_number: Some(certificate.serial_number().to_vec()),
        encrypted_client_id: Some(ciphertext),
        encrypted_client_id_iv: Some(privacy_iv.to_vec()),
        encrypted_privacy_key: Some(encrypted_key),
    })
}
