use rsa::RsaPrivateKey;
use wvkeys_proto::{
    License, SignedMessage,
    license::{KeyContainer, key_container::OperatorSessionKeyPermissions},
    prost::Message,
    signed_message::MessageType,
};

use crate::crypto::{aes, hmac, rsa as rsa_crypto};
use crate::error::{CdmResult, LicenseError};
use crate::keys::{Key, KeyRing};
use crate::types::{DerivedKeys, KeyType, Permission};

/**
    Verify a license response and decrypt its keys.

    `request_body` must be the exact unsigned body of the license request this
    response answers (see [`LicenseChallenge::body`](crate::LicenseChallenge)).
    Both derived keys are bound to it.

    Steps, each of which fails the whole call:

    1. Decode the `SignedMessage`, which must be of type LICENSE.
    2. Recover the 16-byte session key with RSA-OAEP-SHA1.
    3. Derive `enc_key` and `mac_key_server` (AES-CMAC).
    4. Check HMAC-SHA256 over the license body against the envelope signature.
    5. Decrypt every key container in server order. A container without an
       IV or key fails the call instead of being left out of the ring.

    No key is extracted unless the signature check in step 4 passed.
*/
pub fn decrypt_license(
    response: &[u8],
    request_body: &[u8],
    private_key: &RsaPrivateKey,
) -> CdmResult<KeyRing> {
    let signed = SignedMessage::decode(response)?;

    let msg_type = signed.r#type.unwrap_or(0);
    if msg_type != MessageType::License as i32 {
        return Err(LicenseError::UnexpectedMessageType(msg_type).into());
    }

    let msg = signed.msg.as_deref().ok_or(LicenseError::MissingField("msg"))?;
    let signature = signed
        .signature
        .as_deref()
        .ok_or(LicenseError::MissingField("signature"))?;
    let session_key_enc = signed
        .session_key
        .as_deref()
        .ok_or(LicenseError::MissingField("session_key"))?;

    let session_key = rsa_crypto::rsa_oaep_sha1_decrypt(private_key, session_key_enc)?;
    let session_key: [u8; 16] = session_key
        .try_into()
        .map_err(|v: Vec<u8>| LicenseError::BadSessionKeyLength(v.len()))?;

    let derived = DerivedKeys::derive(&session_key, request_body);

    if let Err(e) = hmac::verify_license_signature(
        &derived.mac_key_server,
        signed.oemcrypto_core_message.as_deref(),
        msg,
        signature,
    ) {
        log::debug!("license response failed signature verification");
        return Err(e);
    }

    let license = License::decode(msg)?;
    log::debug!(
        "license response verified, {} key container(s)",
        license.key.len()
    );

    let keys = license
        .key
        .iter()
        .map(|container| extract_key(container, &derived.enc_key))
        .collect::<CdmResult<Vec<_>>>()?;

    Ok(KeyRing::new(keys))
}

fn extract_key(container: &KeyContainer, enc_key: &[u8; 16]) -> CdmResult<Key> {
    let key_type = KeyType::from_proto(container.r#type)?;

    let iv = non_empty(container.iv.as_deref()).ok_or(LicenseError::MissingField("iv"))?;
    let ciphertext =
        non_empty(container.key.as_deref()).ok_or(LicenseError::MissingField("key"))?;

    let key = aes::aes_cbc_decrypt(enc_key, iv, ciphertext)?;

    let kid = match non_empty(container.id.as_deref()) {
        Some(id) => id.to_vec(),
        None => key_type.to_name().as_bytes().to_vec(),
    };

    let permissions = match (key_type, &container.operator_session_key_permissions) {
        (KeyType::OperatorSession, Some(flags)) => granted_permissions(flags),
        _ => Vec::new(),
    };

    log::trace!("extracted {key_type} key {}", hex::encode(&kid));

    Ok(Key::new(kid, key_type, key, permissions))
}

fn non_empty(field: Option<&[u8]>) -> Option<&[u8]> {
    field.filter(|bytes| !bytes.is_empty())
}

fn granted_permissions(flags: &OperatorSessionKeyPermissions) -> Vec<Permission> {
    Permission::ALL
        .into_iter()
        .filter(|p| match p {
            Permission::AllowEncrypt => flags.allow_encrypt(),
            Permission::AllowDecrypt => flags.allow_decrypt(),
            Permission::AllowSign => flags.allow_sign(),
            Permission::AllowSignatureVerify => flags.allow_signature_verify(),
        })
        .collect()
}
