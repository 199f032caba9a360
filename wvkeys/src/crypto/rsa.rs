use rsa::{
    Oaep, RsaPrivateKey, RsaPublicKey,
    pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey},
    pkcs8::{DecodePrivateKey, DecodePublicKey},
    pss,
    rand_core::OsRng,
};
use sha1::Sha1;
use signature::{RandomizedSigner, SignatureEncoding};

use crate::error::{CdmError, CdmResult};

/// PSS salt length, one SHA-1 digest.
const PSS_SALT_LEN: usize = 20;

/**
    Sign a serialized license request with RSASSA-PSS over SHA-1.

    `message` is the request body itself. The signing key digests it, so a
    caller must never hand in a precomputed hash.
*/
pub fn rsa_pss_sha1_sign(private_key: &RsaPrivateKey, message: &[u8]) -> CdmResult<Vec<u8>> {
    pss::SigningKey::<Sha1>::new_with_salt_len(private_key.clone(), PSS_SALT_LEN)
        .try_sign_with_rng(&mut OsRng, message)
        .map(|signature| signature.to_vec())
        .map_err(|e| CdmError::RsaOperation(e.to_string()))
}

/// Unwrap the license session key (`SignedMessage.session_key`), OAEP with SHA-1 and no label.
pub fn rsa_oaep_sha1_decrypt(private_key: &RsaPrivateKey, ciphertext: &[u8]) -> CdmResult<Vec<u8>> {
    private_key
        .decrypt(Oaep::new::<Sha1>(), ciphertext)
        .map_err(|e| CdmError::RsaOperation(e.to_string()))
}

/**
    Wrap `plaintext` for the holder of `public_key`, OAEP with SHA-1 and no
    label. Privacy mode uses this for its one-time AES key; the result is one
    modulus long.
*/
pub fn rsa_oaep_sha1_encrypt(public_key: &RsaPublicKey, plaintext: &[u8]) -> CdmResult<Vec<u8>> {
    public_key
        .encrypt(&mut OsRng, Oaep::new::<Sha1>(), plaintext)
        .map_err(|e| CdmError::RsaOperation(e.to_string()))
}

/**
    Parse a DER public key as found in DrmCertificate.public_key.

    Certificates carry PKCS#1 `RSAPublicKey`; a SubjectPublicKeyInfo wrapper
    is accepted as well.
*/
pub fn parse_public_key(der: &[u8]) -> CdmResult<RsaPublicKey> {
    RsaPublicKey::from_pkcs1_der(der)
        .or_else(|pkcs1_err| {
            RsaPublicKey::from_public_key_der(der).map_err(|_| pkcs1_err.to_string())
        })
        .map_err(CdmError::RsaKeyParse)
}

/**
    Load a device private key.

    Accepts PKCS#1 or PKCS#8, either as DER or as PEM text.
*/
pub fn load_private_key(data: impl AsRef<[u8]>) -> CdmResult<RsaPrivateKey> {
    let data = data.as_ref();

    let parsed = match pem_text(data) {
        Some(pem) => RsaPrivateKey::from_pkcs1_pem(pem)
            .map_err(|e| e.to_string())
            .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem).map_err(|e| e.to_string())),
        None => RsaPrivateKey::from_pkcs1_der(data)
            .map_err(|e| e.to_string())
            .or_else(|_| RsaPrivateKey::from_pkcs8_der(data).map_err(|e| e.to_string())),
    };

    parsed.map_err(CdmError::RsaKeyParse)
}

fn pem_text(data: &[u8]) -> Option<&str> {
    let text = std::str::from_utf8(data).ok()?.trim();
    text.starts_with("-----BEGIN").then_some(text)
}
