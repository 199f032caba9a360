use aes::{
    Aes128,
    cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit, block_padding::Pkcs7},
};
use cmac::{Cmac, Mac};

use crate::error::{CdmError, CdmResult};
use crate::types::DerivedKeys;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

const ENC_LABEL: &[u8] = b"ENCRYPTION\x00";
const MAC_LABEL: &[u8] = b"AUTHENTICATION\x00";
/// Output length marker for one 128-bit block.
const ENC_LENGTH: [u8; 4] = [0x00, 0x00, 0x00, 0x80];
/// Output length marker for two blocks (512 bits).
const MAC_LENGTH: [u8; 4] = [0x00, 0x00, 0x02, 0x00];

/**
    AES-CMAC key derivation (RFC 4493 used as a PRF).

    Both keys are bound to the exact license request body that was signed:

    ```text
    enc_key        = CMAC(sk, 0x01 || "ENCRYPTION\0"     || body || 00 00 00 80)
    mac_key_server = CMAC(sk, 0x01 || "AUTHENTICATION\0" || body || 00 00 02 00)
                  || CMAC(sk, 0x02 || "AUTHENTICATION\0" || body || 00 00 02 00)
    ```
*/
pub fn derive_keys(session_key: &[u8; 16], request_body: &[u8]) -> DerivedKeys {
    let enc_context = build_context(ENC_LABEL, request_body, ENC_LENGTH);
    let mac_context = build_context(MAC_LABEL, request_body, MAC_LENGTH);

    let enc_key = aes_cmac(session_key, 0x01, &enc_context);

    let mut mac_key_server = [0u8; 32];
    mac_key_server[..16].copy_from_slice(&aes_cmac(session_key, 0x01, &mac_context));
    mac_key_server[16..].copy_from_slice(&aes_cmac(session_key, 0x02, &mac_context));

    DerivedKeys {
        enc_key,
        mac_key_server,
    }
}

fn build_context(label: &[u8], request_body: &[u8], length: [u8; 4]) -> Vec<u8> {
    let mut out = Vec::with_capacity(label.len() + request_body.len() + length.len());
    out.extend_from_slice(label);
    out.extend_from_slice(request_body);
    out.extend_from_slice(&length);
    out
}

/// Single AES-128-CMAC over `counter || context`.
fn aes_cmac(key: &[u8; 16], counter: u8, context: &[u8]) -> [u8; 16] {
    let mut mac = <Cmac<Aes128> as KeyInit>::new(key.into());
    mac.update(&[counter]);
    mac.update(context);
    mac.finalize().into_bytes().into()
}

/**
    AES-128-CBC decryption followed by PKCS#7 unpadding.

    Used for KeyContainer.key with the derived `enc_key` and the container's own IV.
*/
pub fn aes_cbc_decrypt(key: &[u8; 16], iv: &[u8], ciphertext: &[u8]) -> CdmResult<Vec<u8>> {
    if ciphertext.is_empty() || !ciphertext.len().is_multiple_of(16) {
        return Err(CdmError::AesCbcInvalidInput(format!(
            "ciphertext must be non-empty and block-aligned, got {} bytes",
            ciphertext.len()
        )));
    }
    let cipher = Aes128CbcDec::new_from_slices(key, iv).map_err(|_| {
        CdmError::AesCbcInvalidInput(format!("IV must be 16 bytes, got {}", iv.len()))
    })?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CdmError::Pkcs7PaddingInvalid)
}

/**
    PKCS#7 padding followed by AES-128-CBC encryption.

    Used only by the privacy mode client identification encryption.
*/
pub fn aes_cbc_encrypt(key: &[u8; 16], iv: &[u8; 16], plaintext: &[u8]) -> Vec<u8> {
    Aes128CbcEnc::new(key.into(), iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}
