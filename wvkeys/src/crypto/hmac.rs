use hmac::{Hmac, Mac, digest::KeyInit};
use sha2::Sha256;

use crate::error::{CdmResult, LicenseError};

type HmacSha256 = Hmac<Sha256>;

/**
    Authenticate a license body against the signature in its envelope.

    The MAC is HMAC-SHA256 keyed with the derived server MAC key. It runs over
    the envelope's `oemcrypto_core_message` when the server sent one, then
    over `msg`. The tag comparison is constant time, and a tag of any other
    length simply fails.
*/
pub fn verify_license_signature(
    mac_key_server: &[u8; 32],
    oemcrypto_core_message: Option<&[u8]>,
    msg: &[u8],
    expected_signature: &[u8],
) -> CdmResult<()> {
    // HMAC zero-pads a short key to the block size, so this is the same MAC
    let mut block_key = [0u8; 64];
    block_key[..32].copy_from_slice(mac_key_server);
    let mut mac = <HmacSha256 as KeyInit>::new(&block_key.into());
    mac.update(oemcrypto_core_message.unwrap_or_default());
    mac.update(msg);
    mac.verify_slice(expected_signature)
        .map_err(|_| LicenseError::SignatureMismatch.into())
}
