use hex_literal::hex;

/**
    Widevine DRM system identifier: `edef8ba9-79d6-4ace-a3c8-27dcd51d21ed`.

    A normalized init-data box carries it at bytes `12..28`.
*/
pub const WIDEVINE_SYSTEM_ID: [u8; 16] = hex!(
    "edef8ba9"
    "79d6"
    "4ace"
    "a3c8"
    "27dcd51d21ed"
);

/// Protocol version written into every license request (`VERSION_2_1`).
pub const PROTOCOL_VERSION: i32 = 21;

/// Offset of the structured header inside a normalized init-data box.
pub const PSSH_HEADER_LEN: usize = 32;

/**
    Largest payload a synthesized init-data box can frame.

    Both the box size and the payload length are stored in a single byte,
    so `PSSH_HEADER_LEN + payload` must not exceed 255.
*/
pub const PSSH_MAX_PAYLOAD_LEN: usize = u8::MAX as usize - PSSH_HEADER_LEN;

/// Upper bound (exclusive) of the key control nonce, keeps the value a positive `i32`.
pub const KEY_CONTROL_NONCE_MAX: u32 = 1 << 31;

/**
    Service (provider) id of the production license server certificate (`license.widevine.com`).
*/
pub const LICENSE_PRODUCTION_PROVIDER_ID: &str = "license.widevine.com";

/**
    Serial number of the production license server certificate.
*/
pub const LICENSE_PRODUCTION_SERIAL: [u8; 16] = hex!("1705b917cc1204868b06333a2f772a8c");

/**
    RSA modulus of the production license server certificate, big-endian.
*/
pub const LICENSE_PRODUCTION_N: [u8; 256] = hex!(
    "095a9f9c015012cf1b71b408d3fb64df"
    "6e5efcb05d9f6b0b2f58e24328e8590c"
    "012f4baf37ec4ea7904413f3c54a2cd8"
    "c6676f0d6882707024ceed59830b1296"
    "b982a0735cc5d76ce7d0e264f5ba5bf5"
    "eefc9a9260bdee97bfa420954cbac4d1"
    "04c6b040bfe131fd4264fb6f3df19233"
    "decaf1badd1882435daa7ea40c4947ca"
    "104abdec4efb213a985d7033ebcd7cd6"
    "a837b15784ac4fe0dc7a60a858800ee6"
    "143d26465fa4e881571e9e01e177eafe"
    "fbbf217e8c878c156f0b610830397912"
    "a9380eafe1a7234058581d2995079e4a"
    "5e5a724e8cb81bb1ade38cad41045140"
    "dfb876d814b845063e5037cbbcd50a52"
    "98b5952ab6c3ef245eab7d323b5bed99"
);

pub const LICENSE_PRODUCTION_E: [u8; 3] = hex!("010001");

/**
    Service (provider) id of the staging license server certificate (`staging.google.com`).
*/
pub const LICENSE_STAGING_PROVIDER_ID: &str = "staging.google.com";

/**
    Serial number of the staging license server certificate.
*/
pub const LICENSE_STAGING_SERIAL: [u8; 16] = hex!("28703454c008f63618ade7443db6c4c8");

/**
    RSA modulus of the staging license server certificate, big-endian.
*/
pub const LICENSE_STAGING_N: [u8; 256] = hex!(
    "43d99a7fa067fd24af9dbc8694133836"
    "4c3303476001ef3c99a0d0c0a0604df7"
    "a2bcc293d8450d0868d6f10858e5be90"
    "935872ab54424f3d28f63ef367674842"
    "efefdfb7563692905e90bd507821ac2b"
    "53001fc08c490e4af70151adad066a64"
    "dc7dca920f98915a674df1d8dcee40c7"
    "bb090bc540a0a380ffef81f0414c5ac0"
    "8a215a5b18d3a134f16d17147e2aba4d"
    "adf5aab6f91e5e7f891827604c3e0d63"
    "664f1c17aa627985b9f294b8a6b9e126"
    "0d1d81ef665b076f51b294ea5ad4897a"
    "c00a5fbb67e0f5c7a222b374629a5e81"
    "0754e9df08dc5fd54699b78231bc2a3d"
    "1e66de4367b05b35efbed2d87c17b449"
    "c6c151c2e2955dcc3f025dd0b81221b5"
);

pub const LICENSE_STAGING_E: [u8; 3] = hex!("010001");
