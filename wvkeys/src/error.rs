use thiserror::Error;

/**
    Device identity failures. Raised before any request body is built.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("unsupported device type '{0}'")]
    Unsupported(String),
}

/**
    License response failures. None of these ever yield partial keys.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LicenseError {
    #[error("license response signature mismatch")]
    SignatureMismatch,
    #[error("expected a LICENSE message, got type {0}")]
    UnexpectedMessageType(i32),
    #[error("missing {0} in license response")]
    MissingField(&'static str),
    #[error("unknown key type {0}")]
    UnknownKeyType(i32),
    #[error("session key is {0} bytes, expected 16")]
    BadSessionKeyLength(usize),
}

/**
    Init-data (PSSH) failures. Fatal for the request being built.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitDataError {
    #[error("could not parse init data: {0}")]
    Parse(String),
    #[error("init data payload is {0} bytes, at most 223 fit a synthesized box")]
    PayloadTooLarge(usize),
    #[error("invalid base64: {0}")]
    InvalidBase64(String),
}

/**
    Errors surfaced by the license exchange.
*/
#[derive(Debug, Clone, Error)]
pub enum CdmError {
    // ── Categories ────────────────────────────────────────────────────
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error(transparent)]
    License(#[from] LicenseError),
    #[error(transparent)]
    InitData(#[from] InitDataError),

    // ── Protobuf ──────────────────────────────────────────────────────
    #[error("protobuf decode failed: {0}")]
    ProtobufDecode(String),

    // ── RSA ───────────────────────────────────────────────────────────
    #[error("RSA key parse failed: {0}")]
    RsaKeyParse(String),
    #[error("RSA operation failed: {0}")]
    RsaOperation(String),

    // ── AES / padding ─────────────────────────────────────────────────
    #[error("invalid AES-CBC input: {0}")]
    AesCbcInvalidInput(String),
    #[error("invalid PKCS#7 padding")]
    Pkcs7PaddingInvalid,

    // ── Certificates ──────────────────────────────────────────────────
    #[error("certificate decode failed: {0}")]
    CertificateDecode(String),
}

impl CdmError {
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::Device(_))
    }

    pub fn is_license_error(&self) -> bool {
        matches!(self, Self::License(_))
    }

    pub fn is_init_data_error(&self) -> bool {
        matches!(self, Self::InitData(_))
    }
}

impl From<prost::DecodeError> for CdmError {
    fn from(e: prost::DecodeError) -> Self {
        Self::ProtobufDecode(e.to_string())
    }
}

/// Type alias for results that may return a [`CdmError`].
pub type CdmResult<T> = std::result::Result<T, CdmError>;

/**
    Error returned by `FromStr` implementations on enum types.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}
