use core::fmt;
use core::str::FromStr;

use crate::error::{DeviceError, LicenseError, ParseError};
use crate::utils::eq_ignore_ascii_case;

/**
    Type of a decrypted key, mirroring `License.KeyContainer.KeyType`.

    A container without a type is read as `Signing`, the schema's first value.
    Any value outside `1..=6` is rejected.
*/
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyType {
    Signing = 1,
    Content = 2,
    KeyControl = 3,
    OperatorSession = 4,
    Entitlement = 5,
    OemContent = 6,
}

impl KeyType {
    pub const fn from_u8(u: u8) -> Option<Self> {
        match u {
            1 => Some(Self::Signing),
            2 => Some(Self::Content),
            3 => Some(Self::KeyControl),
            4 => Some(Self::OperatorSession),
            5 => Some(Self::Entitlement),
            6 => Some(Self::OemContent),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /**
        Resolve the raw `type` field of a key container.
    */
    pub const fn from_proto(value: Option<i32>) -> Result<Self, LicenseError> {
        match value {
            None => Ok(Self::Signing),
            Some(v @ 1..=6) => match Self::from_u8(v as u8) {
                Some(kt) => Ok(kt),
                None => Err(LicenseError::UnknownKeyType(v)),
            },
            Some(v) => Err(LicenseError::UnknownKeyType(v)),
        }
    }

    pub const fn from_name(name: &[u8]) -> Option<Self> {
        let name = name.trim_ascii();
        match name.len() {
            7 if eq_ignore_ascii_case(name, b"signing") => Some(Self::Signing),
            7 if eq_ignore_ascii_case(name, b"content") => Some(Self::Content),
            11 if eq_ignore_ascii_case(name, b"key_control") => Some(Self::KeyControl),
            11 if eq_ignore_ascii_case(name, b"entitlement") => Some(Self::Entitlement),
            11 if eq_ignore_ascii_case(name, b"oem_content") => Some(Self::OemContent),
            16 if eq_ignore_ascii_case(name, b"operator_session") => Some(Self::OperatorSession),
            _ => None,
        }
    }

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::Signing => "SIGNING",
            Self::Content => "CONTENT",
            Self::KeyControl => "KEY_CONTROL",
            Self::OperatorSession => "OPERATOR_SESSION",
            Self::Entitlement => "ENTITLEMENT",
            Self::OemContent => "OEM_CONTENT",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

impl FromStr for KeyType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.as_bytes()).ok_or_else(|| ParseError {
            kind: "key type",
            value: s.to_owned(),
        })
    }
}

/**
    Operator session key permission flags, in schema declaration order.
    Ref: License.KeyContainer.OperatorSessionKeyPermissions.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    AllowEncrypt,
    AllowDecrypt,
    AllowSign,
    AllowSignatureVerify,
}

impl Permission {
    pub const ALL: [Self; 4] = [
        Self::AllowEncrypt,
        Self::AllowDecrypt,
        Self::AllowSign,
        Self::AllowSignatureVerify,
    ];

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::AllowEncrypt => "allow_encrypt",
            Self::AllowDecrypt => "allow_decrypt",
            Self::AllowSign => "allow_sign",
            Self::AllowSignatureVerify => "allow_signature_verify",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

/**
    Client platform. Decides the request id format.

    Parsing any other platform name fails with [`DeviceError::Unsupported`].
*/
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceType {
    #[default]
    Android,
    Chrome,
}

impl DeviceType {
    pub const fn from_name(name: &[u8]) -> Option<Self> {
        let name = name.trim_ascii();
        match name.len() {
            6 if eq_ignore_ascii_case(name, b"chrome") => Some(Self::Chrome),
            7 if eq_ignore_ascii_case(name, b"android") => Some(Self::Android),
            _ => None,
        }
    }

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Chrome => "chrome",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

impl FromStr for DeviceType {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.as_bytes()).ok_or_else(|| DeviceError::Unsupported(s.to_owned()))
    }
}

/// Widevine security level. Advisory only, never sent on the wire.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SecurityLevel {
    L1 = 1,
    L2 = 2,
    #[default]
    L3 = 3,
}

impl SecurityLevel {
    pub const fn from_u8(u: u8) -> Option<Self> {
        match u {
            1 => Some(Self::L1),
            2 => Some(Self::L2),
            3 => Some(Self::L3),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_name(name: &[u8]) -> Option<Self> {
        match name.trim_ascii() {
            b"1" | b"L1" | b"l1" => Some(Self::L1),
            b"2" | b"L2" | b"l2" => Some(Self::L2),
            b"3" | b"L3" | b"l3" => Some(Self::L3),
            _ => None,
        }
    }

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::L1 => "L1",
            Self::L2 => "L2",
            Self::L3 => "L3",
        }
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

impl FromStr for SecurityLevel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.as_bytes()).ok_or_else(|| ParseError {
            kind: "security level",
            value: s.to_owned(),
        })
    }
}

/// License policy requested from the server.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LicenseType {
    /// Online license, `DEFAULT` on the wire.
    #[default]
    Streaming,
    /// Persistable license for downloaded content.
    Offline,
}

impl LicenseType {
    pub const fn to_name(self) -> &'static str {
        match self {
            Self::Streaming => "DEFAULT",
            Self::Offline => "OFFLINE",
        }
    }
}

impl fmt::Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

type ProtoLicenseType = wvkeys_proto::LicenseType;

impl From<LicenseType> for ProtoLicenseType {
    fn from(lt: LicenseType) -> Self {
        match lt {
            LicenseType::Streaming => Self::Streaming,
            LicenseType::Offline => Self::Offline,
        }
    }
}

/// The purpose-bound keys derived from a license session key.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKeys {
    /// 16 bytes. Decrypts KeyContainer.key fields.
    pub enc_key: [u8; 16],
    /// 32 bytes. HMAC-SHA256 key authenticating the license response.
    pub mac_key_server: [u8; 32],
}

impl DerivedKeys {
    /**
        Derive both keys from a decrypted session key and the license request
        body the session key answers. Deterministic in both inputs.
    */
    pub fn derive(session_key: &[u8; 16], request_body: &[u8]) -> Self {
        crate::crypto::aes::derive_keys(session_key, request_body)
    }
}

impl fmt::Debug for DerivedKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKeys").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_type_names_round_trip() {
        for v in 1..=6 {
            let kt = KeyType::from_u8(v).unwrap();
            assert_eq!(kt.to_u8(), v);
            assert_eq!(kt.to_name().parse::<KeyType>().unwrap(), kt);
        }
        assert_eq!("  operator_session ".parse::<KeyType>().unwrap(), KeyType::OperatorSession);
        assert!("video".parse::<KeyType>().is_err());
    }

    #[test]
    fn key_type_from_proto_fails_closed() {
        assert_eq!(KeyType::from_proto(None), Ok(KeyType::Signing));
        assert_eq!(KeyType::from_proto(Some(2)), Ok(KeyType::Content));
        assert_eq!(KeyType::from_proto(Some(6)), Ok(KeyType::OemContent));
        assert_eq!(KeyType::from_proto(Some(0)), Err(LicenseError::UnknownKeyType(0)));
        assert_eq!(KeyType::from_proto(Some(7)), Err(LicenseError::UnknownKeyType(7)));
        assert_eq!(KeyType::from_proto(Some(-1)), Err(LicenseError::UnknownKeyType(-1)));
    }

    #[test]
    fn device_type_parse() {
        assert_eq!("android".parse::<DeviceType>(), Ok(DeviceType::Android));
        assert_eq!("CHROME".parse::<DeviceType>(), Ok(DeviceType::Chrome));
        assert_eq!(
            "smart_tv".parse::<DeviceType>(),
            Err(DeviceError::Unsupported("smart_tv".into()))
        );
        assert_eq!(DeviceType::default(), DeviceType::Android);
    }

    #[test]
    fn security_level_parse() {
        assert_eq!("L1".parse::<SecurityLevel>().unwrap(), SecurityLevel::L1);
        assert_eq!("3".parse::<SecurityLevel>().unwrap(), SecurityLevel::L3);
        assert_eq!(SecurityLevel::default(), SecurityLevel::L3);
        let err = "L4".parse::<SecurityLevel>().unwrap_err();
        assert_eq!(err.kind, "security level");
    }

    #[test]
    fn permission_order_matches_schema() {
        let names: Vec<_> = Permission::ALL.iter().map(|p| p.to_name()).collect();
        assert_eq!(
            names,
            ["allow_encrypt", "allow_decrypt", "allow_sign", "allow_signature_verify"]
        );
    }

    #[test]
    fn license_type_maps_to_proto() {
        assert_eq!(ProtoLicenseType::from(LicenseType::Streaming) as i32, 1);
        assert_eq!(ProtoLicenseType::from(LicenseType::Offline) as i32, 2);
    }
}
