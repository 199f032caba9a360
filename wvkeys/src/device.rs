use rand::seq::SliceRandom;

use crate::error::DeviceError;
use crate::types::{DeviceType, LicenseType, SecurityLevel};

const HEX_ALPHABET: [u8; 16] = *b"0123456789ABCDEF";

/**
    Identity and policy of the device a license is requested for.

    Defaults to an online Android L3 device named `widevine_default`.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    name: String,
    device_type: DeviceType,
    offline: bool,
    security_level: SecurityLevel,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            name: "widevine_default".to_owned(),
            device_type: DeviceType::Android,
            offline: false,
            security_level: SecurityLevel::L3,
        }
    }
}

impl DeviceProfile {
    pub fn new(device_type: DeviceType) -> Self {
        Self {
            device_type,
            ..Self::default()
        }
    }

    /**
        Build a profile from a platform name such as `"android"` or `"chrome"`.
        Other names fail with [`DeviceError::Unsupported`].
    */
    pub fn from_type_name(name: &str) -> Result<Self, DeviceError> {
        Ok(Self::new(name.parse()?))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn with_security_level(mut self, security_level: SecurityLevel) -> Self {
        self.security_level = security_level;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn security_level(&self) -> SecurityLevel {
        self.security_level
    }

    /// OFFLINE for offline devices, DEFAULT otherwise.
    pub fn license_type(&self) -> LicenseType {
        if self.offline {
            LicenseType::Offline
        } else {
            LicenseType::Streaming
        }
    }

    /**
        Generate a fresh request id.

        - Android: the 16 uppercase hex digits in random order, then `"01"`,
          then 14 `'0'` characters (32 ASCII bytes).
        - Chrome: 16 random bytes.
    */
    pub fn request_id(&self) -> Vec<u8> {
        let mut rng = rand::rng();
        match self.device_type {
            DeviceType::Android => {
                let mut digits = HEX_ALPHABET;
                digits.shuffle(&mut rng);
                let mut id = Vec::with_capacity(32);
                id.extend_from_slice(&digits);
                id.extend_from_slice(b"01");
                id.extend_from_slice(&[b'0'; 14]);
                id
            }
            DeviceType::Chrome => {
                let mut id = vec![0u8; 16];
                rand::RngCore::fill_bytes(&mut rng, &mut id);
                id
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile() {
        let device = DeviceProfile::default();
        assert_eq!(device.name(), "widevine_default");
        assert_eq!(device.device_type(), DeviceType::Android);
        assert!(!device.is_offline());
        assert_eq!(device.security_level(), SecurityLevel::L3);
        assert_eq!(device.license_type(), LicenseType::Streaming);
    }

    #[test]
    fn offline_flag_selects_license_type() {
        let device = DeviceProfile::default().with_offline(true);
        assert_eq!(device.license_type(), LicenseType::Offline);
    }

    #[test]
    fn android_request_id_shape() {
        let device = DeviceProfile::new(DeviceType::Android);
        let id = device.request_id();
        assert_eq!(id.len(), 32);

        let mut digits = id[..16].to_vec();
        digits.sort_unstable();
        assert_eq!(digits, HEX_ALPHABET);

        assert_eq!(&id[16..18], b"01");
        assert!(id[18..].iter().all(|&b| b == b'0'));
    }

    #[test]
    fn request_ids_are_fresh() {
        let android = DeviceProfile::new(DeviceType::Android);
        let ids: std::collections::HashSet<_> = (0..8).map(|_| android.request_id()).collect();
        assert!(ids.len() > 1);

        let chrome = DeviceProfile::new(DeviceType::Chrome);
        let a = chrome.request_id();
        assert_eq!(a.len(), 16);
        assert_ne!(a, chrome.request_id());
    }

    #[test]
    fn type_names() {
        let chrome = DeviceProfile::from_type_name("chrome").unwrap();
        assert_eq!(chrome.device_type(), DeviceType::Chrome);
        assert_eq!(chrome.name(), "widevine_default");

        let err = DeviceProfile::from_type_name("playstation").unwrap_err();
        assert_eq!(err, DeviceError::Unsupported("playstation".into()));
    }

    #[test]
    fn builder_methods() {
        let device = DeviceProfile::new(DeviceType::Chrome)
            .with_name("browser")
            .with_security_level(SecurityLevel::L1);
        assert_eq!(device.name(), "browser");
        assert_eq!(device.security_level(), SecurityLevel::L1);
    }
}
