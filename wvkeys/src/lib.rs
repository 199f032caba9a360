#![allow(clippy::doc_overindented_list_items)]

mod cdm;
mod certificate;
mod device;
mod error;
mod init_data;
mod keys;
mod license;
mod types;
mod utils;

pub mod constants;
pub mod crypto;

pub mod proto {
    pub use wvkeys_proto::prost::Message;
    pub use wvkeys_proto::*;
}

pub use self::cdm::{Cdm, LicenseChallenge};
pub use self::certificate::DeviceCertificate;
pub use self::constants::WIDEVINE_SYSTEM_ID;
pub use self::device::DeviceProfile;
pub use self::error::{CdmError, CdmResult, DeviceError, InitDataError, LicenseError, ParseError};
pub use self::init_data::{InitData, normalize_pssh};
pub use self::keys::{Key, KeyRing};
pub use self::license::decrypt_license;
pub use self::types::{DerivedKeys, DeviceType, KeyType, LicenseType, Permission, SecurityLevel};

pub use rsa::RsaPrivateKey;
