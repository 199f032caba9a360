/*!
    Widevine license protocol messages, generated from
    `proto/license_protocol.proto` at build time.
*/

pub mod license_protocol {
    include!(concat!(env!("OUT_DIR"), "/_.rs"));
}

pub use license_protocol::*;

pub use prost;
