pub mod aes;
pub mod hmac;
pub mod privacy;
pub mod rsa;
