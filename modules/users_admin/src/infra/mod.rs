pub mod crypto;
pub mod mail;
pub mod storage;
