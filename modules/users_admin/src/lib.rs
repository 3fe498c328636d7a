// === PUBLIC CONTRACT ===
pub mod contract;

pub use contract::{client, error, model};

// === ERROR CATALOG ===
pub mod errors;

// === MODULE DEFINITION ===
pub mod module;
pub use module::UsersAdmin;

// === INTERNAL MODULES ===
// Exposed for integration tests and the server binary; other modules should
// go through `contract`.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod i18n;
#[doc(hidden)]
pub mod infra;
