//! # AdminKit
//!
//! Shared HTTP plumbing for the admin back-office modules.
//!
//! - **Problem details**: RFC 9457 error bodies ([`Problem`], [`ProblemResponse`], [`ErrDef`])
//!   and per-module code catalogs ([`error_catalog!`])
//! - **Flash notices**: one-shot messages carried across a redirect ([`flash`])
//! - **Pagination**: numbered page envelope used by listing views ([`Page`])
//! - **Request ids and tracing**: middleware for the HTTP stack ([`request_id`])
//! - **Outgoing HTTP**: a traced `reqwest` wrapper ([`TracedClient`])
//! - **Shutdown**: OS signal handling for graceful stop ([`shutdown`])

pub mod catalog;
pub mod flash;
pub mod http;
pub mod page;
pub mod problem;
pub mod request_id;
pub mod shutdown;

pub use flash::{Flash, FlashLevel};
pub use http::client::TracedClient;
pub use page::{Page, PageInfo, PageRequest};
pub use problem::{ErrDef, Problem, ProblemResponse, ValidationError};
