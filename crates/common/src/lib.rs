//! Shared plumbing for the pharmacy binaries: logging setup, the admin
//! side-server and small response types.

pub mod types;
pub mod utils;
pub mod admin_http;
