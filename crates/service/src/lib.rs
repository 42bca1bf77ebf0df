//! Service layer: the six drug operations both front-ends call.
//! - Each operation is exactly one SQL statement on a pooled connection.
//! - `NotFound` is surfaced as a typed error, store failures as `Db`.

pub mod errors;
pub mod drug_service;
pub mod observability;
#[cfg(test)]
pub mod test_support;
