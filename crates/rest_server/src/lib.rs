pub mod routes;
pub mod startup;
pub mod errors;
pub mod openapi;
pub mod state;
pub mod coerce;

pub use startup::{run, DEFAULT_PORT};
