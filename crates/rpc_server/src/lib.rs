pub mod client;
pub mod errors;
pub mod pharmacy_service;
pub mod startup;

pub mod proto {
    tonic::include_proto!("pharmacy");
}

pub use proto::pharmacy_service_client::PharmacyServiceClient;
pub use startup::{run, DEFAULT_PORT};
