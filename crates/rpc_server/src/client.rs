use std::time::Duration;

use tonic::transport::{Channel, Endpoint};

use crate::proto::pharmacy_service_client::PharmacyServiceClient;

/// Open a channel to `addr` (e.g. `http://127.0.0.1:50051`). `timeout`
/// bounds both the connect and every call made on the channel.
pub async fn connect(addr: &str, timeout: Duration) -> Result<PharmacyServiceClient<Channel>, tonic::transport::Error> {
    let channel = Endpoint::from_shared(addr.to_string())?
        .connect_timeout(timeout)
        .timeout(timeout)
        .connect()
        .await?;
    Ok(PharmacyServiceClient::new(channel))
}

/// Like [`connect`] but defers the handshake to the first call, so a dead
/// server surfaces as failed calls instead of a connect error.
pub fn connect_lazy(addr: &str, timeout: Duration) -> Result<PharmacyServiceClient<Channel>, tonic::transport::Error> {
    let channel = Endpoint::from_shared(addr.to_string())?
        .connect_timeout(timeout)
        .timeout(timeout)
        .connect_lazy();
    Ok(PharmacyServiceClient::new(channel))
}
