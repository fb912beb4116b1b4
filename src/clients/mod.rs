pub mod gateway_client;

pub use gateway_client::{ContribGateway, GatewayClient, RollbackGateway};
