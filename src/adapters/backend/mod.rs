//! Backend gateway adapters.
//!
//! `RestGateway` talks to the hosted gallery service; `UnconfiguredGateway`
//! is the degraded-mode stand-in when credentials are missing;
//! `MockGateway` is an in-memory backend for tests and offline demos.

pub mod mock_gateway;
pub mod rest_gateway;
pub mod unconfigured;

pub use mock_gateway::MockGateway;
pub use rest_gateway::RestGateway;
pub use unconfigured::UnconfiguredGateway;
