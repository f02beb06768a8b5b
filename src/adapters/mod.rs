//! Infrastructure adapters. Implement outbound ports.
//!
//! Backend HTTP gateway, mock/unconfigured gateways, terminal UI.
//! Map infrastructure errors to GatewayError at this boundary.

pub mod backend;
pub mod ui;
