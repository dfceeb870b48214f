//! Outbound adapters implementing domain ports.

pub mod render;
pub mod session;
