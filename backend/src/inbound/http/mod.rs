//! HTTP inbound adapter: Subsonic REST endpoints and admin pages.

pub mod page;
pub mod pages;
pub mod query;
pub mod rest;
pub mod session;
pub mod session_config;
pub mod state;
pub mod subsonic;
#[cfg(test)]
pub mod test_utils;
