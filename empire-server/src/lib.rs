//! Empire server
//!
//! Hosts the event stream that API handlers publish to, together with the
//! Heroku compatible response helpers.

pub mod config;
pub mod heroku;
pub mod server;
pub mod shutdown;
pub mod state;
