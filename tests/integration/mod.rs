//! Integration tests for the Setu gateway
//!
//! These drive the full router against wiremock upstreams.

mod endpoint;
mod fallback;
mod health;
mod modes;
