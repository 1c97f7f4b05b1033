//! HTTP API: server wiring, routing, and error-to-status mapping.

pub mod app;
