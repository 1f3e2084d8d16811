//! `flashstock-api` — HTTP request surface for the reservation core.
//!
//! Thin by design: translates inbound calls into coordinator operations
//! and coordinator results into JSON responses. No coordination logic
//! lives here.

pub mod app;
pub mod config;
pub mod seed;
