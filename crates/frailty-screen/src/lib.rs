//! Motor frailty screening for residents entering long-term care.
//!
//! The [`screening`] module holds the decision logic: an intake record goes in, a scored
//! assessment with risk level, detected factors, recommendations, and per-dimension severities
//! comes out. Everything else in the crate is plumbing around it.

pub mod config;
pub mod error;
pub mod screening;
pub mod telemetry;
