//! # commitcast
//!
//! Postgres-backed one-shot announcer for commit records.
//!
//! Claims the freshest pending commit from a durable queue, enriches it with
//! the author's public handle, renders a bounded-length message, and hands it
//! to a publishing sink.

pub mod config;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod model;
pub mod publish;
pub mod resolve;
pub mod telemetry;
