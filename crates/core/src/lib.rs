//! # Faultline Core
//!
//! Thread-safe, time-bucketed error metrics collection.
//!
//! This crate contains:
//! - [`ErrorMetricsCollector`], the process-local aggregator
//! - The [`Clock`] seam used for every time decision
//! - Port interfaces (traits) for the write side ([`ErrorSink`]) and the
//!   read side ([`MetricsSource`])
//!
//! ## Architecture Principles
//! - Only depends on `faultline-domain`
//! - No I/O, no background threads, no timers
//! - One mutex guards all mutable collector state
//! - Constructed explicitly and shared (e.g. behind an `Arc`), never a global

pub mod clock;
pub mod collector;

// Infrastructure ports
pub mod metrics_ports;

pub use clock::{Clock, ManualClock, SystemClock};
pub use collector::ErrorMetricsCollector;
pub use metrics_ports::{ErrorSink, MetricsSource};
