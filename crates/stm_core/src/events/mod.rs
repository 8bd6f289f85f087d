//! Synchronous publish/subscribe plumbing.
//!
//! # Responsibility
//! - Provide the multicast relay used for selection and project events.
//! - Hand out explicit cancellation handles for every subscription.
//!
//! # Invariants
//! - Delivery is synchronous: every subscriber sees an emission before the
//!   emitting call returns.
//! - A cancelled subscription never receives another emission, including the
//!   remainder of an emission that is currently being delivered.
//! - The relay stores no payloads; it only fans out values it is handed.

pub mod broadcast;
pub mod project_bus;
