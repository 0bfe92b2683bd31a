//! Treatment memory: last qualifying treatment level per (patient, affliction).
//!
//! Provides the record model, the in-session store with its gate predicate and
//! periodic sweep, and JSON persistence for the host's save facility.

pub mod file;
pub mod model;
pub mod store;
