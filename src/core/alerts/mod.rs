// At-risk alert system: one letter per (patient, affliction) episode.
//
// Architecture:
// - model.rs: Alert keys and the notification request handed to the host
// - triggers.rs: The at-risk trigger condition for one affliction
// - engine.rs: Fired-set bookkeeping (arm / fire / re-arm) over a patient's afflictions

pub mod engine;
pub mod model;
pub mod triggers;
