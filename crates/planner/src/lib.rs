//! Planner façade crate consolidating obsolescence analysis, drive+reactor combination and
//! mission sizing, and exposing the supporting crates.

pub mod plan;

pub use facade::*;
pub use ppp_dominance as dominance;
pub use ppp_propulsion as propulsion;

mod facade;
