//! Propulsion Power Planner.
//!
//! Finds which unlocked drives and reactors are obsolete, pairs the rest into drive+reactor
//! combos with reference-ship performance, and sizes those combos for a mission. Every piece
//! lives in its own workspace crate; this crate re-exports them so front-ends (CLI, tests) share
//! one path.

pub use ppp_config as config;
pub use ppp_core::{constants, rocket, units};
pub use ppp_dominance as dominance;
pub use ppp_export as export;
pub use ppp_importer as importer;
pub use ppp_planner as planner;
pub use ppp_propulsion as propulsion;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
