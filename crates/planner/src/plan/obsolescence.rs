//! Drive and reactor obsolescence, expressed as criteria tables for the dominance engine.

use ppp_config::PlannerProfile;
use ppp_dominance::{Annotated, Criteria, annotate};
use ppp_propulsion::{DriveFeatures, Reactor};
use tracing::debug;

/// Flags shaping the drive and reactor orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObsolescenceConfig {
    /// Drives of the same family never obsolete each other.
    pub ignore_intraclass: bool,
    /// Idle backup power is load-bearing: lacking it blocks dominance over a drive that has it.
    pub care_backup: bool,
    /// Crew size joins the reactor ordering (lower is better).
    pub care_crew: bool,
}

impl Default for ObsolescenceConfig {
    fn default() -> Self {
        Self {
            ignore_intraclass: false,
            care_backup: true,
            care_crew: false,
        }
    }
}

impl From<&PlannerProfile> for ObsolescenceConfig {
    fn from(profile: &PlannerProfile) -> Self {
        Self {
            ignore_intraclass: profile.ignore_intraclass,
            care_backup: profile.care_backup,
            care_crew: profile.care_crew,
        }
    }
}

/// Drive ordering: thrust, exhaust velocity and efficiency up, mass down.
///
/// Scarce propellant is a gate in every configuration; idle backup becomes one when
/// `care_backup` is set.
pub fn drive_criteria(config: ObsolescenceConfig) -> Criteria<DriveFeatures> {
    let mut criteria = Criteria::new()
        .same_class_veto(config.ignore_intraclass)
        .gate("abundant propellant", |d: &DriveFeatures| !d.scarce_propellant);
    if config.care_backup {
        criteria = criteria.gate("idle backup", |d: &DriveFeatures| d.idle_backup);
    }
    criteria
        .prefer_higher("thrust", |d| d.drive.thrust_n)
        .prefer_higher("exhaust velocity", |d| d.drive.exhaust_velocity_km_s)
        .prefer_higher("efficiency", |d| d.drive.efficiency)
        .prefer_lower("mass", |d| d.drive.mass_tons)
}

/// Reactor ordering: output, efficiency and general use up, specific power down, plus crew
/// when `care_crew` is set.
pub fn reactor_criteria(config: ObsolescenceConfig) -> Criteria<Reactor> {
    let criteria = Criteria::new()
        .prefer_higher("max output", |r: &Reactor| r.max_output_gw)
        .prefer_higher("efficiency", |r| r.efficiency)
        .prefer_higher("general use", |r| if r.general_use { 1.0 } else { 0.0 })
        .prefer_lower("specific power", |r| r.specific_power_t_gw);
    if config.care_crew {
        criteria.prefer_lower("crew", |r| r.crew)
    } else {
        criteria
    }
}

pub fn annotate_drives(
    drives: Vec<DriveFeatures>,
    config: ObsolescenceConfig,
) -> Vec<Annotated<DriveFeatures>> {
    let annotated = annotate(drives, &drive_criteria(config));
    debug!(
        target: "ppp.obsolescence",
        total = annotated.len(),
        obsolete = annotated.iter().filter(|d| d.is_obsolete()).count(),
        "drives annotated"
    );
    annotated
}

pub fn annotate_reactors(
    reactors: Vec<Reactor>,
    config: ObsolescenceConfig,
) -> Vec<Annotated<Reactor>> {
    let annotated = annotate(reactors, &reactor_criteria(config));
    debug!(
        target: "ppp.obsolescence",
        total = annotated.len(),
        obsolete = annotated.iter().filter(|r| r.is_obsolete()).count(),
        "reactors annotated"
    );
    annotated
}
