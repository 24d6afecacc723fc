//! Planning pipeline: unlocked subset, obsolescence, combos, combo obsolescence and mission sizing.

pub mod combos;
pub mod feasibility;
pub mod obsolescence;

use std::collections::BTreeSet;

use ppp_config::PlannerProfile;
use ppp_dominance::Annotated;
use ppp_propulsion::{
    Drive, DriveFeatures, FuelWeights, Reactor, ResourceAbundance, build_drive_features,
};
use tracing::debug;

use self::combos::{Combo, ReferenceShip, annotate_combos, build_combos};
use self::feasibility::{FeasibleDesign, MissionTarget, PropellantBounds, solve};
use self::obsolescence::{ObsolescenceConfig, annotate_drives, annotate_reactors};

/// Top-level planning error.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error(
        "reference ship needs a positive payload and non-negative propellant \
         (got {payload_tons} t payload, {propellant_tons} t propellant)"
    )]
    InvalidReferenceShip {
        payload_tons: f64,
        propellant_tons: f64,
    },
}

/// Everything the pipeline needs besides the catalog itself.
#[derive(Debug, Clone, Default)]
pub struct PlanSettings {
    pub unlocked_drive_families: Vec<String>,
    pub unlocked_reactors: Vec<String>,
    pub abundance: ResourceAbundance,
    pub fuel_weights: FuelWeights,
    pub obsolescence: ObsolescenceConfig,
    pub ship: ReferenceShip,
}

impl From<&PlannerProfile> for PlanSettings {
    fn from(profile: &PlannerProfile) -> Self {
        Self {
            unlocked_drive_families: profile.unlocked_drive_families.clone(),
            unlocked_reactors: profile.unlocked_reactors.clone(),
            abundance: profile.abundance(),
            fuel_weights: profile.fuel_weights(),
            obsolescence: ObsolescenceConfig::from(profile),
            ship: ReferenceShip::from(profile),
        }
    }
}

/// Annotated drives, reactors and combos for one configuration.
#[derive(Debug, Clone, Default)]
pub struct PlanReport {
    pub drives: Vec<Annotated<DriveFeatures>>,
    pub reactors: Vec<Annotated<Reactor>>,
    /// Combos with enough reactor power, annotated against each other.
    pub combos: Vec<Annotated<Combo>>,
    pub ship: ReferenceShip,
}

impl PlanReport {
    pub fn current_drives(&self) -> impl Iterator<Item = &DriveFeatures> {
        ppp_dominance::current(&self.drives)
    }

    pub fn current_reactors(&self) -> impl Iterator<Item = &Reactor> {
        ppp_dominance::current(&self.reactors)
    }

    pub fn current_combos(&self) -> impl Iterator<Item = &Combo> {
        ppp_dominance::current(&self.combos)
    }

    /// Size every non-obsolete combo for the mission, sorted by drive then reactor.
    pub fn feasible_designs(
        &self,
        target: &MissionTarget,
        bounds: PropellantBounds,
    ) -> Vec<FeasibleDesign> {
        let mut designs = solve(self.current_combos(), target, bounds);
        designs.sort_by(|a, b| (&a.drive, &a.reactor).cmp(&(&b.drive, &b.reactor)));
        designs
    }
}

/// Run the full pipeline over a catalog.
pub fn plan(
    drives: &[Drive],
    reactors: &[Reactor],
    settings: &PlanSettings,
) -> Result<PlanReport, PlanError> {
    let ship = settings.ship;
    if !ship.is_valid() {
        return Err(PlanError::InvalidReferenceShip {
            payload_tons: ship.payload_tons,
            propellant_tons: ship.propellant_tons,
        });
    }

    let families: BTreeSet<&str> = settings
        .unlocked_drive_families
        .iter()
        .map(String::as_str)
        .collect();
    let reactor_names: BTreeSet<&str> =
        settings.unlocked_reactors.iter().map(String::as_str).collect();

    let eligible_drives = drives
        .iter()
        .filter(|d| families.contains(d.family.as_str()));
    let features =
        build_drive_features(eligible_drives, &settings.abundance, &settings.fuel_weights);
    let eligible_reactors: Vec<Reactor> = reactors
        .iter()
        .filter(|r| reactor_names.contains(r.name.as_str()))
        .cloned()
        .collect();

    let drives = annotate_drives(features, settings.obsolescence);
    let reactors = annotate_reactors(eligible_reactors, settings.obsolescence);

    let powered: Vec<Combo> = build_combos(&drives, &reactors, ship)
        .into_iter()
        .filter(|c| c.enough_power)
        .collect();
    let combos = annotate_combos(powered);

    debug!(
        target: "ppp.combos",
        drives = drives.len(),
        reactors = reactors.len(),
        combos = combos.len(),
        "plan complete"
    );

    Ok(PlanReport {
        drives,
        reactors,
        combos,
        ship,
    })
}
