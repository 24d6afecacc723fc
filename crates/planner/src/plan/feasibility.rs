//! Closed-form mission sizing.
//!
//! For a fixed delta-v target the mass ratio `R = exp(dv / ev)` is fixed, so propellant is a
//! linear function of payload: `prop = (m0 + payload)(R - 1)`, with `m0` the drive and reactor
//! mass. The acceleration floor and the propellant cap each give a payload ceiling; the combo is
//! sized at the minimum payload if that sits under both ceilings.

use ppp_config::MissionProfile;
use ppp_core::rocket::mass_ratio;
use ppp_core::units::{acceleration_g, max_mass_for_acceleration};
use ppp_propulsion::ThrustRegime;
use serde::Serialize;
use tracing::{debug, trace};

use super::combos::Combo;

/// What the ship has to achieve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MissionTarget {
    pub delta_v_km_s: f64,
    pub accel_g: f64,
    pub regime: ThrustRegime,
    pub min_payload_tons: f64,
}

impl Default for MissionTarget {
    fn default() -> Self {
        MissionTarget::from(&MissionProfile::default())
    }
}

impl From<&MissionProfile> for MissionTarget {
    fn from(mission: &MissionProfile) -> Self {
        Self {
            delta_v_km_s: mission.delta_v_km_s,
            accel_g: mission.accel_g,
            regime: mission.regime,
            min_payload_tons: mission.min_payload_tons,
        }
    }
}

impl MissionTarget {
    /// Both targets must be strictly positive and the minimum payload a finite, non-negative
    /// mass for the solver to run.
    pub fn is_solvable(&self) -> bool {
        self.delta_v_km_s > 0.0
            && self.accel_g > 0.0
            && self.min_payload_tons.is_finite()
            && self.min_payload_tons >= 0.0
    }
}

/// Allowed propellant load in tons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PropellantBounds {
    pub min_tons: f64,
    pub max_tons: f64,
}

impl Default for PropellantBounds {
    fn default() -> Self {
        PropellantBounds::from(&MissionProfile::default())
    }
}

impl From<&MissionProfile> for PropellantBounds {
    fn from(mission: &MissionProfile) -> Self {
        Self {
            min_tons: mission.propellant_min_tons,
            max_tons: mission.propellant_max_tons,
        }
    }
}

impl PropellantBounds {
    /// Same bounds with `min <= max`.
    pub fn ordered(self) -> Self {
        if self.max_tons < self.min_tons {
            Self {
                min_tons: self.max_tons,
                max_tons: self.min_tons,
            }
        } else {
            self
        }
    }
}

/// A combo sized for the mission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibleDesign {
    pub drive: String,
    pub reactor: String,
    pub payload_tons: f64,
    pub propellant_tons: f64,
    pub delta_v_km_s: f64,
    pub accel_g: f64,
    /// Payload that could still be added before the acceleration floor or propellant cap bites.
    pub additional_payload_tons: f64,
}

impl FeasibleDesign {
    pub fn wet_mass_tons(&self, combo: &Combo) -> f64 {
        combo.propulsion_mass_tons() + self.payload_tons + self.propellant_tons
    }
}

/// Size one combo. `None` when the combo cannot meet the target within the bounds.
pub fn size_combo(
    combo: &Combo,
    target: &MissionTarget,
    bounds: PropellantBounds,
) -> Option<FeasibleDesign> {
    if !target.is_solvable() {
        return None;
    }
    let bounds = bounds.ordered();
    let ev = combo.drive_exhaust_velocity_km_s;
    if !combo.enough_power || combo.drive_thrust_n <= 0.0 || ev <= 0.0 {
        return None;
    }
    let thrust = combo.thrust_for(target.regime);
    if thrust <= 0.0 {
        return None;
    }

    let ratio = mass_ratio(target.delta_v_km_s, ev);
    if !ratio.is_finite() || ratio <= 1.0 {
        return None;
    }

    let m0 = combo.propulsion_mass_tons();
    let wet_ceiling = max_mass_for_acceleration(thrust, target.accel_g);
    if !(wet_ceiling > 0.0) {
        return None;
    }
    let payload_by_accel = wet_ceiling / ratio - m0;
    let payload_by_propellant = if bounds.max_tons > 0.0 {
        bounds.max_tons / (ratio - 1.0) - m0
    } else {
        payload_by_accel
    };
    let payload_ceiling = payload_by_accel.min(payload_by_propellant);
    if payload_ceiling < target.min_payload_tons {
        return None;
    }

    let payload = target.min_payload_tons;
    let propellant = (m0 + payload) * (ratio - 1.0);
    if propellant < bounds.min_tons || propellant > bounds.max_tons {
        return None;
    }

    let accel = acceleration_g(thrust, m0 + payload + propellant);
    if accel < target.accel_g {
        return None;
    }

    Some(FeasibleDesign {
        drive: combo.drive.clone(),
        reactor: combo.reactor.clone(),
        payload_tons: payload,
        propellant_tons: propellant,
        delta_v_km_s: target.delta_v_km_s,
        accel_g: accel,
        additional_payload_tons: (payload_ceiling - payload).max(0.0),
    })
}

/// Size every combo, keeping the feasible ones in input order.
///
/// Targets that fail [`MissionTarget::is_solvable`] yield no results.
pub fn solve<'a, I>(
    combos: I,
    target: &MissionTarget,
    bounds: PropellantBounds,
) -> Vec<FeasibleDesign>
where
    I: IntoIterator<Item = &'a Combo>,
{
    if !target.is_solvable() {
        debug!(
            target: "ppp.feasibility",
            delta_v = target.delta_v_km_s,
            accel = target.accel_g,
            min_payload = target.min_payload_tons,
            "mission target not solvable"
        );
        return Vec::new();
    }

    let mut designs = Vec::new();
    let mut considered = 0usize;
    for combo in combos {
        considered += 1;
        match size_combo(combo, target, bounds) {
            Some(design) => designs.push(design),
            None => trace!(
                target: "ppp.feasibility",
                drive = %combo.drive,
                reactor = %combo.reactor,
                "infeasible"
            ),
        }
    }
    debug!(
        target: "ppp.feasibility",
        considered,
        feasible = designs.len(),
        "mission sizing complete"
    );
    designs
}
