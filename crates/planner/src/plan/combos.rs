//! Drive+reactor pairing on a notional reference ship.

use std::borrow::Cow;

use ppp_core::rocket::delta_v;
use ppp_core::units::acceleration_g;
use ppp_config::PlannerProfile;
use ppp_dominance::{Annotated, Criteria, Record, annotate};
use ppp_propulsion::{DriveFeatures, Reactor, ThrustRegime};
use serde::Serialize;
use tracing::{debug, trace};

/// Required-class tags that accept any reactor once normalized.
const ANY_CLASS_TAGS: [&str; 4] = ["any", "any_general", "any_reactor", "any_power_plant"];

/// Fixed payload and propellant masses used only to make combos comparable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceShip {
    pub payload_tons: f64,
    pub propellant_tons: f64,
}

impl Default for ReferenceShip {
    fn default() -> Self {
        Self {
            payload_tons: ppp_config::DEFAULT_REF_PAYLOAD_TONS,
            propellant_tons: ppp_config::DEFAULT_REF_PROPELLANT_TONS,
        }
    }
}

impl From<&PlannerProfile> for ReferenceShip {
    fn from(profile: &PlannerProfile) -> Self {
        Self {
            payload_tons: profile.ref_payload_tons,
            propellant_tons: profile.ref_propellant_tons,
        }
    }
}

impl ReferenceShip {
    pub fn is_valid(&self) -> bool {
        self.payload_tons.is_finite()
            && self.payload_tons > 0.0
            && self.propellant_tons.is_finite()
            && self.propellant_tons >= 0.0
    }
}

/// A compatible drive+reactor pair with its reference-ship performance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Combo {
    pub drive: String,
    pub drive_propellant: String,
    pub drive_thrust_n: f64,
    pub combat_thrust_multiplier: f64,
    pub drive_exhaust_velocity_km_s: f64,
    pub drive_power_gw: f64,
    pub drive_mass_tons: f64,
    pub fuel_score: f64,
    pub required_reactor_class: String,
    pub reactor: String,
    pub reactor_class: String,
    pub reactor_max_output_gw: f64,
    pub reactor_specific_power_t_gw: f64,
    /// Reactor output actually drawn by the drive.
    pub reactor_output_used_gw: f64,
    pub reactor_mass_tons: f64,
    pub ref_payload_tons: f64,
    pub ref_propellant_tons: f64,
    pub dry_mass_tons: f64,
    pub wet_mass_tons: f64,
    pub delta_v_km_s: f64,
    pub cruise_accel_g: f64,
    pub combat_accel_g: f64,
    /// Reactor max output over drive power; infinite for an unpowered drive on a live reactor.
    pub power_ratio: f64,
    pub enough_power: bool,
}

impl Combo {
    /// Drive and reactor mass, without payload or propellant.
    pub fn propulsion_mass_tons(&self) -> f64 {
        self.drive_mass_tons + self.reactor_mass_tons
    }

    pub fn thrust_for(&self, regime: ThrustRegime) -> f64 {
        match regime {
            ThrustRegime::Combat => self.drive_thrust_n * self.combat_thrust_multiplier,
            ThrustRegime::Cruise => self.drive_thrust_n,
        }
    }

    pub fn accel_for(&self, regime: ThrustRegime) -> f64 {
        match regime {
            ThrustRegime::Combat => self.combat_accel_g,
            ThrustRegime::Cruise => self.cruise_accel_g,
        }
    }
}

impl Record for Combo {
    fn label(&self) -> Cow<'_, str> {
        Cow::Owned(format!("{} + {}", self.drive, self.reactor))
    }
}

/// Trim, turn spaces into underscores, collapse underscore runs and lowercase.
pub fn normalize_class_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        let c = if c == ' ' { '_' } else { c };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Does a reactor of `reactor_class` satisfy a drive requiring `required`?
pub fn is_compatible(required: &str, reactor_class: &str) -> bool {
    let req = normalize_class_name(required);
    if req.is_empty() || ANY_CLASS_TAGS.contains(&req.as_str()) {
        return true;
    }
    let plant = normalize_class_name(reactor_class);
    if plant.is_empty() {
        return false;
    }
    if let Some(needed) = req.strip_prefix("any_") {
        return needed.is_empty() || plant.contains(needed);
    }
    plant.contains(req.as_str())
}

/// Pair one drive with one reactor. `None` when the classes do not match or when a zero-output
/// reactor would have to power a drive that draws power.
pub fn combine(drive: &DriveFeatures, reactor: &Reactor, ship: ReferenceShip) -> Option<Combo> {
    let d = &drive.drive;
    if !is_compatible(&d.required_reactor_class, &reactor.class) {
        return None;
    }

    let power = drive.power_gw;
    let max_output = reactor.max_output_gw;
    if max_output <= 0.0 && power > 0.0 {
        return None;
    }

    let (power_ratio, enough_power, output_used) = if power > 0.0 {
        (max_output / power, max_output >= power, power.min(max_output))
    } else {
        let ratio = if max_output > 0.0 { f64::INFINITY } else { 0.0 };
        (ratio, true, 0.0)
    };
    let reactor_mass = reactor.mass_at_output(output_used);

    let dry = ship.payload_tons + d.mass_tons + reactor_mass;
    let wet = dry + ship.propellant_tons;
    let cruise = acceleration_g(d.thrust_n, wet);

    Some(Combo {
        drive: d.name.clone(),
        drive_propellant: d.propellant_type.clone(),
        drive_thrust_n: d.thrust_n,
        combat_thrust_multiplier: d.combat_thrust_multiplier,
        drive_exhaust_velocity_km_s: d.exhaust_velocity_km_s,
        drive_power_gw: power,
        drive_mass_tons: d.mass_tons,
        fuel_score: drive.fuel_score,
        required_reactor_class: d.required_reactor_class.clone(),
        reactor: reactor.name.clone(),
        reactor_class: reactor.class.clone(),
        reactor_max_output_gw: max_output,
        reactor_specific_power_t_gw: reactor.specific_power_t_gw,
        reactor_output_used_gw: output_used,
        reactor_mass_tons: reactor_mass,
        ref_payload_tons: ship.payload_tons,
        ref_propellant_tons: ship.propellant_tons,
        dry_mass_tons: dry,
        wet_mass_tons: wet,
        delta_v_km_s: delta_v(d.exhaust_velocity_km_s, wet, dry),
        cruise_accel_g: cruise,
        combat_accel_g: cruise * d.combat_thrust_multiplier,
        power_ratio,
        enough_power,
    })
}

/// Cross the non-obsolete drives with the non-obsolete reactors, keeping compatible pairs.
///
/// Under-powered pairs are kept with `enough_power = false`; callers filter them.
pub fn build_combos(
    drives: &[Annotated<DriveFeatures>],
    reactors: &[Annotated<Reactor>],
    ship: ReferenceShip,
) -> Vec<Combo> {
    let mut combos = Vec::new();
    for drive in drives.iter().filter(|d| !d.is_obsolete()) {
        for reactor in reactors.iter().filter(|r| !r.is_obsolete()) {
            match combine(&drive.record, &reactor.record, ship) {
                Some(combo) => combos.push(combo),
                None => trace!(
                    target: "ppp.combos",
                    drive = %drive.record.drive.name,
                    reactor = %reactor.record.name,
                    "pair rejected"
                ),
            }
        }
    }
    debug!(target: "ppp.combos", combos = combos.len(), "combos built");
    combos
}

/// Combo ordering: delta-v, both accelerations and power ratio up, fuel score down.
pub fn combo_criteria() -> Criteria<Combo> {
    Criteria::new()
        .prefer_higher("delta-v", |c: &Combo| c.delta_v_km_s)
        .prefer_higher("cruise acceleration", |c| c.cruise_accel_g)
        .prefer_higher("combat acceleration", |c| c.combat_accel_g)
        .prefer_higher("power ratio", |c| c.power_ratio)
        .prefer_lower("fuel score", |c| c.fuel_score)
}

pub fn annotate_combos(combos: Vec<Combo>) -> Vec<Annotated<Combo>> {
    let annotated = annotate(combos, &combo_criteria());
    debug!(
        target: "ppp.combos",
        total = annotated.len(),
        obsolete = annotated.iter().filter(|c| c.is_obsolete()).count(),
        "combos annotated"
    );
    annotated
}
