//! CSV tables for annotated drives, reactors, combos and sized designs.

use std::io::Write;

use ppp_dominance::{Annotated, Annotation};
use ppp_planner::{Combo, FeasibleDesign};
use ppp_propulsion::{DriveFeatures, Reactor};
use serde::Serialize;

use crate::{AccelUnit, ExportError};

#[derive(Serialize)]
struct DriveRow<'a> {
    name: &'a str,
    family: &'a str,
    thrust_n: f64,
    exhaust_velocity_km_s: f64,
    efficiency: f64,
    mass_tons: f64,
    combat_thrust_multiplier: f64,
    power_gw: f64,
    propellant: &'a str,
    propellant_mix: String,
    backup: String,
    required_reactor_class: &'a str,
    scarce_propellant: bool,
    fuel_score: f64,
    unlock_project: &'a str,
    unlock_cost: f64,
    obsolete: bool,
    dominates_count: usize,
    dominated_by: String,
    domination_efficiency: Option<f64>,
}

#[derive(Serialize)]
struct ReactorRow<'a> {
    name: &'a str,
    class: &'a str,
    max_output_gw: f64,
    specific_power_t_gw: f64,
    efficiency: f64,
    crew: f64,
    general_use: bool,
    unlock_project: &'a str,
    unlock_cost: f64,
    obsolete: bool,
    dominates_count: usize,
    dominated_by: String,
    domination_efficiency: Option<f64>,
}

#[derive(Serialize)]
struct ComboRow<'a> {
    drive: &'a str,
    reactor: &'a str,
    drive_propellant: &'a str,
    required_reactor_class: &'a str,
    reactor_class: &'a str,
    drive_power_gw: f64,
    reactor_output_used_gw: f64,
    reactor_mass_tons: f64,
    dry_mass_tons: f64,
    wet_mass_tons: f64,
    delta_v_km_s: f64,
    cruise_accel: f64,
    combat_accel: f64,
    accel_unit: &'static str,
    power_ratio: f64,
    fuel_score: f64,
    obsolete: bool,
    dominated_by: String,
}

#[derive(Serialize)]
struct DesignRow<'a> {
    drive: &'a str,
    reactor: &'a str,
    payload_tons: f64,
    propellant_tons: f64,
    delta_v_km_s: f64,
    accel: f64,
    accel_unit: &'static str,
    additional_payload_tons: f64,
}

fn dominators(annotation: &Annotation) -> String {
    annotation.dominated_by.join(", ")
}

pub fn write_drives<W: Write>(
    writer: W,
    drives: &[Annotated<DriveFeatures>],
) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for entry in drives {
        let f = &entry.record;
        let d = &f.drive;
        csv.serialize(DriveRow {
            name: &d.name,
            family: &d.family,
            thrust_n: d.thrust_n,
            exhaust_velocity_km_s: d.exhaust_velocity_km_s,
            efficiency: d.efficiency,
            mass_tons: d.mass_tons,
            combat_thrust_multiplier: d.combat_thrust_multiplier,
            power_gw: f.power_gw,
            propellant: &d.propellant_type,
            propellant_mix: d.propellant_mix(),
            backup: d.backup.to_string(),
            required_reactor_class: &d.required_reactor_class,
            scarce_propellant: f.scarce_propellant,
            fuel_score: f.fuel_score,
            unlock_project: &d.unlock_project,
            unlock_cost: d.unlock_cost,
            obsolete: entry.annotation.obsolete,
            dominates_count: entry.annotation.dominates_count,
            dominated_by: dominators(&entry.annotation),
            domination_efficiency: entry.annotation.domination_efficiency,
        })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_reactors<W: Write>(
    writer: W,
    reactors: &[Annotated<Reactor>],
) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for entry in reactors {
        let r = &entry.record;
        csv.serialize(ReactorRow {
            name: &r.name,
            class: &r.class,
            max_output_gw: r.max_output_gw,
            specific_power_t_gw: r.specific_power_t_gw,
            efficiency: r.efficiency,
            crew: r.crew,
            general_use: r.general_use,
            unlock_project: &r.unlock_project,
            unlock_cost: r.unlock_cost,
            obsolete: entry.annotation.obsolete,
            dominates_count: entry.annotation.dominates_count,
            dominated_by: dominators(&entry.annotation),
            domination_efficiency: entry.annotation.domination_efficiency,
        })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_combos<W: Write>(
    writer: W,
    combos: &[Annotated<Combo>],
    accel: AccelUnit,
) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for entry in combos {
        let c = &entry.record;
        csv.serialize(ComboRow {
            drive: &c.drive,
            reactor: &c.reactor,
            drive_propellant: &c.drive_propellant,
            required_reactor_class: &c.required_reactor_class,
            reactor_class: &c.reactor_class,
            drive_power_gw: c.drive_power_gw,
            reactor_output_used_gw: c.reactor_output_used_gw,
            reactor_mass_tons: c.reactor_mass_tons,
            dry_mass_tons: c.dry_mass_tons,
            wet_mass_tons: c.wet_mass_tons,
            delta_v_km_s: c.delta_v_km_s,
            cruise_accel: accel.convert(c.cruise_accel_g),
            combat_accel: accel.convert(c.combat_accel_g),
            accel_unit: accel.symbol(),
            power_ratio: c.power_ratio,
            fuel_score: c.fuel_score,
            obsolete: entry.annotation.obsolete,
            dominated_by: dominators(&entry.annotation),
        })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_designs<W: Write>(
    writer: W,
    designs: &[FeasibleDesign],
    accel: AccelUnit,
) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for d in designs {
        csv.serialize(DesignRow {
            drive: &d.drive,
            reactor: &d.reactor,
            payload_tons: d.payload_tons,
            propellant_tons: d.propellant_tons,
            delta_v_km_s: d.delta_v_km_s,
            accel: accel.convert(d.accel_g),
            accel_unit: accel.symbol(),
            additional_payload_tons: d.additional_payload_tons,
        })?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design() -> FeasibleDesign {
        FeasibleDesign {
            drive: "Torch x1".to_string(),
            reactor: "Tokamak".to_string(),
            payload_tons: 100.0,
            propellant_tons: 50.0,
            delta_v_km_s: 30.0,
            accel_g: 0.25,
            additional_payload_tons: 12.5,
        }
    }

    #[test]
    fn designs_csv_in_milligees() {
        let mut buf = Vec::new();
        write_designs(&mut buf, &[design()], AccelUnit::MilliG).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "drive,reactor,payload_tons,propellant_tons,delta_v_km_s,accel,accel_unit,\
                 additional_payload_tons"
            )
        );
        assert_eq!(lines.next(), Some("Torch x1,Tokamak,100.0,50.0,30.0,250.0,mg,12.5"));
    }

    #[test]
    fn reactors_csv_lists_dominators() {
        let reactor = Reactor {
            name: "Pile".to_string(),
            class: "Fission_Pile".to_string(),
            max_output_gw: 1.0,
            specific_power_t_gw: 2.0,
            efficiency: 0.9,
            crew: 0.0,
            general_use: true,
            unlock_project: String::new(),
            unlock_cost: 0.0,
        };
        let entry = Annotated {
            record: reactor,
            annotation: Annotation {
                obsolete: true,
                dominated_by: vec!["A".to_string(), "B".to_string()],
                dominates_count: 0,
                domination_efficiency: None,
            },
        };
        let mut buf = Vec::new();
        write_reactors(&mut buf, &[entry]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.lines().nth(1).unwrap().ends_with("true,0,\"A, B\","));
    }
}
