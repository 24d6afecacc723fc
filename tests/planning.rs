use std::path::PathBuf;

use propulsion_power_planner::config::load_profile;
use propulsion_power_planner::export::{AccelUnit, export_plan};
use propulsion_power_planner::importer::{Catalog, TemplateLocator};
use propulsion_power_planner::planner::{
    MissionTarget, PlanReport, PlanSettings, PropellantBounds, plan,
};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/fixtures")
}

fn fixture_plan() -> (PlanReport, MissionTarget, PropellantBounds) {
    let catalog = Catalog::load(&TemplateLocator::from_dirs(vec![fixtures()]))
        .expect("fixture catalog should load");
    let mut profile = load_profile(fixtures().join("profile.yaml")).expect("fixture profile");
    profile.retain_known(&catalog.drive_families(), &catalog.reactor_names());
    assert!(
        !profile
            .unlocked_drive_families
            .iter()
            .any(|f| f == "Warp Drive")
    );

    let report = plan(&catalog.drives, &catalog.reactors, &PlanSettings::from(&profile))
        .expect("plan should succeed");
    (
        report,
        MissionTarget::from(&profile.mission),
        PropellantBounds::from(&profile.mission),
    )
}

#[test]
fn obsolete_drives_and_reactors() {
    let (report, _, _) = fixture_plan();

    let obsolete_drives: Vec<&str> = report
        .drives
        .iter()
        .filter(|d| d.is_obsolete())
        .map(|d| d.record.drive.name.as_str())
        .collect();
    assert_eq!(obsolete_drives, vec!["Hydrogen Resistojet x1"]);

    let plasma = report
        .drives
        .iter()
        .find(|d| d.record.drive.family == "Antimatter Plasma")
        .expect("plasma present");
    assert!(plasma.record.scarce_propellant);
    assert!(!plasma.is_obsolete());

    let pile = report
        .reactors
        .iter()
        .find(|r| r.record.name == "Fission Pile")
        .expect("pile present");
    assert_eq!(
        pile.annotation.dominated_by,
        vec!["Advanced Fission Reactor", "Tokamak"]
    );

    let tokamak = report
        .reactors
        .iter()
        .find(|r| r.record.name == "Tokamak")
        .expect("tokamak present");
    assert_eq!(tokamak.annotation.dominates_count, 2);
    let efficiency = tokamak
        .annotation
        .domination_efficiency
        .expect("tokamak has an unlock cost");
    assert!((efficiency - 2_000.0 / 24_500.0).abs() < 1e-12);

    let current: Vec<&str> = report.current_reactors().map(|r| r.name.as_str()).collect();
    assert_eq!(current, vec!["Tokamak", "Antimatter Reactor"]);
}

#[test]
fn combos_only_pair_compatible_current_records() {
    let (report, _, _) = fixture_plan();
    let labels: Vec<String> = report
        .combos
        .iter()
        .map(|c| format!("{} + {}", c.record.drive, c.record.reactor))
        .collect();
    assert_eq!(
        labels,
        vec![
            "Tungsten Resistojet x1 + Tokamak",
            "Tungsten Resistojet x1 + Antimatter Reactor",
            "Tungsten Resistojet x2 + Tokamak",
            "Tungsten Resistojet x2 + Antimatter Reactor",
            "Tokamak Torch x1 + Tokamak",
            "Antimatter Plasma x1 + Antimatter Reactor",
            "Ion Drive x1 + Tokamak",
            "Ion Drive x1 + Antimatter Reactor",
        ]
    );
    assert!(report.combos.iter().all(|c| c.record.enough_power));

    // A lighter reactor with more headroom beats the tokamak for the small resistojet.
    let small_on_tokamak = &report.combos[0];
    assert!(small_on_tokamak.is_obsolete());
    assert_eq!(
        small_on_tokamak.annotation.dominated_by,
        vec!["Tungsten Resistojet x1 + Antimatter Reactor"]
    );
}

#[test]
fn mission_designs_hit_target_delta_v() {
    let (report, target, bounds) = fixture_plan();
    let designs = report.feasible_designs(&target, bounds);
    let pairs: Vec<(&str, &str)> = designs
        .iter()
        .map(|d| (d.drive.as_str(), d.reactor.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Antimatter Plasma x1", "Antimatter Reactor"),
            ("Tokamak Torch x1", "Tokamak"),
        ]
    );

    for design in &designs {
        let combo = report
            .combos
            .iter()
            .map(|c| &c.record)
            .find(|c| c.drive == design.drive && c.reactor == design.reactor)
            .expect("design comes from a combo");
        let dry = combo.propulsion_mass_tons() + design.payload_tons;
        let wet = dry + design.propellant_tons;
        let achieved = combo.drive_exhaust_velocity_km_s * (wet / dry).ln();
        assert!(((achieved - target.delta_v_km_s) / target.delta_v_km_s).abs() < 1e-6);
        assert!(design.accel_g >= target.accel_g);
        assert!(design.propellant_tons <= bounds.max_tons);
    }
}

#[test]
fn exported_tables_match_report() {
    let (report, _, _) = fixture_plan();
    let dir = tempfile::tempdir().expect("tempdir");
    export_plan(dir.path(), &report, AccelUnit::MilliG).expect("export should succeed");

    let mut reader = csv::Reader::from_path(dir.path().join("combos.csv")).expect("combos.csv");
    let headers = reader.headers().expect("headers").clone();
    let unit_idx = headers.iter().position(|h| h == "accel_unit").expect("unit column");
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("row")).collect();
    assert_eq!(rows.len(), report.combos.len());
    assert!(rows.iter().all(|r| &r[unit_idx] == "mg"));

    let json: serde_json::Value = serde_json::from_reader(
        std::fs::File::open(dir.path().join("report.json")).expect("report.json"),
    )
    .expect("valid JSON");
    assert_eq!(json["drives"].as_array().map(Vec::len), Some(report.drives.len()));
    assert_eq!(json["reactors"][0]["name"], "Fission Pile");
    assert_eq!(json["reactors"][0]["obsolete"], true);
}
