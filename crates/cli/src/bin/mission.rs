use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use propulsion_power_planner::export::{AccelUnit, write_designs, write_report, writer_for_path};
use propulsion_power_planner::planner::{
    MissionTarget, PlanSettings, PropellantBounds, ThrustRegime, plan,
};

#[path = "shared/inputs.rs"]
mod inputs;

/// Size every current drive+reactor combo for a delta-v and acceleration target.
#[derive(Parser, Debug)]
#[command(author, version, about = "Mission feasibility sizing")]
struct Cli {
    /// Planner profile (YAML, TOML or JSON)
    #[arg(long)]
    profile: PathBuf,

    /// Folder holding the game templates
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Target delta-v in km/s (defaults to the profile's mission)
    #[arg(long, allow_negative_numbers = true)]
    delta_v: Option<f64>,

    /// Target acceleration in g (defaults to the profile's mission)
    #[arg(long, allow_negative_numbers = true)]
    accel: Option<f64>,

    /// Thrust regime the acceleration target applies to
    #[arg(long, value_enum)]
    regime: Option<Regime>,

    /// Minimum payload in tons
    #[arg(long, allow_negative_numbers = true)]
    min_payload: Option<f64>,

    /// Write the sized designs as CSV (`-` for stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the plan and the sized designs as a JSON report (`-` for stdout)
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Regime {
    Combat,
    Cruise,
}

impl From<Regime> for ThrustRegime {
    fn from(regime: Regime) -> Self {
        match regime {
            Regime::Combat => ThrustRegime::Combat,
            Regime::Cruise => ThrustRegime::Cruise,
        }
    }
}

fn main() -> anyhow::Result<()> {
    inputs::init_logging();
    let cli = Cli::parse();
    let (profile, catalog) = inputs::load_inputs(&cli.profile, cli.templates.as_deref())?;

    let mut target = MissionTarget::from(&profile.mission);
    if let Some(dv) = cli.delta_v {
        target.delta_v_km_s = dv;
    }
    if let Some(accel) = cli.accel {
        target.accel_g = accel;
    }
    if let Some(regime) = cli.regime {
        target.regime = regime.into();
    }
    if let Some(payload) = cli.min_payload {
        target.min_payload_tons = payload;
    }
    let bounds = PropellantBounds::from(&profile.mission);

    if !target.is_solvable() {
        eprintln!(
            "warning: delta-v and acceleration targets must be positive and the minimum payload \
             non-negative; nothing to size"
        );
        return Ok(());
    }

    let report = plan(&catalog.drives, &catalog.reactors, &PlanSettings::from(&profile))?;
    let designs = report.feasible_designs(&target, bounds);
    let accel = AccelUnit::from_milligees_flag(profile.accel_in_milligees);

    let to_stdout = is_stdout(cli.output.as_deref()) || is_stdout(cli.report.as_deref());
    if !to_stdout {
        println!("=== Mission Feasibility ===");
        println!(
            "Target          : Δv = {:.2} km/s, accel = {:.4} {} ({}), min payload = {:.0} t",
            target.delta_v_km_s,
            accel.convert(target.accel_g),
            accel.symbol(),
            target.regime,
            target.min_payload_tons
        );
        if designs.is_empty() {
            println!(
                "No drive + reactor combination meets these targets within the propellant bounds."
            );
        }
        for d in &designs {
            println!(
                "{:<56} payload {:>8.1} t  propellant {:>9.1} t  accel {:.4} {}  \
                 spare payload {:>9.1} t",
                format!("{} + {}", d.drive, d.reactor),
                d.payload_tons,
                d.propellant_tons,
                accel.convert(d.accel_g),
                accel.symbol(),
                d.additional_payload_tons
            );
        }
    }

    if let Some(path) = &cli.output {
        write_designs(writer_for_path(path)?, &designs, accel)?;
        if !to_stdout {
            println!("Wrote {}", path.display());
        }
    }

    if let Some(path) = &cli.report {
        write_report(writer_for_path(path)?, &report, Some((&target, designs.as_slice())))?;
        if !to_stdout {
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

fn is_stdout(path: Option<&Path>) -> bool {
    path.is_some_and(|p| p.as_os_str() == "-")
}
