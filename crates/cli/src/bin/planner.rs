use std::path::PathBuf;

use clap::Parser;
use propulsion_power_planner::dominance::Annotated;
use propulsion_power_planner::export::{AccelUnit, export_plan};
use propulsion_power_planner::planner::{PlanSettings, plan};

#[path = "shared/inputs.rs"]
mod inputs;

/// Report which unlocked drives, reactors and drive+reactor combos are still worth building.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Drive and reactor obsolescence report"
)]
struct Cli {
    /// Planner profile (YAML, TOML or JSON)
    #[arg(long)]
    profile: PathBuf,

    /// Folder holding the game templates (default: TI_TEMPLATES_DIR, Steam install, cwd)
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Write drives.csv, reactors.csv, combos.csv and report.json into this folder
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Also list obsolete entries
    #[arg(long, default_value_t = false)]
    show_obsolete: bool,
}

fn main() -> anyhow::Result<()> {
    inputs::init_logging();
    let cli = Cli::parse();
    let (profile, catalog) = inputs::load_inputs(&cli.profile, cli.templates.as_deref())?;

    let report = plan(&catalog.drives, &catalog.reactors, &PlanSettings::from(&profile))?;
    let accel = AccelUnit::from_milligees_flag(profile.accel_in_milligees);

    println!("=== Drives ({}) ===", summary(&report.drives));
    for entry in visible(&report.drives, cli.show_obsolete) {
        let d = &entry.record;
        println!(
            "{:<36} thrust {:>12.0} N  EV {:>9.1} km/s  power {:>10.3} GW  mass {:>7.1} t{}",
            d.drive.name,
            d.drive.thrust_n,
            d.drive.exhaust_velocity_km_s,
            d.power_gw,
            d.drive.mass_tons,
            dominated_note(entry)
        );
    }

    println!("=== Reactors ({}) ===", summary(&report.reactors));
    for entry in visible(&report.reactors, cli.show_obsolete) {
        let r = &entry.record;
        println!(
            "{:<36} output {:>10.3} GW  specific {:>8.3} t/GW  efficiency {:.4}  crew {:.0}{}",
            r.name,
            r.max_output_gw,
            r.specific_power_t_gw,
            r.efficiency,
            r.crew,
            dominated_note(entry)
        );
    }

    println!(
        "=== Combos ({}; ref ship {:.0} t payload, {:.0} t propellant) ===",
        summary(&report.combos),
        report.ship.payload_tons,
        report.ship.propellant_tons
    );
    for entry in visible(&report.combos, cli.show_obsolete) {
        let c = &entry.record;
        println!(
            "{:<56} Δv {:>8.2} km/s  cruise {:.4} {unit}  combat {:.4} {unit}  power ratio {:.2}{}",
            format!("{} + {}", c.drive, c.reactor),
            c.delta_v_km_s,
            accel.convert(c.cruise_accel_g),
            accel.convert(c.combat_accel_g),
            c.power_ratio,
            dominated_note(entry),
            unit = accel.symbol()
        );
    }

    if let Some(dir) = &cli.export_dir {
        for path in export_plan(dir, &report, accel)? {
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

fn summary<R>(entries: &[Annotated<R>]) -> String {
    let obsolete = entries.iter().filter(|e| e.is_obsolete()).count();
    format!("{} unlocked, {} obsolete", entries.len(), obsolete)
}

fn visible<R>(
    entries: &[Annotated<R>],
    show_obsolete: bool,
) -> impl Iterator<Item = &Annotated<R>> {
    entries
        .iter()
        .filter(move |e| show_obsolete || !e.is_obsolete())
}

fn dominated_note<R>(entry: &Annotated<R>) -> String {
    if entry.is_obsolete() {
        format!("  [obsolete; beaten by {}]", entry.annotation.dominated_by.join(", "))
    } else {
        String::new()
    }
}
