//! Pretty JSON report of a full plan.

use std::io::Write;

use ppp_dominance::Annotated;
use ppp_planner::{FeasibleDesign, MissionTarget, PlanReport, ReferenceShip};
use serde::Serialize;

use crate::ExportError;

#[derive(Serialize)]
struct Entry<'a, R> {
    #[serde(flatten)]
    record: &'a R,
    obsolete: bool,
    dominated_by: &'a [String],
    dominates_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    domination_efficiency: Option<f64>,
}

#[derive(Serialize)]
struct MissionSection<'a> {
    target: &'a MissionTarget,
    designs: &'a [FeasibleDesign],
}

#[derive(Serialize)]
struct Report<'a> {
    reference_ship: ReferenceShip,
    drives: Vec<Entry<'a, ppp_propulsion::DriveFeatures>>,
    reactors: Vec<Entry<'a, ppp_propulsion::Reactor>>,
    combos: Vec<Entry<'a, ppp_planner::Combo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mission: Option<MissionSection<'a>>,
}

fn entries<R>(annotated: &[Annotated<R>]) -> Vec<Entry<'_, R>> {
    annotated
        .iter()
        .map(|a| Entry {
            record: &a.record,
            obsolete: a.annotation.obsolete,
            dominated_by: &a.annotation.dominated_by,
            dominates_count: a.annotation.dominates_count,
            domination_efficiency: a.annotation.domination_efficiency,
        })
        .collect()
}

/// Write the plan, and optionally a sized mission, as pretty JSON.
pub fn write_report<W: Write>(
    mut writer: W,
    plan: &PlanReport,
    mission: Option<(&MissionTarget, &[FeasibleDesign])>,
) -> Result<(), ExportError> {
    let report = Report {
        reference_ship: plan.ship,
        drives: entries(&plan.drives),
        reactors: entries(&plan.reactors),
        combos: entries(&plan.combos),
        mission: mission.map(|(target, designs)| MissionSection { target, designs }),
    };
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
