//! Re-exported APIs for consumers of the planner crate.

pub use crate::plan::combos::{
    Combo, ReferenceShip, annotate_combos, build_combos, combine, combo_criteria, is_compatible,
    normalize_class_name,
};
pub use crate::plan::feasibility::{
    FeasibleDesign, MissionTarget, PropellantBounds, size_combo, solve,
};
pub use crate::plan::obsolescence::{
    ObsolescenceConfig, annotate_drives, annotate_reactors, drive_criteria, reactor_criteria,
};
pub use crate::plan::{PlanError, PlanReport, PlanSettings, plan};
pub use ppp_dominance::{Annotated, Annotation, Criteria, Record, Verdict};
pub use ppp_propulsion::{Drive, DriveFeatures, Reactor, ThrustRegime};
