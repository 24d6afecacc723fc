//! Drive and reactor record models.
//!
//! Records are immutable once loaded; campaign-dependent metrics (scarcity, fuel score)
//! are derived into [`DriveFeatures`] whenever the settings change.

pub mod drive;
pub mod reactor;
pub mod resources;

pub use drive::{
    ANY_REACTOR, BackupMode, Drive, DriveFeatures, ThrustRegime, build_drive_features,
    family_name,
};
pub use reactor::Reactor;
pub use resources::{FuelWeights, Resource, ResourceAbundance, UnknownResource};
