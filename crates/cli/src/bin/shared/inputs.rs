use std::path::Path;

use anyhow::anyhow;
use propulsion_power_planner::config::{PlannerProfile, load_profile};
use propulsion_power_planner::importer::{Catalog, TemplateLocator};
use tracing_subscriber::EnvFilter;

/// Log to stderr so stdout stays usable for tables and CSV.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the profile and the game catalog, dropping unlocked names the catalog does not know.
pub fn load_inputs(
    profile_path: &Path,
    templates: Option<&Path>,
) -> anyhow::Result<(PlannerProfile, Catalog)> {
    let mut profile = load_profile(profile_path)
        .map_err(|err| anyhow!("failed to load profile {}: {err}", profile_path.display()))?;
    let catalog = Catalog::load(&TemplateLocator::new(templates))?;
    profile.retain_known(&catalog.drive_families(), &catalog.reactor_names());
    Ok((profile, catalog))
}
