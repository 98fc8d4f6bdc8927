//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::geom::Crs;
use crate::solver::SolverConfig;

/// Full zoning run configuration, loaded from JSON by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoningConfig {
    /// Threshold search parameters.
    pub solver: SolverConfig,
    /// Raster cell size in working-CRS units.
    pub resolution: f64,
    /// Working (tree) coordinate reference.
    pub working_crs: Crs,
    /// CRS the land-use layer arrives in.
    pub land_use_crs: Crs,
}

impl Default for ZoningConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            resolution: 100.0,
            working_crs: Crs(3035),
            land_use_crs: Crs(3035),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_roundtrips_through_json() {
        let config = ZoningConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ZoningConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.solver.target_zone_count, config.solver.target_zone_count);
        assert_eq!(back.working_crs, config.working_crs);
    }

    #[test]
    fn partial_config_uses_field_values_present() {
        let json = r#"{
            "solver": {
                "target_zone_count": 2000,
                "lower_threshold": 10,
                "upper_threshold": 50000,
                "tolerance": 0.05,
                "max_iterations": 40
            },
            "resolution": 100.0,
            "working_crs": 3035,
            "land_use_crs": 31468
        }"#;
        let config: ZoningConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.solver.target_zone_count, 2000);
        assert_eq!(config.land_use_crs, Crs(31468));
    }
}
