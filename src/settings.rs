//! Mission settings loading.
//!
//! TOML-backed defaults for the planners, so a ground-station frontend can
//! ship one settings file instead of hard-coding parameter records. Every
//! field carries a default; a missing section or an empty file yields the
//! same values as [`Settings::default`].

use serde::Deserialize;
use std::path::Path;

use crate::error::{PlanError, Result};
use crate::planners::coverage::{CoverageParameters, EntryLocation, ScanPattern};
use crate::planners::grid_search::{GridSearchConfig, Heuristic};
use crate::planners::sampling::SamplingConfig;

/// Top-level mission settings.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    /// Vehicle and flight defaults.
    #[serde(default)]
    pub flight: FlightSettings,
    /// Survey (coverage) defaults.
    #[serde(default)]
    pub survey: SurveySettings,
    /// Point-to-point search defaults.
    #[serde(default)]
    pub search: SearchSettings,
}

/// Vehicle and flight defaults.
#[derive(Clone, Debug, Deserialize)]
pub struct FlightSettings {
    /// Cruise speed in m/s (default: 10.0)
    #[serde(default = "default_cruise_speed")]
    pub cruise_speed_mps: f64,

    /// Survey altitude above ground in meters (default: 50.0)
    #[serde(default = "default_altitude")]
    pub altitude_m: f64,

    /// Minimum turn radius in meters (default: 50.0)
    #[serde(default = "default_turn_radius")]
    pub turn_radius_m: f64,

    /// Fixed-wing airframe (default: false)
    #[serde(default)]
    pub fixed_wing: bool,
}

/// Survey (coverage) defaults.
#[derive(Clone, Debug, Deserialize)]
pub struct SurveySettings {
    /// Sweep line spacing in meters (default: 20.0)
    #[serde(default = "default_spacing")]
    pub spacing_m: f64,

    /// Scan angle in degrees CCW from east (default: 0.0)
    #[serde(default)]
    pub angle_deg: f64,

    /// Sweep pattern (default: grid)
    #[serde(default)]
    pub pattern: ScanPattern,

    /// Sweep entry corner (default: bottom_left)
    #[serde(default)]
    pub entry: EntryLocation,

    /// Smooth corners with turn arcs on fixed-wing airframes (default: false)
    #[serde(default)]
    pub smooth_turns: bool,

    /// Number of survey strips (default: 1)
    #[serde(default = "default_subdivisions")]
    pub subdivisions: usize,

    /// Gap between adjacent strips in meters (default: 3.0)
    #[serde(default = "default_region_spacing")]
    pub region_spacing_m: f64,
}

/// Point-to-point search defaults.
#[derive(Clone, Debug, Deserialize)]
pub struct SearchSettings {
    /// Grid-search lattice resolution in meters (default: 5.0)
    #[serde(default = "default_grid_step")]
    pub grid_step_m: f64,

    /// Grid-search heuristic (default: euclidean)
    #[serde(default)]
    pub heuristic: Heuristic,

    /// Grid-search heuristic weight; 0 is Dijkstra (default: 1.0)
    #[serde(default = "default_heuristic_weight")]
    pub heuristic_weight: f64,

    /// Sampling-planner growth step in meters (default: 10.0)
    #[serde(default = "default_rrt_step")]
    pub rrt_step_m: f64,

    /// Probability of sampling the goal directly (default: 0.1)
    #[serde(default = "default_goal_sample_rate")]
    pub goal_sample_rate: f64,

    /// Sampling budget per plan call (default: 1000)
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,

    /// RRT* neighbor radius in meters (default: 50.0)
    #[serde(default = "default_search_radius")]
    pub search_radius_m: f64,
}

impl Settings {
    /// Load settings from a TOML file, applying defaults for absent fields.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| PlanError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse settings from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate every loaded value against its planner's invariants.
    pub fn validate(&self) -> Result<()> {
        self.coverage_parameters().validate()?;
        self.grid_search_config().validate()?;
        self.sampling_config().validate()?;
        if !self.flight.cruise_speed_mps.is_finite() || self.flight.cruise_speed_mps <= 0.0 {
            return Err(PlanError::NonPositiveParameter {
                name: "cruise_speed_mps",
                value: self.flight.cruise_speed_mps,
            });
        }
        if !self.flight.altitude_m.is_finite() || self.flight.altitude_m <= 0.0 {
            return Err(PlanError::NonPositiveParameter {
                name: "altitude_m",
                value: self.flight.altitude_m,
            });
        }
        if !self.search.search_radius_m.is_finite() || self.search.search_radius_m <= 0.0 {
            return Err(PlanError::NonPositiveParameter {
                name: "search_radius_m",
                value: self.search.search_radius_m,
            });
        }
        Ok(())
    }

    /// Coverage parameters assembled from the survey and flight sections.
    pub fn coverage_parameters(&self) -> CoverageParameters {
        CoverageParameters {
            spacing: self.survey.spacing_m,
            angle_deg: self.survey.angle_deg,
            pattern: self.survey.pattern,
            is_fixed_wing: self.flight.fixed_wing,
            turn_radius: self.flight.turn_radius_m,
            smooth_turns: self.survey.smooth_turns,
            subdivisions: self.survey.subdivisions,
            region_spacing: self.survey.region_spacing_m,
            entry: self.survey.entry,
        }
    }

    /// Grid-search configuration from the search section.
    pub fn grid_search_config(&self) -> GridSearchConfig {
        GridSearchConfig {
            step_size: self.search.grid_step_m,
            heuristic: self.search.heuristic,
            heuristic_weight: self.search.heuristic_weight,
        }
    }

    /// Sampling-planner configuration from the search section.
    pub fn sampling_config(&self) -> SamplingConfig {
        SamplingConfig {
            step_size: self.search.rrt_step_m,
            goal_sample_rate: self.search.goal_sample_rate,
            max_iter: self.search.max_iter,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            flight: FlightSettings::default(),
            survey: SurveySettings::default(),
            search: SearchSettings::default(),
        }
    }
}

impl Default for FlightSettings {
    fn default() -> Self {
        Self {
            cruise_speed_mps: default_cruise_speed(),
            altitude_m: default_altitude(),
            turn_radius_m: default_turn_radius(),
            fixed_wing: false,
        }
    }
}

impl Default for SurveySettings {
    fn default() -> Self {
        Self {
            spacing_m: default_spacing(),
            angle_deg: 0.0,
            pattern: ScanPattern::default(),
            entry: EntryLocation::default(),
            smooth_turns: false,
            subdivisions: default_subdivisions(),
            region_spacing_m: default_region_spacing(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            grid_step_m: default_grid_step(),
            heuristic: Heuristic::default(),
            heuristic_weight: default_heuristic_weight(),
            rrt_step_m: default_rrt_step(),
            goal_sample_rate: default_goal_sample_rate(),
            max_iter: default_max_iter(),
            search_radius_m: default_search_radius(),
        }
    }
}

// Default value functions
fn default_cruise_speed() -> f64 {
    10.0
}
fn default_altitude() -> f64 {
    50.0
}
fn default_turn_radius() -> f64 {
    50.0
}
fn default_spacing() -> f64 {
    20.0
}
fn default_subdivisions() -> usize {
    1
}
fn default_region_spacing() -> f64 {
    3.0
}
fn default_grid_step() -> f64 {
    5.0
}
fn default_heuristic_weight() -> f64 {
    1.0
}
fn default_rrt_step() -> f64 {
    10.0
}
fn default_goal_sample_rate() -> f64 {
    0.1
}
fn default_max_iter() -> usize {
    1000
}
fn default_search_radius() -> f64 {
    50.0
}
