//! Plain-data configuration passed in by the editor: snapping and district validation.
//!
//! Both structs deserialize from partial JSON; missing fields take their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::SnapKind;

/// Snap radius in world units used when the editor does not override it.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 15.0;

/// Grid cell edge length for the segment index. Same order as the snap radius
/// so a query touches a handful of cells.
pub const DEFAULT_CELL_SIZE: f64 = 50.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{field}` must be finite and non-negative, got {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("`{field}` must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnapConfig {
    pub threshold: f64,
    pub vertex: bool,
    pub midpoint: bool,
    pub nearest: bool,
    pub intersection: bool,
    /// Only segments of these geometry types are considered when set.
    pub geometry_types: Option<Vec<String>>,
}

impl Default for SnapConfig {
    fn default() -> Self {
        SnapConfig {
            threshold: DEFAULT_SNAP_THRESHOLD,
            vertex: true,
            midpoint: true,
            nearest: true,
            intersection: true,
            geometry_types: None,
        }
    }
}

impl SnapConfig {
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let cfg: SnapConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ConfigError::OutOfRange { field: "threshold", value: self.threshold });
        }
        Ok(())
    }

    /// Config with only the given kinds enabled.
    pub fn only(kinds: &[SnapKind]) -> Self {
        let mut cfg = SnapConfig {
            vertex: false,
            midpoint: false,
            nearest: false,
            intersection: false,
            ..SnapConfig::default()
        };
        for k in kinds {
            cfg.set_enabled(*k, true);
        }
        cfg
    }

    pub fn is_enabled(&self, kind: SnapKind) -> bool {
        match kind {
            SnapKind::Vertex => self.vertex,
            SnapKind::Midpoint => self.midpoint,
            SnapKind::Nearest => self.nearest,
            SnapKind::Intersection => self.intersection,
        }
    }

    pub fn set_enabled(&mut self, kind: SnapKind, on: bool) {
        match kind {
            SnapKind::Vertex => self.vertex = on,
            SnapKind::Midpoint => self.midpoint = on,
            SnapKind::Nearest => self.nearest = on,
            SnapKind::Intersection => self.intersection = on,
        }
    }

    pub fn allows_type(&self, geometry_type: &str) -> bool {
        match &self.geometry_types {
            Some(types) => types.iter().any(|t| t == geometry_type),
            None => true,
        }
    }
}

/// Minimum-size rule applied to districts after water clipping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationRules {
    /// Both bounding-box sides must reach this many metres.
    pub min_dimension_meters: f64,
    /// World units per metre.
    pub units_per_meter: f64,
    /// Shape types allowed to be arbitrarily thin or small.
    pub exempt_types: Vec<String>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        ValidationRules { min_dimension_meters: 0.0, units_per_meter: 1.0, exempt_types: Vec::new() }
    }
}

impl ValidationRules {
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let rules: ValidationRules = serde_json::from_str(s)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_dimension_meters.is_finite() || self.min_dimension_meters < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "minDimensionMeters",
                value: self.min_dimension_meters,
            });
        }
        if !self.units_per_meter.is_finite() || self.units_per_meter <= 0.0 {
            return Err(ConfigError::NotPositive { field: "unitsPerMeter", value: self.units_per_meter });
        }
        Ok(())
    }

    /// Minimum dimension converted to world units.
    pub fn min_dimension_units(&self) -> f64 {
        self.min_dimension_meters * self.units_per_meter
    }

    pub fn is_exempt(&self, shape_type: &str) -> bool {
        self.exempt_types.iter().any(|t| t == shape_type)
    }
}
