use plan_types::LandmarkName;
use serde::{Deserialize, Serialize};

use crate::types::EngineError;

/// Increment used by the discrete rotate buttons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RotationStep {
    /// 1 degree per press.
    Fine,
    /// 10 degrees per press.
    Coarse,
    Custom { degrees: f64 },
}

impl RotationStep {
    pub fn degrees(self) -> f64 {
        match self {
            RotationStep::Fine => 1.0,
            RotationStep::Coarse => 10.0,
            RotationStep::Custom { degrees } => degrees,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RotationDirection {
    Positive,
    Negative,
}

impl RotationDirection {
    pub fn sign(self) -> f64 {
        match self {
            RotationDirection::Positive => 1.0,
            RotationDirection::Negative => -1.0,
        }
    }
}

/// How an interactive rotation updates a plane's orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RotationMode {
    /// Compose each delta onto the current orientation.
    #[default]
    Accumulate,
    /// Rebuild the orientation from the construction-time base and the
    /// running total angle.
    Reapply,
}

/// Landmark the coronal plane passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoronalAnchor {
    #[default]
    HipCenter,
    FemurCenter,
}

impl CoronalAnchor {
    pub fn landmark(self) -> LandmarkName {
        match self {
            CoronalAnchor::HipCenter => LandmarkName::HipCenter,
            CoronalAnchor::FemurCenter => LandmarkName::FemurCenter,
        }
    }
}

/// Tunable constants of the planning pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanningConfig {
    /// Angle the varus/valgus and flexion/extension planes start at,
    /// relative to the plane they are cloned from.
    pub seed_rotation_deg: f64,
    /// Distance between the distal medial and distal resection planes.
    pub distal_resection_offset: f64,
    /// Length of the constructed reference lines.
    pub axis_reference_length: f64,
    pub rotation_step: RotationStep,
    pub rotation_mode: RotationMode,
    pub coronal_anchor: CoronalAnchor,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self::coarse()
    }
}

impl PlanningConfig {
    /// 1 degree buttons.
    pub fn fine() -> Self {
        Self {
            rotation_step: RotationStep::Fine,
            ..Self::coarse()
        }
    }

    /// 10 degree buttons.
    pub fn coarse() -> Self {
        Self {
            seed_rotation_deg: 3.0,
            distal_resection_offset: 10.0,
            axis_reference_length: 500.0,
            rotation_step: RotationStep::Coarse,
            rotation_mode: RotationMode::Accumulate,
            coronal_anchor: CoronalAnchor::HipCenter,
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |reason: String| Err(EngineError::InvalidConfig { reason });

        if !self.seed_rotation_deg.is_finite() {
            return invalid(format!("seedRotationDeg must be finite, got {}", self.seed_rotation_deg));
        }
        if !self.distal_resection_offset.is_finite() || self.distal_resection_offset < 0.0 {
            return invalid(format!(
                "distalResectionOffset must be finite and non-negative, got {}",
                self.distal_resection_offset
            ));
        }
        if !self.axis_reference_length.is_finite() || self.axis_reference_length <= 0.0 {
            return invalid(format!(
                "axisReferenceLength must be finite and positive, got {}",
                self.axis_reference_length
            ));
        }
        let step = self.rotation_step.degrees();
        if !step.is_finite() || step <= 0.0 {
            return invalid(format!("rotation step must be finite and positive, got {step}"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_coarse() {
        let config = PlanningConfig::default();
        assert_eq!(config, PlanningConfig::coarse());
        assert_eq!(config.rotation_step.degrees(), 10.0);
        assert_eq!(config.seed_rotation_deg, 3.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fine_preset_only_changes_step() {
        let fine = PlanningConfig::fine();
        assert_eq!(fine.rotation_step.degrees(), 1.0);
        assert_eq!(fine.distal_resection_offset, 10.0);
        assert!(fine.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = PlanningConfig::default();
        config.axis_reference_length = 0.0;
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig { .. })));

        let mut config = PlanningConfig::default();
        config.distal_resection_offset = -1.0;
        assert!(config.validate().is_err());

        let mut config = PlanningConfig::default();
        config.seed_rotation_deg = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = PlanningConfig::default();
        config.rotation_step = RotationStep::Custom { degrees: 0.0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(RotationDirection::Positive.sign(), 1.0);
        assert_eq!(RotationDirection::Negative.sign(), -1.0);
    }

    #[test]
    fn test_anchor_landmark() {
        assert_eq!(CoronalAnchor::default().landmark(), LandmarkName::HipCenter);
        assert_eq!(CoronalAnchor::FemurCenter.landmark(), LandmarkName::FemurCenter);
    }
}
