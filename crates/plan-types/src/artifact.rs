use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identity of a derived line.
///
/// Identities are stable across pipeline runs, so the render adapter can
/// replace the previous run's line of the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineId {
    MechanicalAxis,
    AnatomicalAxis,
    TransEpicondylarAxis,
    PosteriorCondylarAxis,
    ProjectedTea,
    AnteriorLine,
    ProjectedAnteriorLine,
    FlexionAxis,
}

impl LineId {
    pub fn label(self) -> &'static str {
        match self {
            LineId::MechanicalAxis => "Mechanical Axis",
            LineId::AnatomicalAxis => "Anatomical Axis",
            LineId::TransEpicondylarAxis => "TEA-Trans epicondyle Axis",
            LineId::PosteriorCondylarAxis => "PCA- Posterior Condyle Axis",
            LineId::ProjectedTea => "Projected TEA Axis",
            LineId::AnteriorLine => "Anterior Line",
            LineId::ProjectedAnteriorLine => "Projected Anterior Line",
            LineId::FlexionAxis => "Flexion Axis",
        }
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity of a derived plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaneId {
    Coronal,
    VarusValgus,
    FlexionExtension,
    DistalMedial,
    DistalResection,
}

impl PlaneId {
    pub const ALL: [PlaneId; 5] = [
        PlaneId::Coronal,
        PlaneId::VarusValgus,
        PlaneId::FlexionExtension,
        PlaneId::DistalMedial,
        PlaneId::DistalResection,
    ];

    /// Wire identifier, e.g. `varusValgus`.
    pub fn key(self) -> &'static str {
        match self {
            PlaneId::Coronal => "coronal",
            PlaneId::VarusValgus => "varusValgus",
            PlaneId::FlexionExtension => "flexionExtension",
            PlaneId::DistalMedial => "distalMedial",
            PlaneId::DistalResection => "distalResection",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlaneId::Coronal => "Coronal Plane",
            PlaneId::VarusValgus => "Varus/Valgus Plane",
            PlaneId::FlexionExtension => "Flexion/Extension Plane",
            PlaneId::DistalMedial => "Distal Medial Plane",
            PlaneId::DistalResection => "Distal Resection Plane",
        }
    }
}

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string does not name a plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlane(pub String);

impl fmt::Display for UnknownPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown plane: {}", self.0)
    }
}

impl std::error::Error for UnknownPlane {}

impl FromStr for PlaneId {
    type Err = UnknownPlane;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlaneId::ALL
            .iter()
            .copied()
            .find(|id| id.key() == s)
            .ok_or_else(|| UnknownPlane(s.to_string()))
    }
}
