use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Anatomical landmark a clinician can place on the femur model.
///
/// The set is fixed. Serialized names match the identifiers the UI uses
/// (`femurCenter`, `hipCenter`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LandmarkName {
    FemurCenter,
    HipCenter,
    FemurProximalCanal,
    FemurDistalCanal,
    MedialEpicondyle,
    LateralEpicondyle,
    DistalMedialPt,
    DistalLateralPt,
    PosteriorMedialPt,
    PosteriorLateralPt,
}

impl LandmarkName {
    /// Every landmark, in the order the UI lists them.
    pub const ALL: [LandmarkName; 10] = [
        LandmarkName::FemurCenter,
        LandmarkName::HipCenter,
        LandmarkName::FemurProximalCanal,
        LandmarkName::FemurDistalCanal,
        LandmarkName::MedialEpicondyle,
        LandmarkName::LateralEpicondyle,
        LandmarkName::DistalMedialPt,
        LandmarkName::DistalLateralPt,
        LandmarkName::PosteriorMedialPt,
        LandmarkName::PosteriorLateralPt,
    ];

    /// Wire identifier, e.g. `distalMedialPt`.
    pub fn key(self) -> &'static str {
        match self {
            LandmarkName::FemurCenter => "femurCenter",
            LandmarkName::HipCenter => "hipCenter",
            LandmarkName::FemurProximalCanal => "femurProximalCanal",
            LandmarkName::FemurDistalCanal => "femurDistalCanal",
            LandmarkName::MedialEpicondyle => "medialEpicondyle",
            LandmarkName::LateralEpicondyle => "lateralEpicondyle",
            LandmarkName::DistalMedialPt => "distalMedialPt",
            LandmarkName::DistalLateralPt => "distalLateralPt",
            LandmarkName::PosteriorMedialPt => "posteriorMedialPt",
            LandmarkName::PosteriorLateralPt => "posteriorLateralPt",
        }
    }

    /// Human-readable label shown next to the landmark selector.
    pub fn label(self) -> &'static str {
        match self {
            LandmarkName::FemurCenter => "Femur Center",
            LandmarkName::HipCenter => "Hip Center",
            LandmarkName::FemurProximalCanal => "Femur Proximal Canal",
            LandmarkName::FemurDistalCanal => "Femur Distal Canal",
            LandmarkName::MedialEpicondyle => "Medial Epicondyle",
            LandmarkName::LateralEpicondyle => "Lateral Epicondyle",
            LandmarkName::DistalMedialPt => "Distal Medial Pt",
            LandmarkName::DistalLateralPt => "Distal Lateral Pt",
            LandmarkName::PosteriorMedialPt => "Posterior Medial Pt",
            LandmarkName::PosteriorLateralPt => "Posterior Lateral Pt",
        }
    }
}

impl fmt::Display for LandmarkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when a string does not name one of the ten landmarks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLandmark(pub String);

impl fmt::Display for UnknownLandmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown landmark: {}", self.0)
    }
}

impl std::error::Error for UnknownLandmark {}

impl FromStr for LandmarkName {
    type Err = UnknownLandmark;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LandmarkName::ALL
            .iter()
            .copied()
            .find(|name| name.key() == s)
            .ok_or_else(|| UnknownLandmark(s.to_string()))
    }
}
