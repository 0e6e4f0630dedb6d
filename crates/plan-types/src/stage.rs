use serde::{Deserialize, Serialize};

use crate::landmark::LandmarkName;

/// One stage of the plane construction pipeline.
///
/// Stages run in [`StageKind::ORDER`]. Each stage names the landmarks it
/// reads directly and the single upstream stage whose output it consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StageKind {
    MechanicalAxis,
    CoronalPlane,
    ProjectedTea,
    AnteriorLine,
    VarusValgusPlane,
    FlexionAxis,
    FlexionExtensionPlane,
    DistalMedialPlane,
    DistalResectionPlane,
    DistanceAnnotations,
}

impl StageKind {
    pub const ORDER: [StageKind; 10] = [
        StageKind::MechanicalAxis,
        StageKind::CoronalPlane,
        StageKind::ProjectedTea,
        StageKind::AnteriorLine,
        StageKind::VarusValgusPlane,
        StageKind::FlexionAxis,
        StageKind::FlexionExtensionPlane,
        StageKind::DistalMedialPlane,
        StageKind::DistalResectionPlane,
        StageKind::DistanceAnnotations,
    ];

    /// Landmarks this stage reads itself (not those of upstream stages).
    pub fn required_landmarks(self) -> &'static [LandmarkName] {
        use LandmarkName::*;
        match self {
            StageKind::MechanicalAxis => &[FemurCenter, HipCenter],
            StageKind::CoronalPlane => &[MedialEpicondyle, LateralEpicondyle],
            StageKind::ProjectedTea => &[MedialEpicondyle, LateralEpicondyle],
            StageKind::AnteriorLine => &[FemurCenter],
            StageKind::VarusValgusPlane => &[],
            StageKind::FlexionAxis => &[],
            StageKind::FlexionExtensionPlane => &[],
            StageKind::DistalMedialPlane => &[DistalMedialPt],
            StageKind::DistalResectionPlane => &[],
            StageKind::DistanceAnnotations => &[DistalMedialPt],
        }
    }

    /// The stage whose output this stage consumes.
    pub fn upstream(self) -> Option<StageKind> {
        match self {
            StageKind::MechanicalAxis => None,
            StageKind::CoronalPlane => Some(StageKind::MechanicalAxis),
            StageKind::ProjectedTea => Some(StageKind::CoronalPlane),
            StageKind::AnteriorLine => Some(StageKind::ProjectedTea),
            StageKind::VarusValgusPlane => Some(StageKind::AnteriorLine),
            StageKind::FlexionAxis => Some(StageKind::VarusValgusPlane),
            StageKind::FlexionExtensionPlane => Some(StageKind::FlexionAxis),
            StageKind::DistalMedialPlane => Some(StageKind::FlexionExtensionPlane),
            StageKind::DistalResectionPlane => Some(StageKind::DistalMedialPlane),
            StageKind::DistanceAnnotations => Some(StageKind::DistalResectionPlane),
        }
    }

    /// Every landmark this stage depends on, directly or through its
    /// upstream chain, sorted and deduplicated.
    pub fn dependencies(self) -> Vec<LandmarkName> {
        let mut names = Vec::new();
        let mut current = Some(self);
        while let Some(stage) = current {
            names.extend_from_slice(stage.required_landmarks());
            current = stage.upstream();
        }
        names.sort();
        names.dedup();
        names
    }

    pub fn label(self) -> &'static str {
        match self {
            StageKind::MechanicalAxis => "mechanical axis",
            StageKind::CoronalPlane => "coronal plane",
            StageKind::ProjectedTea => "projected TEA",
            StageKind::AnteriorLine => "anterior line",
            StageKind::VarusValgusPlane => "varus/valgus plane",
            StageKind::FlexionAxis => "flexion axis",
            StageKind::FlexionExtensionPlane => "flexion/extension plane",
            StageKind::DistalMedialPlane => "distal medial plane",
            StageKind::DistalResectionPlane => "distal resection plane",
            StageKind::DistanceAnnotations => "distance annotations",
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
