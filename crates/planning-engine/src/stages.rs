//! One function per construction stage.
//!
//! Each stage takes the artifacts of the stages before it and copies
//! whatever landmark positions it needs out of the store. Landmark and
//! upstream gating happens in the pipeline; these functions still return
//! `MissingLandmark` rather than panic when called directly.

use plan_kernel::{Line, Plane};
use plan_types::{LandmarkName, LineId, PlaneId};

use crate::axis::build_line;
use crate::config::PlanningConfig;
use crate::measure;
use crate::store::LandmarkStore;
use crate::types::{DerivedLine, DerivedPlane, DistanceAnnotation, EngineError};

/// Landmarks annotated against the distal resection plane.
pub const ANNOTATED_LANDMARKS: [LandmarkName; 2] =
    [LandmarkName::DistalMedialPt, LandmarkName::DistalLateralPt];

fn merged(groups: &[&[LandmarkName]]) -> Vec<LandmarkName> {
    let mut names: Vec<_> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    names.sort();
    names.dedup();
    names
}

/// femurCenter → hipCenter.
pub fn mechanical_axis(store: &LandmarkStore) -> Result<DerivedLine, EngineError> {
    let line = build_line(
        store,
        LandmarkName::FemurCenter,
        LandmarkName::HipCenter,
        LineId::MechanicalAxis,
    )?;
    line.direction()?;
    Ok(line)
}

/// Plane containing the mechanical axis and parallel to the
/// trans-epicondylar axis.
pub fn coronal_plane(
    store: &LandmarkStore,
    config: &PlanningConfig,
    mech: &DerivedLine,
) -> Result<DerivedPlane, EngineError> {
    let tea = build_line(
        store,
        LandmarkName::MedialEpicondyle,
        LandmarkName::LateralEpicondyle,
        LineId::TransEpicondylarAxis,
    )?;
    let normal = tea
        .direction()?
        .cross(&mech.direction()?)
        .normalize_as("coronal normal")?;
    let anchor = store.position(config.coronal_anchor.landmark())?;
    let plane = Plane::from_point_normal(anchor, normal)?;
    Ok(DerivedPlane::new(
        PlaneId::Coronal,
        plane,
        merged(&[&mech.depends_on, &tea.depends_on]),
    ))
}

/// Trans-epicondylar axis projected onto the coronal plane.
pub fn projected_tea(
    store: &LandmarkStore,
    coronal: &DerivedPlane,
) -> Result<DerivedLine, EngineError> {
    let tea = build_line(
        store,
        LandmarkName::MedialEpicondyle,
        LandmarkName::LateralEpicondyle,
        LineId::TransEpicondylarAxis,
    )?;
    let geometry = tea.geometry.project_onto_plane(&coronal.geometry);
    geometry.direction()?;
    Ok(DerivedLine {
        id: LineId::ProjectedTea,
        geometry,
        depends_on: coronal.depends_on.clone(),
    })
}

/// Line through femurCenter perpendicular to both the projected TEA and
/// the mechanical axis.
pub fn anterior_line(
    store: &LandmarkStore,
    config: &PlanningConfig,
    mech: &DerivedLine,
    projected_tea: &DerivedLine,
) -> Result<DerivedLine, EngineError> {
    let center = store.position(LandmarkName::FemurCenter)?;
    let direction = projected_tea.direction()?.cross(&mech.direction()?);
    let geometry = Line::centered(center, direction, config.axis_reference_length)?;
    Ok(DerivedLine {
        id: LineId::AnteriorLine,
        geometry,
        depends_on: merged(&[&mech.depends_on, &projected_tea.depends_on]),
    })
}

/// Coronal plane rotated by the seed angle about the mechanical axis.
pub fn varus_valgus_plane(
    config: &PlanningConfig,
    coronal: &DerivedPlane,
    mech: &DerivedLine,
) -> Result<DerivedPlane, EngineError> {
    let axis = mech.direction()?;
    let plane = coronal.geometry.rotated_about(axis, config.seed_rotation_deg)?;
    Ok(
        DerivedPlane::new(PlaneId::VarusValgus, plane, coronal.depends_on.clone())
            .with_rotation(axis, config.seed_rotation_deg),
    )
}

/// Output of the flexion axis stage.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexionAxis {
    /// Anterior line projected onto the varus/valgus plane.
    pub projected_anterior: DerivedLine,
    pub axis: DerivedLine,
}

/// In-plane perpendicular to the anterior line projected onto the
/// varus/valgus plane, centered on the projection.
pub fn flexion_axis(
    config: &PlanningConfig,
    anterior: &DerivedLine,
    varus_valgus: &DerivedPlane,
) -> Result<FlexionAxis, EngineError> {
    let depends_on = merged(&[&anterior.depends_on, &varus_valgus.depends_on]);
    let projected = anterior.geometry.project_onto_plane(&varus_valgus.geometry);
    let projected_dir = projected
        .vector()
        .normalize_as("anterior line projected onto varus/valgus plane")?;
    let direction = projected_dir.cross(&varus_valgus.normal());
    let geometry = Line::centered(projected.midpoint(), direction, config.axis_reference_length)?;
    Ok(FlexionAxis {
        projected_anterior: DerivedLine {
            id: LineId::ProjectedAnteriorLine,
            geometry: projected,
            depends_on: depends_on.clone(),
        },
        axis: DerivedLine {
            id: LineId::FlexionAxis,
            geometry,
            depends_on,
        },
    })
}

/// Varus/valgus plane rotated by the seed angle about the flexion axis.
pub fn flexion_extension_plane(
    config: &PlanningConfig,
    varus_valgus: &DerivedPlane,
    flexion_axis: &DerivedLine,
) -> Result<DerivedPlane, EngineError> {
    let axis = flexion_axis.direction()?;
    let plane = varus_valgus
        .geometry
        .rotated_about(axis, config.seed_rotation_deg)?;
    Ok(DerivedPlane::new(
        PlaneId::FlexionExtension,
        plane,
        merged(&[&varus_valgus.depends_on, &flexion_axis.depends_on]),
    )
    .with_rotation(axis, config.seed_rotation_deg))
}

/// Flexion/extension orientation through distalMedialPt.
pub fn distal_medial_plane(
    store: &LandmarkStore,
    flexion_extension: &DerivedPlane,
) -> Result<DerivedPlane, EngineError> {
    let point = store.position(LandmarkName::DistalMedialPt)?;
    Ok(DerivedPlane::new(
        PlaneId::DistalMedial,
        flexion_extension.geometry.parallel_through(point),
        merged(&[&flexion_extension.depends_on, &[LandmarkName::DistalMedialPt]]),
    ))
}

/// Distal medial plane moved by the resection offset along its own normal.
///
/// The normal keeps the sense it was constructed with, `dir(TEA) × dir(mech)`
/// carried through both seed rotations, so the offset side varies
/// continuously with the landmarks. That normal is perpendicular to the
/// mechanical axis, so the offset has no proximal component.
pub fn distal_resection_plane(
    config: &PlanningConfig,
    distal_medial: &DerivedPlane,
    flexion_extension: &DerivedPlane,
) -> Result<DerivedPlane, EngineError> {
    let plane = distal_medial
        .geometry
        .offset_along_normal(config.distal_resection_offset);
    let mut resection = DerivedPlane::new(
        PlaneId::DistalResection,
        plane,
        distal_medial.depends_on.clone(),
    );
    if let Some(axis) = flexion_extension.rotation_axis {
        resection = resection.with_rotation(axis, 0.0);
    }
    Ok(resection)
}

/// Distances from the distal points that are placed to the resection plane.
pub fn distance_annotations(
    store: &LandmarkStore,
    resection: &DerivedPlane,
) -> Result<Vec<DistanceAnnotation>, EngineError> {
    // distalMedialPt is mandatory, distalLateralPt optional
    store.position(LandmarkName::DistalMedialPt)?;
    Ok(ANNOTATED_LANDMARKS
        .iter()
        .filter_map(|name| store.find(*name))
        .map(|l| measure::annotate(l.name, l.position, resection.id, &resection.geometry))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use plan_kernel::{Point3d, Vec3};

    fn store() -> LandmarkStore {
        [
            (LandmarkName::FemurCenter, Point3d::new(0.0, 0.0, 0.0)),
            (LandmarkName::HipCenter, Point3d::new(0.0, 100.0, 0.0)),
            (LandmarkName::MedialEpicondyle, Point3d::new(-40.0, 0.0, 5.0)),
            (LandmarkName::LateralEpicondyle, Point3d::new(40.0, 2.0, -5.0)),
            (LandmarkName::DistalMedialPt, Point3d::new(-20.0, -10.0, 0.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_mechanical_axis_points_to_hip() {
        let mech = mechanical_axis(&store()).unwrap();
        let d = mech.direction().unwrap();
        assert_relative_eq!(d.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mechanical_axis_rejects_coincident_landmarks() {
        let s: LandmarkStore = [
            (LandmarkName::FemurCenter, Point3d::new(1.0, 1.0, 1.0)),
            (LandmarkName::HipCenter, Point3d::new(1.0, 1.0, 1.0)),
        ]
        .into_iter()
        .collect();
        assert!(matches!(
            mechanical_axis(&s),
            Err(EngineError::DegenerateVector(_))
        ));
    }

    #[test]
    fn test_coronal_contains_mechanical_axis() {
        let s = store();
        let config = PlanningConfig::default();
        let mech = mechanical_axis(&s).unwrap();
        let coronal = coronal_plane(&s, &config, &mech).unwrap();
        assert_relative_eq!(coronal.normal().dot(&mech.direction().unwrap()), 0.0, epsilon = 1e-9);
        assert_relative_eq!(coronal.geometry.signed_distance(mech.geometry.start), 0.0, epsilon = 1e-9);
        assert!(coronal.rotation_axis.is_none());
    }

    #[test]
    fn test_projected_tea_lies_in_coronal_plane() {
        let s = store();
        let config = PlanningConfig::default();
        let mech = mechanical_axis(&s).unwrap();
        let coronal = coronal_plane(&s, &config, &mech).unwrap();
        let tea = projected_tea(&s, &coronal).unwrap();
        assert_relative_eq!(coronal.geometry.signed_distance(tea.geometry.start), 0.0, epsilon = 1e-9);
        assert_relative_eq!(coronal.geometry.signed_distance(tea.geometry.end), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_anterior_line_is_perpendicular_and_centered() {
        let s = store();
        let config = PlanningConfig::default();
        let mech = mechanical_axis(&s).unwrap();
        let coronal = coronal_plane(&s, &config, &mech).unwrap();
        let tea = projected_tea(&s, &coronal).unwrap();
        let anterior = anterior_line(&s, &config, &mech, &tea).unwrap();
        let d = anterior.direction().unwrap();
        assert_relative_eq!(d.dot(&mech.direction().unwrap()), 0.0, epsilon = 1e-9);
        assert_relative_eq!(d.dot(&tea.direction().unwrap()), 0.0, epsilon = 1e-9);
        assert_relative_eq!(anterior.geometry.length(), 500.0, epsilon = 1e-9);
        assert_relative_eq!(anterior.geometry.midpoint().distance_to(&Point3d::ORIGIN), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_varus_valgus_keeps_mechanical_axis_in_plane() {
        let s = store();
        let config = PlanningConfig::default();
        let mech = mechanical_axis(&s).unwrap();
        let coronal = coronal_plane(&s, &config, &mech).unwrap();
        let vv = varus_valgus_plane(&config, &coronal, &mech).unwrap();
        assert_relative_eq!(vv.normal().dot(&mech.direction().unwrap()), 0.0, epsilon = 1e-9);
        assert_relative_eq!(coronal.geometry.angle_between_normals_deg(&vv.geometry), 3.0, epsilon = 1e-6);
        assert_eq!(vv.rotation_axis, Some(mech.direction().unwrap()));
        assert_eq!(vv.cumulative_angle_deg, 3.0);
    }

    #[test]
    fn test_distal_resection_follows_constructed_normal() {
        let s = store();
        let config = PlanningConfig::default();
        let fe = DerivedPlane::new(
            PlaneId::FlexionExtension,
            Plane::from_point_normal(Point3d::ORIGIN, -Vec3::Y).unwrap(),
            vec![],
        )
        .with_rotation(Vec3::X, 3.0);
        let dm = distal_medial_plane(&s, &fe).unwrap();
        let resection = distal_resection_plane(&config, &dm, &fe).unwrap();
        assert_relative_eq!(resection.geometry.point.y, -20.0, epsilon = 1e-9);
        assert_relative_eq!(dm.geometry.signed_distance(resection.geometry.point), 10.0, epsilon = 1e-9);
        assert_eq!(resection.rotation_axis, Some(Vec3::X));
        assert_eq!(resection.cumulative_angle_deg, 0.0);
    }

    #[test]
    fn test_annotations_skip_unplaced_lateral_point() {
        let s = store();
        let resection = DerivedPlane::new(
            PlaneId::DistalResection,
            Plane::from_point_normal(Point3d::new(0.0, 0.0, 0.0), Vec3::Y).unwrap(),
            vec![],
        );
        let annotations = distance_annotations(&s, &resection).unwrap();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].landmark, LandmarkName::DistalMedialPt);
        assert_relative_eq!(annotations[0].distance, 10.0, epsilon = 1e-9);
    }
}
