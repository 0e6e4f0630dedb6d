//! Staged construction of the planning artifacts.

use plan_types::StageKind;
use tracing::{debug, info, instrument, warn};

use crate::axis::build_reference_axes;
use crate::config::PlanningConfig;
use crate::stages;
use crate::store::LandmarkStore;
use crate::types::{Availability, EngineError, PlanningRun, StageReport, Unavailable};

/// Runs stages in order, gating each on its landmarks and its upstream
/// stage, and records one report per stage.
struct StageRunner<'a> {
    store: &'a LandmarkStore,
    reports: Vec<StageReport>,
}

impl<'a> StageRunner<'a> {
    fn new(store: &'a LandmarkStore) -> Self {
        Self {
            store,
            reports: Vec::with_capacity(StageKind::ORDER.len()),
        }
    }

    fn is_available(&self, stage: StageKind) -> bool {
        self.reports
            .iter()
            .any(|r| r.stage == stage && r.availability.is_available())
    }

    /// Why `stage` cannot run yet, if anything.
    fn gate(&self, stage: StageKind) -> Option<Unavailable> {
        let missing = self.store.missing(&stage.dependencies());
        if !missing.is_empty() {
            return Some(Unavailable::MissingLandmarks { names: missing });
        }
        match stage.upstream() {
            Some(upstream) if !self.is_available(upstream) => {
                Some(Unavailable::UpstreamUnavailable { stage: upstream })
            }
            _ => None,
        }
    }

    fn run<T>(
        &mut self,
        stage: StageKind,
        build: impl FnOnce() -> Result<T, EngineError>,
    ) -> Option<T> {
        let (availability, output) = match self.gate(stage) {
            Some(reason) => {
                debug!(%stage, ?reason, "stage skipped");
                (Availability::NotAvailable { reason }, None)
            }
            None => match build() {
                Ok(output) => {
                    debug!(%stage, "stage built");
                    (Availability::Available, Some(output))
                }
                Err(err) => {
                    warn!(%stage, error = %err, "stage failed");
                    (Availability::NotAvailable { reason: err.into() }, None)
                }
            },
        };
        self.reports.push(StageReport { stage, availability });
        output
    }
}

fn upstream<T>(artifact: &Option<T>, stage: StageKind) -> Result<&T, EngineError> {
    artifact
        .as_ref()
        .ok_or(EngineError::UpstreamUnavailable { stage })
}

/// Build every artifact the placed landmarks allow.
///
/// Never fails as a whole: each stage that cannot be built is reported
/// `NotAvailable` and every stage after it is skipped.
#[instrument(skip_all, fields(landmarks = store.len()))]
pub fn run_planning_pipeline(store: &LandmarkStore, config: &PlanningConfig) -> PlanningRun {
    use StageKind::*;

    let mut run = PlanningRun::new();

    let (reference_lines, reference_axes) = build_reference_axes(store);
    for line in reference_lines {
        run.lines.insert(line.id, line);
    }
    run.reference_axes = reference_axes;

    let mut runner = StageRunner::new(store);

    let mech = runner.run(MechanicalAxis, || stages::mechanical_axis(store));
    let coronal = runner.run(CoronalPlane, || {
        stages::coronal_plane(store, config, upstream(&mech, MechanicalAxis)?)
    });
    let projected_tea = runner.run(ProjectedTea, || {
        stages::projected_tea(store, upstream(&coronal, CoronalPlane)?)
    });
    let anterior = runner.run(AnteriorLine, || {
        stages::anterior_line(
            store,
            config,
            upstream(&mech, MechanicalAxis)?,
            upstream(&projected_tea, ProjectedTea)?,
        )
    });
    let varus_valgus = runner.run(VarusValgusPlane, || {
        upstream(&anterior, AnteriorLine)?;
        stages::varus_valgus_plane(
            config,
            upstream(&coronal, CoronalPlane)?,
            upstream(&mech, MechanicalAxis)?,
        )
    });
    let flexion = runner.run(FlexionAxis, || {
        stages::flexion_axis(
            config,
            upstream(&anterior, AnteriorLine)?,
            upstream(&varus_valgus, VarusValgusPlane)?,
        )
    });
    let flexion_extension = runner.run(FlexionExtensionPlane, || {
        stages::flexion_extension_plane(
            config,
            upstream(&varus_valgus, VarusValgusPlane)?,
            &upstream(&flexion, FlexionAxis)?.axis,
        )
    });
    let distal_medial = runner.run(DistalMedialPlane, || {
        stages::distal_medial_plane(store, upstream(&flexion_extension, FlexionExtensionPlane)?)
    });
    let resection = runner.run(DistalResectionPlane, || {
        stages::distal_resection_plane(
            config,
            upstream(&distal_medial, DistalMedialPlane)?,
            upstream(&flexion_extension, FlexionExtensionPlane)?,
        )
    });
    let annotations = runner.run(DistanceAnnotations, || {
        stages::distance_annotations(store, upstream(&resection, DistalResectionPlane)?)
    });

    for line in [mech, projected_tea, anterior].into_iter().flatten() {
        run.lines.insert(line.id, line);
    }
    if let Some(flexion) = flexion {
        run.lines
            .insert(flexion.projected_anterior.id, flexion.projected_anterior);
        run.lines.insert(flexion.axis.id, flexion.axis);
    }
    for plane in [coronal, varus_valgus, flexion_extension, distal_medial, resection]
        .into_iter()
        .flatten()
    {
        run.planes.insert(plane.id, plane);
    }
    run.annotations = annotations.unwrap_or_default();
    run.stages = runner.reports;

    info!(
        run_id = %run.run_id,
        stages_available = run.available_stage_count(),
        lines = run.lines.len(),
        planes = run.planes.len(),
        annotations = run.annotations.len(),
        "planning run complete"
    );
    run
}
