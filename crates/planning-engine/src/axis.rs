//! Lines between pairs of landmarks.

use std::collections::BTreeMap;

use plan_kernel::Line;
use plan_types::{LandmarkName, LineId};

use crate::store::LandmarkStore;
use crate::types::{Availability, DerivedLine, EngineError, Unavailable};

/// Directed line from `start` to `end`. The direction is never flipped.
pub fn build_line(
    store: &LandmarkStore,
    start: LandmarkName,
    end: LandmarkName,
    id: LineId,
) -> Result<DerivedLine, EngineError> {
    let geometry = Line::new(store.position(start)?, store.position(end)?);
    Ok(DerivedLine {
        id,
        geometry,
        depends_on: vec![start, end],
    })
}

/// Axes drawn for reference only; none of them gates the planning chain.
pub const REFERENCE_AXES: [(LineId, LandmarkName, LandmarkName); 3] = [
    (
        LineId::AnatomicalAxis,
        LandmarkName::FemurProximalCanal,
        LandmarkName::FemurDistalCanal,
    ),
    (
        LineId::TransEpicondylarAxis,
        LandmarkName::MedialEpicondyle,
        LandmarkName::LateralEpicondyle,
    ),
    (
        LineId::PosteriorCondylarAxis,
        LandmarkName::PosteriorMedialPt,
        LandmarkName::PosteriorLateralPt,
    ),
];

/// Build every reference axis whose landmarks are placed.
pub fn build_reference_axes(
    store: &LandmarkStore,
) -> (Vec<DerivedLine>, BTreeMap<LineId, Availability>) {
    let mut lines = Vec::new();
    let mut availability = BTreeMap::new();
    for (id, start, end) in REFERENCE_AXES {
        let missing = store.missing(&[start, end]);
        let status = if missing.is_empty() {
            match build_line(store, start, end, id) {
                Ok(line) => {
                    lines.push(line);
                    Availability::Available
                }
                Err(err) => Availability::NotAvailable { reason: err.into() },
            }
        } else {
            Availability::NotAvailable {
                reason: Unavailable::MissingLandmarks { names: missing },
            }
        };
        availability.insert(id, status);
    }
    (lines, availability)
}
