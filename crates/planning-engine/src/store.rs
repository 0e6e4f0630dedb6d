use plan_kernel::Point3d;
use plan_types::LandmarkName;
use serde::{Deserialize, Serialize};

use crate::types::{EngineError, Landmark};

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Upsert {
    Inserted,
    Updated { previous: Point3d },
}

/// Registry of placed landmarks, unique by name, in placement order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkStore {
    landmarks: Vec<Landmark>,
}

impl LandmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `name` at `position`, or move it there if already placed.
    ///
    /// Moving keeps the landmark's slot and `movable` flag.
    pub fn upsert(&mut self, name: LandmarkName, position: Point3d) -> Result<Upsert, EngineError> {
        if !position.is_finite() {
            return Err(EngineError::NonFinitePosition { name });
        }
        match self.landmarks.iter_mut().find(|l| l.name == name) {
            Some(existing) => {
                let previous = existing.position;
                existing.position = position;
                Ok(Upsert::Updated { previous })
            }
            None => {
                self.landmarks.push(Landmark {
                    name,
                    position,
                    movable: false,
                });
                Ok(Upsert::Inserted)
            }
        }
    }

    pub fn find(&self, name: LandmarkName) -> Option<&Landmark> {
        self.landmarks.iter().find(|l| l.name == name)
    }

    /// Position of `name`, or `MissingLandmark`.
    pub fn position(&self, name: LandmarkName) -> Result<Point3d, EngineError> {
        self.find(name)
            .map(|l| l.position)
            .ok_or(EngineError::MissingLandmark { name })
    }

    pub fn contains(&self, name: LandmarkName) -> bool {
        self.find(name).is_some()
    }

    pub fn remove(&mut self, name: LandmarkName) -> Option<Landmark> {
        let index = self.landmarks.iter().position(|l| l.name == name)?;
        Some(self.landmarks.remove(index))
    }

    pub fn set_movable(&mut self, name: LandmarkName, movable: bool) -> Result<(), EngineError> {
        let landmark = self
            .landmarks
            .iter_mut()
            .find(|l| l.name == name)
            .ok_or(EngineError::MissingLandmark { name })?;
        landmark.movable = movable;
        Ok(())
    }

    /// Every landmark, in placement order.
    pub fn all(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn names(&self) -> impl Iterator<Item = LandmarkName> + '_ {
        self.landmarks.iter().map(|l| l.name)
    }

    /// Names from `names` that have not been placed.
    pub fn missing(&self, names: &[LandmarkName]) -> Vec<LandmarkName> {
        names.iter().copied().filter(|n| !self.contains(*n)).collect()
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Immutable copy handed to the pipeline.
    pub fn snapshot(&self) -> LandmarkStore {
        self.clone()
    }
}

impl FromIterator<(LandmarkName, Point3d)> for LandmarkStore {
    /// Later entries overwrite earlier ones with the same name. Non-finite
    /// positions are skipped.
    fn from_iter<I: IntoIterator<Item = (LandmarkName, Point3d)>>(iter: I) -> Self {
        let mut store = LandmarkStore::new();
        for (name, position) in iter {
            let _ = store.upsert(name, position);
        }
        store
    }
}
