//! Thread-safe handle for a producer (frame processing) and consumers
//! (navigation) running at different cadences.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use fiducials_core::{BoundingBox, Location};

use crate::{
    process_frame, AggregatorParams, AggregatorSnapshot, Frame, FrameSummary, IngestOutcome,
    LocateError, LocationAggregator, MarkerSighting,
};

/// Cloneable handle to one [`LocationAggregator`] behind a read/write lock.
///
/// Every call holds the lock for its whole duration, so the id map and the
/// bounding box are always observed together. Reads return owned copies.
#[derive(Clone, Debug, Default)]
pub struct SharedAggregator {
    inner: Arc<RwLock<LocationAggregator>>,
}

impl SharedAggregator {
    pub fn new(params: AggregatorParams) -> Self {
        Self::from(LocationAggregator::with_params(params))
    }

    // Mutations validate before touching state; a poisoned lock still guards
    // a consistent aggregator.
    fn read(&self) -> RwLockReadGuard<'_, LocationAggregator> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LocationAggregator> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ingest(&self, location: Location) -> Result<IngestOutcome, LocateError> {
        self.write().ingest(location)
    }

    pub fn ingest_sighting(&self, sighting: MarkerSighting) -> Result<IngestOutcome, LocateError> {
        self.write().ingest_sighting(sighting)
    }

    /// Ingest a whole frame under a single lock scope.
    pub fn process_frame(&self, frame: &Frame) -> FrameSummary {
        process_frame(&mut self.write(), frame)
    }

    pub fn best_for(&self, id: u32) -> Result<Location, LocateError> {
        self.read().best_for(id).copied()
    }

    /// Ranked copy of the retained observations, best first.
    pub fn ranked(&self) -> Vec<Location> {
        self.read().ranked().copied().collect()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        *self.read().bounding_box()
    }

    /// Ranked observations and bounding box taken under one lock.
    pub fn snapshot(&self) -> AggregatorSnapshot {
        self.read().snapshot()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    /// Run `f` with shared access, e.g. for spatial queries.
    pub fn with_read<R>(&self, f: impl FnOnce(&LocationAggregator) -> R) -> R {
        f(&self.read())
    }
}

impl From<LocationAggregator> for SharedAggregator {
    fn from(aggregator: LocationAggregator) -> Self {
        Self {
            inner: Arc::new(RwLock::new(aggregator)),
        }
    }
}
