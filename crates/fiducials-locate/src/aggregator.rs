//! Best-observation-per-marker store.

use std::cmp::Ordering;
use std::collections::HashMap;

use fiducials_core::{BoundingBox, Location};
use serde::Serialize;

use crate::frame::MarkerSighting;
use crate::{AggregatorParams, LocateError};

/// Result of offering one observation to the aggregator.
///
/// Values that leave the aggregator are handed back to the caller: the
/// superseded observation on replacement, the offered one on rejection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IngestOutcome {
    /// First observation retained for this marker id.
    Inserted,
    /// The new observation won; carries the one it replaced.
    Replaced(Location),
    /// The new observation lost (or failed `max_goodness`); carries it back.
    Rejected(Location),
}

impl IngestOutcome {
    /// `true` if the offered observation is now retained.
    #[inline]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, IngestOutcome::Rejected(_))
    }
}

/// Keeps the best [`Location`] per marker id and the bounding box of every
/// accepted observation.
///
/// The bounding box only grows: a replaced observation's position stays
/// inside it, a rejected observation's position is never added. It is
/// emptied only by [`LocationAggregator::clear`].
#[derive(Clone, Debug, Default)]
pub struct LocationAggregator {
    params: AggregatorParams,
    locations: HashMap<u32, Location>,
    bounding_box: BoundingBox,
    next_index: u64,
}

impl LocationAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: AggregatorParams) -> Self {
        Self {
            params: params.sanitized(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn params(&self) -> &AggregatorParams {
        &self.params
    }

    /// Offer an observation.
    ///
    /// Malformed observations fail with [`LocateError::Location`] and leave
    /// the aggregator untouched. `u64::MAX` is reserved so indices are never
    /// reused; an observation carrying it fails with
    /// [`LocateError::IndexExhausted`]. Otherwise the observation is inserted,
    /// replaces the retained one for its id, or is rejected; see
    /// [`Location::is_better_than`] for the ordering.
    pub fn ingest(&mut self, location: Location) -> Result<IngestOutcome, LocateError> {
        location.validate()?;
        let following = location
            .index
            .checked_add(1)
            .ok_or(LocateError::IndexExhausted)?;
        self.next_index = self.next_index.max(following);

        if !self.params.accepts(location.goodness) {
            log::debug!(
                "marker {}: goodness {} above threshold, rejected",
                location.id,
                location.goodness
            );
            return Ok(IngestOutcome::Rejected(location));
        }

        let retained = self.locations.get(&location.id).copied();
        if let Some(current) = retained {
            if !location.is_better_than(&current, self.params.goodness_epsilon) {
                log::trace!(
                    "marker {}: goodness {} does not beat {}, rejected",
                    location.id,
                    location.goodness,
                    current.goodness
                );
                return Ok(IngestOutcome::Rejected(location));
            }
        }

        location.bounding_box_update(&mut self.bounding_box)?;
        self.locations.insert(location.id, location);

        Ok(match retained {
            None => IngestOutcome::Inserted,
            Some(previous) => IngestOutcome::Replaced(previous),
        })
    }

    /// Validate a raw sighting, stamp it with the next index and ingest it.
    ///
    /// The index counter only advances for valid sightings.
    pub fn ingest_sighting(
        &mut self,
        sighting: MarkerSighting,
    ) -> Result<IngestOutcome, LocateError> {
        let location = sighting.into_location(self.next_index)?;
        self.ingest(location)
    }

    /// Retained observation for marker `id`.
    pub fn best_for(&self, id: u32) -> Result<&Location, LocateError> {
        self.locations.get(&id).ok_or(LocateError::NotFound { id })
    }

    #[inline]
    pub fn get(&self, id: u32) -> Option<&Location> {
        self.locations.get(&id)
    }

    #[inline]
    pub fn contains(&self, id: u32) -> bool {
        self.locations.contains_key(&id)
    }

    /// Retained observations, best first: ascending goodness, then
    /// descending index.
    ///
    /// Every call starts a fresh traversal.
    pub fn ranked(&self) -> Ranked<'_> {
        let mut entries: Vec<&Location> = self.locations.values().collect();
        entries.sort_by(|a, b| rank_order(a, b));
        Ranked {
            inner: entries.into_iter(),
        }
    }

    /// Alias of [`LocationAggregator::ranked`].
    #[inline]
    pub fn all(&self) -> Ranked<'_> {
        self.ranked()
    }

    /// Marker ids with a retained observation, in ascending order.
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.locations.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    #[inline]
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Index that the next [`LocationAggregator::ingest_sighting`] assigns.
    #[inline]
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Drop every observation, empty the bounding box and restart indexing.
    pub fn clear(&mut self) {
        self.locations.clear();
        self.bounding_box.reset();
        self.next_index = 0;
    }

    /// Owned copy of the ranked observations and the bounding box.
    pub fn snapshot(&self) -> AggregatorSnapshot {
        AggregatorSnapshot {
            locations: self.ranked().copied().collect(),
            bounding_box: self.bounding_box,
        }
    }

    pub(crate) fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }
}

fn rank_order(a: &Location, b: &Location) -> Ordering {
    a.goodness
        .total_cmp(&b.goodness)
        .then_with(|| b.index.cmp(&a.index))
}

/// Ranked traversal returned by [`LocationAggregator::ranked`].
#[derive(Clone, Debug)]
pub struct Ranked<'a> {
    inner: std::vec::IntoIter<&'a Location>,
}

impl<'a> Iterator for Ranked<'a> {
    type Item = &'a Location;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Ranked<'_> {}

/// Point-in-time copy of the aggregator contents.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregatorSnapshot {
    /// Ranked best first.
    pub locations: Vec<Location>,
    pub bounding_box: BoundingBox,
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn sighting(id: u32, x: f64, y: f64, bearing: f64, goodness: f64) -> MarkerSighting {
        MarkerSighting {
            id,
            x,
            y,
            bearing,
            goodness,
        }
    }

    #[test]
    fn better_observation_replaces_and_widens_box() {
        let mut agg = LocationAggregator::new();
        let first = agg
            .ingest_sighting(sighting(3, 1.0, 2.0, 0.0, 0.5))
            .expect("valid");
        assert_eq!(first, IngestOutcome::Inserted);

        let second = agg
            .ingest_sighting(sighting(3, 1.2, 2.1, 0.05, 0.2))
            .expect("valid");
        let IngestOutcome::Replaced(previous) = second else {
            panic!("expected replacement, got {second:?}");
        };
        assert_eq!(previous.x, 1.0);
        assert_eq!(previous.index, 0);

        let best = agg.best_for(3).expect("retained");
        assert_eq!(best.x, 1.2);
        assert_eq!(best.y, 2.1);
        assert_eq!(best.goodness, 0.2);
        assert_eq!(best.index, 1);

        assert_eq!(agg.bounding_box().min(), Some(Point2::new(1.0, 2.0)));
        assert_eq!(agg.bounding_box().max(), Some(Point2::new(1.2, 2.1)));
    }

    #[test]
    fn worse_observation_is_rejected_and_not_bounded() {
        let mut agg = LocationAggregator::new();
        agg.ingest_sighting(sighting(5, 10.0, 10.0, 1.0, 1.0))
            .expect("valid");
        let outcome = agg
            .ingest_sighting(sighting(5, 9.0, 9.0, 1.1, 3.0))
            .expect("valid");
        let IngestOutcome::Rejected(rejected) = outcome else {
            panic!("expected rejection, got {outcome:?}");
        };
        assert_eq!(rejected.x, 9.0);
        assert!(!outcome.is_accepted());

        let best = agg.best_for(5).expect("retained");
        assert_eq!(best.x, 10.0);
        assert_eq!(best.goodness, 1.0);
        assert_eq!(agg.bounding_box().min(), Some(Point2::new(10.0, 10.0)));
        assert_eq!(agg.bounding_box().max(), Some(Point2::new(10.0, 10.0)));
    }

    #[test]
    fn equal_goodness_prefers_later_index_and_worse_is_rejected() {
        let mut agg = LocationAggregator::new();
        agg.ingest_sighting(sighting(8, 0.0, 0.0, 0.0, 0.4))
            .expect("valid");
        let outcome = agg
            .ingest_sighting(sighting(8, 0.5, 0.0, 0.0, 0.4))
            .expect("valid");
        assert!(matches!(outcome, IngestOutcome::Replaced(_)));
        assert_eq!(agg.best_for(8).expect("retained").index, 1);

        let outcome = agg
            .ingest_sighting(sighting(8, 2.0, 2.0, 0.0, 0.9))
            .expect("valid");
        assert!(matches!(outcome, IngestOutcome::Rejected(_)));
        let best = agg.best_for(8).expect("retained");
        assert_eq!(best.index, 1);
        assert_eq!(best.x, 0.5);
    }

    #[test]
    fn malformed_observation_leaves_state_unchanged() {
        let mut agg = LocationAggregator::new();
        agg.ingest_sighting(sighting(1, 1.0, 1.0, 0.0, 0.3))
            .expect("valid");
        let before_box = *agg.bounding_box();
        let before_next = agg.next_index();

        let err = agg
            .ingest_sighting(sighting(2, f64::NAN, 0.0, 0.0, 0.1))
            .unwrap_err();
        assert!(matches!(err, LocateError::Location(_)));

        let mut bad = *agg.best_for(1).expect("retained");
        bad.goodness = -1.0;
        bad.index = 100;
        assert!(agg.ingest(bad).is_err());

        assert_eq!(agg.len(), 1);
        assert_eq!(agg.best_for(1).expect("retained").goodness, 0.3);
        assert!(matches!(
            agg.best_for(2),
            Err(LocateError::NotFound { id: 2 })
        ));
        assert_eq!(*agg.bounding_box(), before_box);
        assert_eq!(agg.next_index(), before_next);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut agg = LocationAggregator::new();
        for id in 0..4 {
            agg.ingest_sighting(sighting(id, id as f64, -(id as f64), 0.0, 0.1))
                .expect("valid");
        }
        assert_eq!(agg.len(), 4);

        agg.clear();
        for id in 0..4 {
            assert_eq!(agg.best_for(id), Err(LocateError::NotFound { id }));
        }
        assert!(agg.is_empty());
        assert!(agg.bounding_box().is_empty());
        assert_eq!(agg.next_index(), 0);
        assert_eq!(agg.ranked().count(), 0);
    }

    #[test]
    fn ranked_orders_by_goodness_then_recency() {
        let mut agg = LocationAggregator::new();
        agg.ingest_sighting(sighting(1, 0.0, 0.0, 0.0, 0.7))
            .expect("valid");
        agg.ingest_sighting(sighting(2, 0.0, 0.0, 0.0, 0.1))
            .expect("valid");
        agg.ingest_sighting(sighting(3, 0.0, 0.0, 0.0, 0.7))
            .expect("valid");
        agg.ingest_sighting(sighting(4, 0.0, 0.0, 0.0, 0.3))
            .expect("valid");

        let ids: Vec<u32> = agg.ranked().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 4, 3, 1]);

        // restartable: a second traversal yields the same sequence
        let again: Vec<u32> = agg.all().map(|l| l.id).collect();
        assert_eq!(again, ids);
        assert_eq!(agg.ranked().len(), 4);
        assert_eq!(agg.ids(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn externally_indexed_locations_advance_the_counter() {
        let mut agg = LocationAggregator::new();
        let loc = Location::new(9, 0.0, 0.0, 0.0, 0.2, 41).expect("valid location");
        agg.ingest(loc).expect("valid");
        assert_eq!(agg.next_index(), 42);

        agg.ingest_sighting(sighting(10, 1.0, 1.0, 0.0, 0.2))
            .expect("valid");
        assert_eq!(agg.best_for(10).expect("retained").index, 42);
    }

    #[test]
    fn index_counter_never_wraps_or_repeats() {
        let mut agg = LocationAggregator::new();
        let last = Location::new(1, 0.0, 0.0, 0.0, 0.2, u64::MAX).expect("valid");
        assert_eq!(agg.ingest(last), Err(LocateError::IndexExhausted));
        assert!(agg.is_empty());
        assert_eq!(agg.next_index(), 0);

        let near_end = Location::new(1, 0.0, 0.0, 0.0, 0.2, u64::MAX - 1).expect("valid");
        assert_eq!(agg.ingest(near_end), Ok(IngestOutcome::Inserted));
        assert_eq!(agg.next_index(), u64::MAX);

        let err = agg.ingest_sighting(sighting(2, 5.0, 5.0, 0.0, 0.1));
        assert_eq!(err, Err(LocateError::IndexExhausted));
        assert!(!agg.contains(2));
        assert!(!agg.bounding_box().contains(5.0, 5.0));
        assert_eq!(agg.best_for(1).expect("retained").index, u64::MAX - 1);
    }

    #[test]
    fn max_goodness_rejects_poor_first_sightings() {
        let mut agg = LocationAggregator::with_params(AggregatorParams {
            max_goodness: Some(1.0),
            ..AggregatorParams::default()
        });
        let outcome = agg
            .ingest_sighting(sighting(6, 50.0, 50.0, 0.0, 2.5))
            .expect("valid");
        assert!(matches!(outcome, IngestOutcome::Rejected(_)));
        assert!(agg.get(6).is_none());
        assert!(agg.bounding_box().is_empty());
        // the rejected sighting still consumed an index
        assert_eq!(agg.next_index(), 1);
    }

    #[test]
    fn snapshot_copies_contents() {
        let mut agg = LocationAggregator::new();
        agg.ingest_sighting(sighting(1, 3.0, 4.0, 0.0, 0.5))
            .expect("valid");
        let snap = agg.snapshot();
        agg.clear();
        assert_eq!(snap.locations.len(), 1);
        assert_eq!(snap.locations[0].id, 1);
        assert!(!snap.bounding_box.is_empty());
    }
}
