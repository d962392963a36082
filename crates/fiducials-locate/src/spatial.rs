//! KD-tree queries over retained observations.
//!
//! The tree is rebuilt from the retained set on each query; the set holds at
//! most one observation per marker id, so it stays small. Markers reported at
//! exactly the same position share one tree item.

use fiducials_core::Location;
use kiddo::{KdTree, SquaredEuclidean};

use crate::LocationAggregator;

struct SpatialIndex<'a> {
    tree: KdTree<f64, 2>,
    /// Observations per distinct position; the tree item is the slot index.
    slots: Vec<Vec<&'a Location>>,
}

impl<'a> SpatialIndex<'a> {
    fn build(aggregator: &'a LocationAggregator) -> Self {
        let mut entries: Vec<&Location> = aggregator.locations().collect();
        // `+ 0.0` folds -0.0 into 0.0 so both signs land in one slot
        entries.sort_unstable_by(|a, b| {
            (a.x + 0.0)
                .total_cmp(&(b.x + 0.0))
                .then((a.y + 0.0).total_cmp(&(b.y + 0.0)))
                .then(a.id.cmp(&b.id))
        });

        let mut slots: Vec<Vec<&Location>> = Vec::new();
        let mut coords: Vec<[f64; 2]> = Vec::new();
        for location in entries {
            let same_position = coords
                .last()
                .is_some_and(|&[x, y]| x == location.x && y == location.y);
            match slots.last_mut() {
                Some(slot) if same_position => slot.push(location),
                _ => {
                    coords.push([location.x, location.y]);
                    slots.push(vec![location]);
                }
            }
        }

        let tree: KdTree<f64, 2> = (&coords).into();
        Self { tree, slots }
    }

    fn expand(&self, items: impl IntoIterator<Item = u64>) -> Vec<&'a Location> {
        items
            .into_iter()
            .flat_map(|item| self.slots[item as usize].iter().copied())
            .collect()
    }
}

impl LocationAggregator {
    /// Up to `n` retained observations closest to `(x, y)`, nearest first.
    ///
    /// Markers at the same position are returned in ascending id order.
    pub fn nearest(&self, x: f64, y: f64, n: usize) -> Vec<&Location> {
        if n == 0 || self.is_empty() || !x.is_finite() || !y.is_finite() {
            return Vec::new();
        }
        let index = SpatialIndex::build(self);
        let hits = index.tree.nearest_n::<SquaredEuclidean>(&[x, y], n);
        let mut found = index.expand(hits.into_iter().map(|nn| nn.item));
        found.truncate(n);
        found
    }

    /// Retained observations within `radius` of `(x, y)`, nearest first.
    pub fn within_radius(&self, x: f64, y: f64, radius: f64) -> Vec<&Location> {
        let valid_query = x.is_finite() && y.is_finite() && radius >= 0.0;
        if self.is_empty() || !valid_query {
            return Vec::new();
        }
        let index = SpatialIndex::build(self);
        let hits = index
            .tree
            .within::<SquaredEuclidean>(&[x, y], radius * radius);
        index.expand(hits.into_iter().map(|nn| nn.item))
    }
}
