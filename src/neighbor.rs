//! Neighbor records and the ordered candidate list both graph searches use.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::point::PointId;

/// A point together with its distance to some query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: PointId,
    pub distance: f32,
}

impl Neighbor {
    #[inline]
    pub fn new(id: PointId, distance: f32) -> Self {
        Self { id, distance }
    }

    /// Orders by distance only, NaN-safe. Use with a stable sort so equal
    /// distances keep their original order.
    #[inline]
    pub fn by_distance(a: &Neighbor, b: &Neighbor) -> Ordering {
        a.distance.total_cmp(&b.distance)
    }
}

/// One slot in a [`NeighborList`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub neighbor: Neighbor,
    /// Set once best-first search has expanded this entry.
    pub checked: bool,
}

/// Ascending list of neighbors keyed by `(distance, insertion order)`.
///
/// Membership is by point identity: distinct points at the same distance are
/// all kept, and a new entry sorts after the entries already at that distance.
/// Re-inserting a point that is already present does nothing.
///
/// Flags are updated in place, so marking an entry checked never moves it.
#[derive(Debug, Clone, Default)]
pub struct NeighborList {
    entries: Vec<Entry>,
    members: HashSet<PointId>,
    checked: usize,
}

impl NeighborList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
            checked: 0,
        }
    }

    /// Insert an unchecked entry. Returns `false` if the point is already present.
    pub fn insert(&mut self, neighbor: Neighbor) -> bool {
        if !self.members.insert(neighbor.id) {
            return false;
        }
        let pos = self
            .entries
            .partition_point(|e| e.neighbor.distance.total_cmp(&neighbor.distance) != Ordering::Greater);
        self.entries.insert(
            pos,
            Entry {
                neighbor,
                checked: false,
            },
        );
        true
    }

    #[inline]
    pub fn contains(&self, id: PointId) -> bool {
        self.members.contains(&id)
    }

    /// Closest entry.
    #[inline]
    pub fn first(&self) -> Option<&Neighbor> {
        self.entries.first().map(|e| &e.neighbor)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries marked checked.
    #[inline]
    pub fn checked_count(&self) -> usize {
        self.checked
    }

    /// Mark the closest unchecked entry as checked and return it.
    pub fn check_first_unchecked(&mut self) -> Option<Neighbor> {
        let entry = self.entries.iter_mut().find(|e| !e.checked)?;
        entry.checked = true;
        self.checked += 1;
        Some(entry.neighbor)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Neighbor> + '_ {
        self.entries.iter().map(|e| &e.neighbor)
    }

    /// The `k` closest neighbors, ascending.
    pub fn into_truncated(self, k: usize) -> Vec<Neighbor> {
        self.entries
            .into_iter()
            .take(k)
            .map(|e| e.neighbor)
            .collect()
    }
}
