//! # Stroke history
//!
//! A linear undo/redo history of whole-raster snapshots, one per completed stroke.
//!
//! The [`HistoryManager`] is the only thing that touches the two stacks. Snapshots move between
//! them and are never copied, so a given capture is always in at most one of them. Recording a new
//! stroke discards everything that was undone - there is no branching.
//!
//! The top of the undo stack is, by contract, what the surface is showing. When the undo stack is
//! empty the surface shows its blank state, see [`Restore::Empty`].

mod state;

pub use state::{Capacity, HistoryState};

use crate::raster::{DimensionMismatch, Dimensions, Snapshot};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    /// The snapshot was captured from a surface of a different shape,
    /// e.g. it was resized between capture and record. History is unchanged.
    #[error("snapshot doesn't match the surface: {0}")]
    DimensionMismatch(#[from] DimensionMismatch),
}

/// What the surface should show after a history transition.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Restore<'a> {
    Snapshot(&'a Snapshot),
    /// The state before any recorded stroke - the surface's blank state.
    Empty,
}
impl<'a> Restore<'a> {
    #[must_use]
    pub fn snapshot(self) -> Option<&'a Snapshot> {
        match self {
            Self::Snapshot(snapshot) => Some(snapshot),
            Self::Empty => None,
        }
    }
}

/// Owner of one surface's undo and redo stacks. Make one per canvas.
#[derive(Debug)]
pub struct HistoryManager {
    state: HistoryState,
    capacity: Capacity,
    // Shape every snapshot must have.
    dimensions: Dimensions,
}
impl HistoryManager {
    #[must_use]
    pub fn new(dimensions: Dimensions, capacity: Capacity) -> Self {
        Self {
            state: HistoryState::new(),
            capacity,
            dimensions,
        }
    }
    /// Take ownership of existing stacks. Fails if any snapshot has the wrong shape.
    /// Stacks over capacity are trimmed oldest-first.
    pub fn with_state(
        state: HistoryState,
        dimensions: Dimensions,
        capacity: Capacity,
    ) -> Result<Self, HistoryError> {
        if let Some(bad) = state.all().find(|s| s.dimensions() != dimensions) {
            return Err(DimensionMismatch {
                expected: dimensions,
                found: bad.dimensions(),
            }
            .into());
        }
        let mut this = Self {
            state,
            capacity,
            dimensions,
        };
        this.evict();
        Ok(this)
    }
    /// Give up the stacks.
    #[must_use]
    pub fn into_state(self) -> HistoryState {
        self.state
    }
    /// Record a completed stroke. `snapshot` must be captured *after* the stroke was rendered.
    ///
    /// Discards any redo history, and may forget the oldest strokes if over capacity.
    pub fn record_stroke(&mut self, snapshot: Snapshot) -> Result<(), HistoryError> {
        if snapshot.dimensions() != self.dimensions {
            log::warn!(
                "Rejected {:?}, expected {} history",
                snapshot,
                self.dimensions
            );
            return Err(DimensionMismatch {
                expected: self.dimensions,
                found: snapshot.dimensions(),
            }
            .into());
        }
        log::trace!("Recording stroke {}", snapshot.id());
        if !self.state.redo.is_empty() {
            log::debug!(
                "New stroke discards {} undone stroke(s)",
                self.state.redo.len()
            );
            self.state.redo.clear();
        }
        self.state.undo.push_back(snapshot);
        self.evict();
        Ok(())
    }
    /// Step back one stroke. `None` if there is nothing to undo, in which case nothing changed.
    ///
    /// Otherwise, returns what the surface should now show.
    pub fn undo(&mut self) -> Option<Restore<'_>> {
        let undone = self.state.undo.pop_back()?;
        log::trace!("Undo {}", undone.id());
        self.state.redo.push(undone);
        Some(self.current())
    }
    /// Step forward one undone stroke. `None` if there is nothing to redo, in which case nothing changed.
    ///
    /// Otherwise, returns the snapshot the surface should now show.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let redone = self.state.redo.pop()?;
        log::trace!("Redo {}", redone.id());
        self.state.undo.push_back(redone);
        // The redo line may be longer than the capacity, if it shrank or was handed in that way.
        self.evict();
        self.state.undo.back()
    }
    /// Forget everything. This is not itself undoable.
    pub fn clear(&mut self) {
        log::trace!(
            "Clearing {} undo and {} redo entries",
            self.state.undo.len(),
            self.state.redo.len()
        );
        self.state.undo.clear();
        self.state.redo.clear();
    }
    /// Forget everything and expect snapshots of a new shape from now on.
    pub fn reset_dimensions(&mut self, dimensions: Dimensions) {
        self.clear();
        self.dimensions = dimensions;
    }
    /// What the surface should be showing right now.
    #[must_use]
    pub fn current(&self) -> Restore<'_> {
        self.state
            .undo
            .back()
            .map_or(Restore::Empty, Restore::Snapshot)
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.state.undo.is_empty()
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.state.redo.is_empty()
    }
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.state.undo.len()
    }
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.state.redo.len()
    }
    /// Undoable strokes, oldest first.
    pub fn iter_undo(&self) -> impl DoubleEndedIterator<Item = &Snapshot> + ExactSizeIterator {
        self.state.undo.iter()
    }
    /// Redoable strokes, next-to-redo first.
    pub fn iter_redo(&self) -> impl DoubleEndedIterator<Item = &Snapshot> + ExactSizeIterator {
        self.state.redo.iter().rev()
    }
    #[must_use]
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }
    /// Change the capacity. Shrinking below the current depth forgets the oldest strokes immediately.
    ///
    /// Undone strokes are kept. Redoing them later forgets the oldest strokes as needed.
    pub fn set_capacity(&mut self, capacity: Capacity) {
        self.capacity = capacity;
        self.evict();
    }
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }
    // Drop oldest strokes until within capacity.
    fn evict(&mut self) {
        let Some(limit) = self.capacity.limit() else {
            return;
        };
        let excess = self.state.undo.len().saturating_sub(limit);
        if excess > 0 {
            log::debug!("History over capacity {limit}, forgetting {excess} oldest stroke(s)");
            self.state.undo.drain(..excess);
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Capacity, HistoryError, HistoryManager, HistoryState, Restore};
    use crate::{
        color::Rgba8,
        raster::{Dimensions, Snapshot, SnapshotID},
    };

    fn dims() -> Dimensions {
        Dimensions::new(2, 1).unwrap()
    }
    // Distinguishable contents, so "buffer state" can be compared.
    fn snapshot(shade: u8) -> Snapshot {
        Snapshot::new(dims(), vec![Rgba8::new(shade, shade, shade, 255); 2].into()).unwrap()
    }
    fn manager(capacity: Option<usize>) -> HistoryManager {
        HistoryManager::new(dims(), Capacity::from_limit(capacity))
    }
    fn undo_ids(history: &HistoryManager) -> Vec<SnapshotID> {
        history.iter_undo().map(Snapshot::id).collect()
    }
    // Pixel content the surface would show.
    fn shown(restore: Restore<'_>) -> Option<Vec<Rgba8>> {
        restore.snapshot().map(|s| s.pixels().to_vec())
    }
    // can_undo/can_redo must track the stacks at all times.
    fn assert_queries(history: &HistoryManager) {
        assert_eq!(history.can_undo(), history.undo_len() != 0);
        assert_eq!(history.can_redo(), history.redo_len() != 0);
    }

    #[test]
    fn starts_empty() {
        let mut history = manager(None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.current(), Restore::Empty);
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_queries(&history);
    }
    #[test]
    fn record_without_undo() {
        for capacity in [None, Some(1), Some(3), Some(10)] {
            for strokes in 0..8usize {
                let mut history = manager(capacity);
                let mut last = None;
                for shade in 0..strokes {
                    let snapshot = snapshot(shade as u8);
                    last = Some(snapshot.id());
                    history.record_stroke(snapshot).unwrap();
                    assert_queries(&history);
                }
                let expected = capacity.map_or(strokes, |c| strokes.min(c));
                assert_eq!(history.undo_len(), expected);
                assert_eq!(history.current().snapshot().map(Snapshot::id), last);
            }
        }
    }
    #[test]
    fn undo_redo_round_trip() {
        for depth in 1..6u8 {
            let mut history = manager(None);
            for shade in 0..depth {
                history.record_stroke(snapshot(shade)).unwrap();
            }
            let before = shown(history.current());
            let before_ids = undo_ids(&history);
            history.undo().unwrap();
            assert_queries(&history);
            let after = history.redo().map(|s| s.pixels().to_vec());
            assert_eq!(after, before);
            assert_eq!(undo_ids(&history), before_ids);
            assert_eq!(history.redo_len(), 0);
            assert_queries(&history);
        }
    }
    #[test]
    fn record_invalidates_redo() {
        let mut history = manager(None);
        for shade in 0..4 {
            history.record_stroke(snapshot(shade)).unwrap();
        }
        history.undo();
        history.undo();
        assert_eq!(history.redo_len(), 2);
        history.record_stroke(snapshot(9)).unwrap();
        assert_eq!(history.redo_len(), 0);
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        assert_queries(&history);
    }
    #[test]
    fn capacity_evicts_oldest() {
        let mut history = manager(Some(3));
        let snapshots: Vec<_> = (0..5).map(snapshot).collect();
        let ids: Vec<_> = snapshots.iter().map(Snapshot::id).collect();
        for snapshot in snapshots {
            history.record_stroke(snapshot).unwrap();
        }
        assert_eq!(undo_ids(&history), &ids[2..]);

        // Undo 3 times reaches the blank state, not strokes #1 or #2.
        assert_eq!(history.undo().and_then(Restore::snapshot).map(Snapshot::id), Some(ids[3]));
        assert_eq!(history.undo().and_then(Restore::snapshot).map(Snapshot::id), Some(ids[2]));
        assert_eq!(history.undo(), Some(Restore::Empty));
        assert_eq!(history.undo(), None);
        assert_queries(&history);
    }
    #[test]
    fn undo_then_redo_scenario() {
        let mut history = manager(None);
        let (s1, s2, s3, s4) = (snapshot(1), snapshot(2), snapshot(3), snapshot(4));
        let (id1, id2, id3, id4) = (s1.id(), s2.id(), s3.id(), s4.id());
        history.record_stroke(s1).unwrap();
        history.record_stroke(s2).unwrap();
        history.record_stroke(s3).unwrap();

        assert_eq!(history.undo().and_then(Restore::snapshot).map(Snapshot::id), Some(id2));
        assert_eq!(history.undo().and_then(Restore::snapshot).map(Snapshot::id), Some(id1));
        // Most recently undone comes back first.
        assert_eq!(
            history.iter_redo().map(Snapshot::id).collect::<Vec<_>>(),
            [id2, id3]
        );
        assert_eq!(history.redo().map(Snapshot::id), Some(id2));

        history.record_stroke(s4).unwrap();
        assert!(!history.can_redo());
        assert_eq!(undo_ids(&history), [id1, id2, id4]);
        assert_queries(&history);
    }
    #[test]
    fn clear_is_final() {
        let mut history = manager(None);
        for shade in 0..3 {
            history.record_stroke(snapshot(shade)).unwrap();
        }
        history.undo();
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.current(), Restore::Empty);
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }
    #[test]
    fn no_snapshot_in_both_stacks() {
        let mut history = manager(Some(4));
        let script = [true, true, false, true, false, false, true, true, true, true, true, false];
        for (step, record) in script.into_iter().enumerate() {
            if record {
                history.record_stroke(snapshot(step as u8)).unwrap();
            } else if step % 2 == 0 {
                history.undo();
            } else {
                history.redo();
            }
            let mut ids: Vec<_> = history
                .iter_undo()
                .chain(history.iter_redo())
                .map(Snapshot::id)
                .collect();
            let total = ids.len();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), total, "snapshot duplicated at step {step}");
            assert_queries(&history);
        }
    }
    #[test]
    fn rejects_mismatched_snapshot() {
        let mut history = manager(None);
        history.record_stroke(snapshot(1)).unwrap();
        history.undo();
        let wrong = Snapshot::new(Dimensions::new(1, 1).unwrap(), vec![Rgba8::BLACK].into())
            .unwrap();
        let err = history.record_stroke(wrong).unwrap_err();
        assert!(matches!(err, HistoryError::DimensionMismatch(_)));
        // Nothing changed, the redo line survives.
        assert_eq!(history.undo_len(), 0);
        assert_eq!(history.redo_len(), 1);
    }
    #[test]
    fn shrinking_capacity_evicts() {
        let mut history = manager(None);
        let snapshots: Vec<_> = (0..5).map(snapshot).collect();
        let ids: Vec<_> = snapshots.iter().map(Snapshot::id).collect();
        for snapshot in snapshots {
            history.record_stroke(snapshot).unwrap();
        }
        history.set_capacity(Capacity::from_limit(Some(2)));
        assert_eq!(undo_ids(&history), &ids[3..]);
        history.set_capacity(Capacity::Unbounded);
        assert_eq!(history.undo_len(), 2);
    }
    #[test]
    fn redo_respects_shrunk_capacity() {
        let mut history = manager(None);
        let snapshots: Vec<_> = (0..5).map(snapshot).collect();
        let ids: Vec<_> = snapshots.iter().map(Snapshot::id).collect();
        for snapshot in snapshots {
            history.record_stroke(snapshot).unwrap();
        }
        for _ in 0..3 {
            history.undo();
        }
        history.set_capacity(Capacity::from_limit(Some(2)));
        assert_eq!(history.redo_len(), 3);

        let mut last = None;
        while let Some(redone) = history.redo().map(Snapshot::id) {
            last = Some(redone);
            assert!(history.undo_len() <= 2);
            assert_queries(&history);
        }
        assert_eq!(last, Some(ids[4]));
        assert_eq!(undo_ids(&history), &ids[3..]);
        assert_eq!(history.current().snapshot().map(Snapshot::id), Some(ids[4]));
    }
    #[test]
    fn bounded_interleaving() {
        let mut history = manager(Some(3));
        for step in 0..40u8 {
            match step % 5 {
                0 | 1 | 3 => {
                    history.record_stroke(snapshot(step)).unwrap();
                }
                2 => {
                    history.undo();
                    history.undo();
                }
                _ => {
                    history.redo();
                }
            }
            assert!(history.undo_len() <= 3, "over capacity at step {step}");
            assert_queries(&history);
        }
    }
    #[test]
    fn with_state() {
        let (a, b, c) = (snapshot(1), snapshot(2), snapshot(3));
        let (id_b, id_c) = (b.id(), c.id());
        let state = HistoryState::from_stacks([a, b], [c]);
        let mut history =
            HistoryManager::with_state(state, dims(), Capacity::from_limit(Some(1))).unwrap();
        assert_eq!(undo_ids(&history), [id_b]);
        // The oldest didn't fit.
        assert_eq!(history.redo().map(Snapshot::id), Some(id_c));
        assert_eq!(undo_ids(&history), [id_c]);

        let bad = HistoryState::from_stacks(
            [Snapshot::new(Dimensions::new(1, 1).unwrap(), vec![Rgba8::BLACK].into()).unwrap()],
            [],
        );
        assert!(HistoryManager::with_state(bad, dims(), Capacity::Unbounded).is_err());

        // A redo line longer than the capacity is replayed within it.
        let (a, b, c) = (snapshot(1), snapshot(2), snapshot(3));
        let id_c = c.id();
        let state = HistoryState::from_stacks([a], [b, c]);
        assert!(!state.is_empty());
        let mut history =
            HistoryManager::with_state(state, dims(), Capacity::from_limit(Some(1))).unwrap();
        while history.redo().is_some() {
            assert_eq!(history.undo_len(), 1);
        }
        assert_eq!(undo_ids(&history), [id_c]);
        assert!(HistoryState::new().is_empty());
    }
    #[test]
    fn reset_dimensions() {
        let mut history = manager(None);
        history.record_stroke(snapshot(1)).unwrap();
        let bigger = Dimensions::new(3, 3).unwrap();
        history.reset_dimensions(bigger);
        assert!(!history.can_undo());
        assert!(history.record_stroke(snapshot(2)).is_err());
        let fits = Snapshot::new(bigger, vec![Rgba8::WHITE; 9].into()).unwrap();
        assert!(history.record_stroke(fits).is_ok());
        assert!(history.into_state().undo.len() == 1);
    }
}
