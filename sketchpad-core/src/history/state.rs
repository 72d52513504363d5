use crate::raster::Snapshot;

/// Upper bound on the number of undoable strokes.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Capacity {
    #[default]
    Unbounded,
    /// Once exceeded, the oldest strokes are forgotten first.
    Bounded(std::num::NonZeroUsize),
}
impl Capacity {
    /// `None` or zero are unbounded.
    #[must_use]
    pub fn from_limit(limit: Option<usize>) -> Self {
        limit
            .and_then(std::num::NonZeroUsize::new)
            .map_or(Self::Unbounded, Self::Bounded)
    }
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::Bounded(limit) => Some(limit.get()),
        }
    }
    #[must_use]
    pub fn is_exceeded_by(&self, len: usize) -> bool {
        self.limit().is_some_and(|limit| len > limit)
    }
}
impl std::fmt::Display for Capacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unbounded => f.write_str("unbounded"),
            Self::Bounded(limit) => write!(f, "{limit}"),
        }
    }
}

/// The two stacks of a linear undo history.
#[derive(Default, Debug)]
pub struct HistoryState {
    /// Completed strokes, oldest at the front. The back is the stroke currently shown.
    pub(super) undo: std::collections::VecDeque<Snapshot>,
    /// Undone strokes. The *back* of this vec is the head, the most recently undone.
    pub(super) redo: Vec<Snapshot>,
}
impl HistoryState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Build from existing stacks. `undo` is oldest first, `redo` is most recently undone first.
    #[must_use]
    pub fn from_stacks(
        undo: impl IntoIterator<Item = Snapshot>,
        redo: impl IntoIterator<Item = Snapshot>,
    ) -> Self {
        let mut redo: Vec<_> = redo.into_iter().collect();
        redo.reverse();
        Self {
            undo: undo.into_iter().collect(),
            redo,
        }
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.undo.is_empty() && self.redo.is_empty()
    }
    /// Iterate both stacks, undo then redo.
    pub(super) fn all(&self) -> impl Iterator<Item = &Snapshot> {
        self.undo.iter().chain(self.redo.iter())
    }
}
