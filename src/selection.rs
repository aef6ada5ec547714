use crate::shape::ShapeId;
use std::collections::HashSet;

/// Set of selected shape ids, as reported by the canvas.
#[derive(Debug, Default, Clone)]
pub struct SelectionManager {
    selected: HashSet<ShapeId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current selection with a new set of ids
    pub fn replace_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ShapeId>,
    {
        self.selected.clear();
        self.selected.extend(ids);
    }

    /// Drop ids that no longer refer to live shapes.
    pub fn remove_all<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a ShapeId>,
    {
        for id in ids {
            self.selected.remove(id);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.selected.iter().copied()
    }
}
