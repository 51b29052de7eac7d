use alloc::vec::Vec;

/// Row elements currently attached for size observation, with the row index each one renders.
///
/// At most one element per index and one index per element. Only windowed rows are attached,
/// so a linear scan is fine.
#[derive(Clone, Debug)]
pub(crate) struct RowRegistry<E> {
    rows: Vec<(usize, E)>,
}

impl<E: PartialEq> RowRegistry<E> {
    pub(crate) fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn index_of(&self, element: &E) -> Option<usize> {
        self.rows
            .iter()
            .find(|(_, e)| e == element)
            .map(|(index, _)| *index)
    }

    pub(crate) fn element_at(&self, index: usize) -> Option<&E> {
        self.rows.iter().find(|(i, _)| *i == index).map(|(_, e)| e)
    }

    /// Tracks `element` as rendering `index`.
    ///
    /// Returns `true` when the element was not tracked before. A tracked element that moved to
    /// another row only has its index updated.
    pub(crate) fn insert(&mut self, index: usize, element: E) -> bool {
        if let Some(slot) = self.rows.iter_mut().find(|(_, e)| *e == element) {
            slot.0 = index;
            return false;
        }
        self.rows.push((index, element));
        true
    }

    pub(crate) fn remove_index(&mut self, index: usize) -> Option<E> {
        let pos = self.rows.iter().position(|(i, _)| *i == index)?;
        Some(self.rows.swap_remove(pos).1)
    }

    pub(crate) fn remove_element(&mut self, element: &E) -> Option<usize> {
        let pos = self.rows.iter().position(|(_, e)| e == element)?;
        Some(self.rows.swap_remove(pos).0)
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = E> + '_ {
        self.rows.drain(..).map(|(_, e)| e)
    }
}
