/// Entity storage with safe add/remove semantics during iteration.
///
/// Update passes walk a collection by index, mark entities for removal and
/// stage newly spawned entities as they go; nothing is inserted or deleted
/// until the pass has finished and `commit` runs.  This replaces the
/// remove-while-iterating pattern that forced defensive membership checks in
/// earlier revisions of the game.

#[derive(Clone, Debug, Default)]
pub struct Store<T> {
    items: Vec<T>,
    staged: Vec<T>,
    doomed: Vec<usize>,
}

impl<T> Store<T> {
    pub fn new() -> Store<T> {
        Store {
            items: Vec::new(),
            staged: Vec::new(),
            doomed: Vec::new(),
        }
    }

    /// Append immediately.  Only safe outside an update pass over this store.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Stage an entity to be appended by the next `commit`.  Safe while a
    /// pass over this store is in progress (escort sub-spawning does this).
    pub fn stage(&mut self, item: T) {
        self.staged.push(item);
    }

    /// Mark the entity at `idx` for removal by the next `commit`.
    /// Idempotent: marking twice, or marking an index that is out of range,
    /// is a no-op rather than an error.
    pub fn mark_remove(&mut self, idx: usize) {
        if idx < self.items.len() && !self.doomed.contains(&idx) {
            self.doomed.push(idx);
        }
    }

    pub fn is_marked(&self, idx: usize) -> bool {
        self.doomed.contains(&idx)
    }

    /// Apply all marked removals, then append all staged spawns.
    pub fn commit(&mut self) {
        if !self.doomed.is_empty() {
            let doomed = std::mem::take(&mut self.doomed);
            let mut idx = 0;
            self.items.retain(|_| {
                let keep = !doomed.contains(&idx);
                idx += 1;
                keep
            });
        }
        self.items.append(&mut self.staged);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.items.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.items.get_mut(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}
