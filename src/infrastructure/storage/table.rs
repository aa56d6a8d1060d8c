//! Entity map plus its ID counter, always guarded by one lock.

use std::collections::BTreeMap;

pub(crate) struct Table<T> {
    pub rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Table<T> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// IDs start at 1 and are never handed out twice, deletes included.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn insert_with<F>(&mut self, build: F) -> &T
    where
        F: FnOnce(u64) -> T,
    {
        let id = self.allocate_id();
        self.rows.entry(id).or_insert(build(id))
    }
}
