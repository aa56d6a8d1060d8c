//! Offset/limit pagination shared by every list operation.

use serde::Serialize;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// Effective window over a result set.
///
/// Built from raw caller input with [`PageRequest::clamped`]: a negative
/// offset becomes 0, a non-positive limit becomes [`DEFAULT_LIMIT`] and
/// anything above [`MAX_LIMIT`] is capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn clamped(offset: i64, limit: i64) -> Self {
        let offset = offset.max(0) as usize;
        let limit = if limit <= 0 {
            DEFAULT_LIMIT
        } else {
            (limit as usize).min(MAX_LIMIT)
        };
        Self { offset, limit }
    }

    /// Cut the page out of an already filtered and ordered sequence.
    pub fn slice<T, I>(&self, items: I) -> Page<T>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let iter = items.into_iter();
        let total = iter.len();
        let data = iter.skip(self.offset).take(self.limit).collect();
        Page {
            data,
            total,
            offset: self.offset,
            limit: self.limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One page of results plus the size of the whole filtered set.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.offset + self.limit < self.total
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            offset: self.offset,
            limit: self.limit,
        }
    }
}
