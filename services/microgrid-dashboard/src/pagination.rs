//! Client-side pagination over an already fetched collection

use std::ops::Range;

use serde::Serialize;

/// `max(1, ceil(total / page_size))`. A page size of zero counts as one.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total.div_ceil(page_size).max(1)
}

/// Current page over a collection of `total` items; pages are 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    page: usize,
    page_size: usize,
    total: usize,
}

impl PageWindow {
    pub fn new(page_size: usize, total: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total, self.page_size)
    }

    /// Index range of the current page, clipped to the collection.
    pub fn range(&self) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(self.total);
        let end = (self.page * self.page_size).min(self.total);
        start..end
    }

    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        &items[start..end]
    }

    pub fn next_page(&mut self) -> usize {
        self.page = (self.page + 1).min(self.total_pages());
        self.page
    }

    pub fn prev_page(&mut self) -> usize {
        self.page = self.page.saturating_sub(1).max(1);
        self.page
    }

    /// Jump to `page`, clamped into `1..=total_pages`.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.total_pages());
        self.page
    }

    /// The collection changed size; keep the page in bounds.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.page = self.page.clamp(1, self.total_pages());
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}
